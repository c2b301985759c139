//! UI-facing projections of the model
//!
//! Widgets here produce plain draw instructions and never touch a surface.

pub mod timeline;

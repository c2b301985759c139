//! clipline - non-destructive clip/cut timeline model
//!
//! Re-exports all modules for use by the binary target.

// Core plumbing (event bus, time units)
pub mod core;

// App modules
pub mod cli;
pub mod config;
pub mod entities;
pub mod error;
pub mod widgets;

// Re-export commonly used types from core
pub use core::event_bus::{downcast_event, BoxedEvent, EventBus};
pub use core::time::{ApparentTime, Norm, SourceTime, TimeWindow};

// Re-export entities
pub use entities::{Clip, CutSpan, DurationChangedEvent, ProjectDoc, Timeline};
pub use error::{CutRejected, TimelineError};

//! Timeline widget - clip bars, selection, ruler, cut markers and play-head
//!
//! Data flow: `Timeline` state -> `project_layout` -> renderer.

mod layout;

pub use layout::{project_layout, ClipRect, CutMarker, SelectionRect, TimelineLayout};

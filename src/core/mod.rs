//! Core plumbing - notification bus and time units
//!
//! Independent of the timeline model and of any rendering layer.

pub mod event_bus;
pub mod time;

// Re-exports for convenience
pub use event_bus::{downcast_event, BoxedEvent, EventBus};
pub use time::{ApparentTime, Norm, SourceTime, TimeWindow, TIME_EPSILON};

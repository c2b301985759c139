//! Entities module - the timeline model, free of any rendering layer
//!
//! `Timeline` owns the clip sequence, the cut list, the selection and the
//! view. Everything else here is a part it is built from.

pub mod asset;
pub mod clip;
pub mod cut;
pub mod project;
pub mod selection;
pub mod timeline;
pub mod timeline_events;
pub mod view;

pub use asset::{Asset, AssetCatalog, AssetProvider};
pub use clip::Clip;
pub use cut::{CutList, CutSpan};
pub use project::ProjectDoc;
pub use selection::{CursorHint, Selection, SelectionEdge, SelectionState};
pub use timeline::{PointerEvent, Segment, Timeline};
pub use timeline_events::DurationChangedEvent;
pub use view::{Tick, TickBand, ViewState, ZOOM_TO_TICK_SPAN};

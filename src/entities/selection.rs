//! Drag-driven range selection inside one clip.
//!
//! ```text
//! NotSelecting --down--> Selecting --up--> SelectionMade
//! SelectionMade --down near edge--> MovingStart | MovingEnd --up--> SelectionMade
//! any drag --up with zero width--> NotSelecting
//! ```
//!
//! The selection only knows norm limits handed to it at drag start; the
//! timeline works out those limits from clip extents and cut positions.

use crate::core::time::{ApparentTime, Norm, TimeWindow};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectionState {
    #[default]
    NotSelecting,
    Selecting,
    SelectionMade,
    MovingStart,
    MovingEnd,
}

impl SelectionState {
    /// A pointer drag is in progress.
    pub fn is_dragging(self) -> bool {
        matches!(
            self,
            SelectionState::Selecting | SelectionState::MovingStart | SelectionState::MovingEnd
        )
    }
}

/// Which selection edge a pointer is close to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionEdge {
    Start,
    End,
}

/// Affordance hint for the rendering layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub enum CursorHint {
    #[default]
    Default,
    ResizeStart,
    ResizeEnd,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    pub state: SelectionState,
    pub clip_index: usize,
    pub start: ApparentTime,
    pub end: ApparentTime,
    /// Fixed end of the drag.
    anchor: Norm,
    lower_limit: Norm,
    upper_limit: Norm,
}

impl Selection {
    /// Something is (or is being) selected.
    pub fn is_active(&self) -> bool {
        self.state != SelectionState::NotSelecting
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Finished selection over `[start, end]` of `clip_index`.
    pub fn made(clip_index: usize, start: ApparentTime, end: ApparentTime) -> Self {
        Self {
            state: SelectionState::SelectionMade,
            clip_index,
            start,
            end,
            ..Self::default()
        }
    }

    /// Edge within `proximity` of `pointer`, start edge preferred.
    /// Only a finished selection exposes edges.
    pub fn edge_near(&self, pointer: Norm, window: &TimeWindow, proximity: f64) -> Option<SelectionEdge> {
        if self.state != SelectionState::SelectionMade {
            return None;
        }
        let start = window.time_to_norm(self.start);
        let end = window.time_to_norm(self.end);
        if (pointer.get() - start.get()).abs() < proximity {
            Some(SelectionEdge::Start)
        } else if (pointer.get() - end.get()).abs() < proximity {
            Some(SelectionEdge::End)
        } else {
            None
        }
    }

    /// Start a drag. `anchor` stays fixed; `lower`/`upper` bound the drag in norm space.
    pub fn begin(
        &mut self,
        state: SelectionState,
        clip_index: usize,
        anchor: Norm,
        lower: Norm,
        upper: Norm,
        window: &TimeWindow,
    ) {
        debug_assert!(state.is_dragging());
        self.state = state;
        self.clip_index = clip_index;
        self.anchor = anchor;
        self.lower_limit = lower;
        self.upper_limit = upper;
        self.drag_to(anchor, window);
    }

    /// Follow the pointer. No-op unless dragging.
    pub fn drag_to(&mut self, pointer: Norm, window: &TimeWindow) {
        if !self.state.is_dragging() {
            return;
        }
        let (a, b) = if pointer < self.anchor {
            (pointer, self.anchor)
        } else {
            (self.anchor, pointer)
        };
        let lo = Norm(self.lower_limit.get().max(0.0));
        let hi = Norm(self.upper_limit.get().min(1.0));
        self.start = window.norm_to_time(a.clamp(lo, hi));
        self.end = window.norm_to_time(b.clamp(lo, hi));
    }

    /// Finish a drag. A zero-width result is dropped.
    pub fn release(&mut self) {
        if !self.state.is_dragging() {
            return;
        }
        if self.start == self.end {
            self.clear();
        } else {
            self.state = SelectionState::SelectionMade;
        }
    }

    pub fn hint(&self, pointer: Norm, window: &TimeWindow, proximity: f64) -> CursorHint {
        match self.state {
            SelectionState::MovingStart => CursorHint::ResizeStart,
            SelectionState::MovingEnd => CursorHint::ResizeEnd,
            _ => match self.edge_near(pointer, window, proximity) {
                Some(SelectionEdge::Start) => CursorHint::ResizeStart,
                Some(SelectionEdge::End) => CursorHint::ResizeEnd,
                None => CursorHint::Default,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> TimeWindow {
        TimeWindow::new(ApparentTime(0.0), 10.0)
    }

    fn approx(a: ApparentTime, b: f64) -> bool {
        (a.secs() - b).abs() < 1e-9
    }

    #[test]
    fn test_drag_sorts_and_clamps() {
        let w = window();
        let mut sel = Selection::default();
        sel.begin(SelectionState::Selecting, 0, Norm(0.5), Norm(0.2), Norm(0.8), &w);
        assert!(approx(sel.start, 5.0) && approx(sel.end, 5.0));

        // Drag left past the lower limit
        sel.drag_to(Norm(0.1), &w);
        assert!(approx(sel.start, 2.0));
        assert!(approx(sel.end, 5.0));

        // Drag right past the upper limit
        sel.drag_to(Norm(0.95), &w);
        assert!(approx(sel.start, 5.0));
        assert!(approx(sel.end, 8.0));
    }

    #[test]
    fn test_drag_clamped_to_visible_window() {
        let w = window();
        let mut sel = Selection::default();
        sel.begin(SelectionState::Selecting, 0, Norm(0.5), Norm(-2.0), Norm(3.0), &w);
        sel.drag_to(Norm(1.7), &w);
        assert!(approx(sel.end, 10.0));
    }

    #[test]
    fn test_release_zero_width_clears() {
        let w = window();
        let mut sel = Selection::default();
        sel.begin(SelectionState::Selecting, 2, Norm(0.5), Norm(0.0), Norm(1.0), &w);
        sel.release();
        assert_eq!(sel.state, SelectionState::NotSelecting);
        assert_eq!(sel, Selection::default());
    }

    #[test]
    fn test_release_keeps_range() {
        let w = window();
        let mut sel = Selection::default();
        sel.begin(SelectionState::Selecting, 0, Norm(0.3), Norm(0.0), Norm(1.0), &w);
        sel.drag_to(Norm(0.4), &w);
        sel.release();
        assert_eq!(sel.state, SelectionState::SelectionMade);
        assert!(approx(sel.start, 3.0) && approx(sel.end, 4.0));
    }

    #[test]
    fn test_edges_only_on_finished_selection() {
        let w = window();
        let sel = Selection::made(0, ApparentTime(2.0), ApparentTime(4.0));
        assert_eq!(sel.edge_near(Norm(0.205), &w, 0.01), Some(SelectionEdge::Start));
        assert_eq!(sel.edge_near(Norm(0.395), &w, 0.01), Some(SelectionEdge::End));
        assert_eq!(sel.edge_near(Norm(0.3), &w, 0.01), None);
        assert_eq!(sel.hint(Norm(0.2), &w, 0.01), CursorHint::ResizeStart);

        let idle = Selection::default();
        assert_eq!(idle.edge_near(Norm(0.0), &w, 0.01), None);
        assert_eq!(idle.hint(Norm(0.0), &w, 0.01), CursorHint::Default);
    }

    #[test]
    fn test_drag_ignored_when_not_dragging() {
        let w = window();
        let mut sel = Selection::made(0, ApparentTime(2.0), ApparentTime(4.0));
        sel.drag_to(Norm(0.9), &w);
        sel.release();
        assert!(approx(sel.start, 2.0) && approx(sel.end, 4.0));
        assert_eq!(sel.state, SelectionState::SelectionMade);
    }
}

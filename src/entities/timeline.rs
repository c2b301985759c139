//! Timeline aggregate: clip sequence, cuts, selection and view.
//!
//! All mutation goes through `Timeline` methods. Every method validates
//! before it mutates, so a failed call leaves the timeline untouched.
//! Structural changes end with `duration_changed()`, which refreshes the
//! pan bounds and emits [`DurationChangedEvent`].

use log::{debug, trace, warn};
use serde::Serialize;

use crate::config::TimelineSettings;
use crate::core::event_bus::EventBus;
use crate::core::time::{ApparentTime, Norm, SourceTime, TimeWindow, TIME_EPSILON};
use crate::error::{CutRejected, TimelineError};

use super::clip::Clip;
use super::cut::{CutList, CutSpan};
use super::project::ProjectDoc;
use super::selection::{CursorHint, Selection, SelectionEdge, SelectionState};
use super::timeline_events::DurationChangedEvent;
use super::view::{Tick, ViewState};

/// Pointer input, already reduced to a normalized horizontal position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down(Norm),
    Move(Norm),
    Up,
    /// Movement with no button held.
    Hover(Norm),
}

/// Part of a source clip that survives the cuts (edit decision list entry).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Segment {
    pub clip_index: usize,
    pub name: String,
    pub source_in: SourceTime,
    pub source_out: SourceTime,
    pub apparent_start: ApparentTime,
}

impl Segment {
    pub fn duration(&self) -> f64 {
        self.source_out - self.source_in
    }
}

#[derive(Debug)]
pub struct Timeline {
    clips: Vec<Clip>,
    cuts: CutList,
    selection: Selection,
    view: ViewState,
    settings: TimelineSettings,
    events: EventBus,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self::with_settings(TimelineSettings::default())
    }

    pub fn with_settings(settings: TimelineSettings) -> Self {
        Self {
            clips: Vec::new(),
            cuts: CutList::new(),
            selection: Selection::default(),
            view: ViewState::new(&settings),
            settings,
            events: EventBus::new(),
        }
    }

    // ========== Accessors ==========

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn cuts(&self) -> &CutList {
        &self.cuts
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn settings(&self) -> &TimelineSettings {
        &self.settings
    }

    /// Bus carrying [`DurationChangedEvent`]. Subscribe or poll.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // ========== Time arithmetic ==========

    pub fn window(&self) -> TimeWindow {
        self.view.window()
    }

    pub fn time_to_norm(&self, t: ApparentTime) -> Norm {
        self.view.window().time_to_norm(t)
    }

    pub fn norm_to_time(&self, n: Norm) -> ApparentTime {
        self.view.window().norm_to_time(n)
    }

    /// Clip length after its cuts. 0 for an unknown index.
    pub fn duration_of_clip_minus_cuts(&self, index: usize) -> f64 {
        self.clips
            .get(index)
            .map_or(0.0, |clip| clip.duration - self.cuts.removed_from_clip(index))
    }

    /// Total apparent duration.
    pub fn duration_of_clips_minus_cuts(&self) -> f64 {
        (0..self.clips.len())
            .map(|i| self.duration_of_clip_minus_cuts(i))
            .sum()
    }

    /// Apparent `[start, end]` of clip `index`.
    pub fn clip_start_end(&self, index: usize) -> Option<(ApparentTime, ApparentTime)> {
        if index >= self.clips.len() {
            return None;
        }
        let start: f64 = (0..index).map(|j| self.duration_of_clip_minus_cuts(j)).sum();
        let start = ApparentTime(start);
        Some((start, start + self.duration_of_clip_minus_cuts(index)))
    }

    /// Clip containing apparent time `t`; past the end saturates to the last
    /// clip. `None` only when there are no clips.
    pub fn clip_index_at_time(&self, t: ApparentTime) -> Option<usize> {
        let last = self.clips.len().checked_sub(1)?;
        let mut end = ApparentTime::ZERO;
        for i in 0..last {
            end += self.duration_of_clip_minus_cuts(i);
            if t < end {
                return Some(i);
            }
        }
        Some(last)
    }

    pub fn clip_index_at_norm(&self, n: Norm) -> Option<usize> {
        self.clip_index_at_time(self.norm_to_time(n))
    }

    /// Where apparent time `t` lands in the original footage.
    /// Clamped to the timeline; a cut position maps to just after the cut.
    pub fn source_position(&self, t: ApparentTime) -> Option<(usize, SourceTime)> {
        let index = self.clip_index_at_time(t)?;
        let (start, end) = self.clip_start_end(index)?;
        let t = t.clamp(start, end);
        let source = (t - start) + self.cuts.removed_before(index, t);
        Some((index, SourceTime(source)))
    }

    /// Surviving source intervals in playback order.
    pub fn kept_segments(&self) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut apparent = ApparentTime::ZERO;
        for (index, clip) in self.clips.iter().enumerate() {
            let mut cuts: Vec<&CutSpan> = self.cuts.for_clip(index).collect();
            cuts.sort_by(|a, b| a.inpoint.secs().total_cmp(&b.inpoint.secs()));

            let mut cursor = SourceTime::ZERO;
            let mut keep = |from: SourceTime, to: SourceTime| {
                if to > from {
                    let segment = Segment {
                        clip_index: index,
                        name: clip.name.clone(),
                        source_in: from,
                        source_out: to,
                        apparent_start: apparent,
                    };
                    apparent += segment.duration();
                    segments.push(segment);
                }
            };
            for cut in cuts {
                keep(cursor, cut.inpoint);
                cursor = cursor.max(cut.outpoint);
            }
            keep(cursor, SourceTime(clip.duration));
        }
        segments
    }

    // ========== Clip sequence ==========

    /// Append a clip. Duration is taken as given.
    pub fn create_clip(&mut self, name: impl Into<String>, duration: f64) {
        let clip = Clip::new(name, duration);
        debug!("Append clip '{}' ({:.2}s) at {}", clip.name, duration, self.clips.len());
        self.clips.push(clip);
        self.duration_changed();
    }

    /// Insert a clip before `index` (`index == len` appends). Cuts on later
    /// clips are re-targeted and move later by `duration`.
    pub fn insert_clip(
        &mut self,
        name: impl Into<String>,
        duration: f64,
        index: usize,
    ) -> Result<(), TimelineError> {
        if index > self.clips.len() {
            return Err(TimelineError::ClipIndexOutOfRange {
                index,
                len: self.clips.len(),
            });
        }
        let clip = Clip::new(name, duration);
        debug!("Insert clip '{}' ({:.2}s) at {}", clip.name, duration, index);

        self.cuts.clip_inserted(index, duration);
        self.clips.insert(index, clip);

        if self.selection.is_active() && self.selection.clip_index >= index {
            if self.selection.state == SelectionState::SelectionMade {
                let sel = &self.selection;
                self.selection =
                    Selection::made(sel.clip_index + 1, sel.start + duration, sel.end + duration);
            } else {
                self.selection.clear();
            }
        }
        self.duration_changed();
        Ok(())
    }

    /// Remove clip `index` together with its cuts. Clears the selection.
    pub fn delete_clip(&mut self, index: usize) -> Result<Clip, TimelineError> {
        if index >= self.clips.len() {
            return Err(TimelineError::ClipIndexOutOfRange {
                index,
                len: self.clips.len(),
            });
        }
        let net = self.duration_of_clip_minus_cuts(index);
        let purged = self.cuts.clip_removed(index, net);
        let clip = self.clips.remove(index);
        debug!("Delete clip '{}' at {} ({} cuts purged)", clip.name, index, purged);

        self.selection.clear();
        self.duration_changed();
        Ok(clip)
    }

    // ========== Cuts ==========

    /// Cut the finished selection out of its clip. Returns the new cut's index.
    pub fn create_cut(&mut self) -> Result<usize, CutRejected> {
        let result = self.validate_cut();
        let (clip_index, start, end, clip_start) = match result {
            Ok(v) => v,
            Err(reason) => {
                warn!("Cut rejected: {}", reason);
                return Err(reason);
            }
        };

        // Apparent offset inside the clip, plus whatever earlier cuts on this
        // clip already removed, gives the position in the uncut source.
        let inpoint = SourceTime((start - clip_start) + self.cuts.removed_before(clip_index, start));
        let outpoint = inpoint + (end - start);
        let span = CutSpan {
            clip_index,
            inpoint,
            outpoint,
            apparent_start: start,
        };
        debug!(
            "Cut clip {} source [{}, {}) at apparent {}",
            clip_index, inpoint, outpoint, start
        );
        let index = self.cuts.insert(span);

        self.selection.clear();
        self.duration_changed();
        Ok(index)
    }

    fn validate_cut(&self) -> Result<(usize, ApparentTime, ApparentTime, ApparentTime), CutRejected> {
        let sel = &self.selection;
        if sel.state != SelectionState::SelectionMade {
            return Err(CutRejected::NoSelection);
        }
        if sel.duration() < self.settings.smallest_cut_span {
            return Err(CutRejected::TooShort);
        }
        if self.cuts.any_strictly_inside(sel.start, sel.end) {
            return Err(CutRejected::ThroughCut);
        }
        let (clip_start, _) = self
            .clip_start_end(sel.clip_index)
            .ok_or(CutRejected::NoSelection)?;
        Ok((sel.clip_index, sel.start, sel.end, clip_start))
    }

    /// Undo cut `index`: its interval comes back and becomes the selection.
    pub fn delete_cut(&mut self, index: usize) -> Result<CutSpan, TimelineError> {
        let len = self.cuts.len();
        let span = self
            .cuts
            .remove(index)
            .ok_or(TimelineError::CutIndexOutOfRange { index, len })?;
        debug!(
            "Remove cut {} (clip {}, source [{}, {}))",
            index, span.clip_index, span.inpoint, span.outpoint
        );

        self.selection = Selection::made(
            span.clip_index,
            span.apparent_start,
            span.apparent_start + span.duration(),
        );
        self.duration_changed();
        Ok(span)
    }

    // ========== Selection ==========

    /// Apparent bounds a selection anchored at `anchor` may reach: the clip's
    /// extent tightened to the nearest cut on each side. A cut at the anchor
    /// itself is the upper bound when the selection lies left of the anchor
    /// (`extends_left`), the lower bound otherwise.
    fn drag_limits(
        &self,
        clip_index: usize,
        anchor: ApparentTime,
        extends_left: bool,
    ) -> Option<(ApparentTime, ApparentTime)> {
        let (mut lower, mut upper) = self.clip_start_end(clip_index)?;
        for p in self.cuts.iter().map(|c| c.apparent_start) {
            let below = if extends_left {
                p - anchor < -TIME_EPSILON
            } else {
                p - anchor <= TIME_EPSILON
            };
            if below {
                if p > lower {
                    lower = p;
                }
            } else if p < upper {
                upper = p;
            }
        }
        Some((lower, upper))
    }

    pub fn pointer_down(&mut self, pointer: Norm) {
        let window = self.window();
        let proximity = self.settings.edge_proximity;

        if let Some(edge) = self.selection.edge_near(pointer, &window, proximity) {
            let clip_index = self.selection.clip_index;
            let (state, anchor, extends_left) = match edge {
                SelectionEdge::Start => (SelectionState::MovingStart, self.selection.end, true),
                SelectionEdge::End => (SelectionState::MovingEnd, self.selection.start, false),
            };
            if let Some((lower, upper)) = self.drag_limits(clip_index, anchor, extends_left) {
                trace!("Grab {:?} edge, anchor {}", edge, anchor);
                self.selection.begin(
                    state,
                    clip_index,
                    window.time_to_norm(anchor),
                    window.time_to_norm(lower),
                    window.time_to_norm(upper),
                    &window,
                );
                self.selection.drag_to(pointer, &window);
                return;
            }
        }

        let Some(clip_index) = self.clip_index_at_norm(pointer) else {
            trace!("Pointer down on empty timeline");
            return;
        };
        let anchor = window.norm_to_time(pointer);
        if let Some((lower, upper)) = self.drag_limits(clip_index, anchor, false) {
            trace!("Start selecting clip {} at {}", clip_index, anchor);
            self.selection.begin(
                SelectionState::Selecting,
                clip_index,
                pointer,
                window.time_to_norm(lower),
                window.time_to_norm(upper),
                &window,
            );
        }
    }

    pub fn pointer_move(&mut self, pointer: Norm) {
        let window = self.window();
        self.selection.drag_to(pointer, &window);
    }

    pub fn pointer_up(&mut self) {
        self.selection.release();
        trace!(
            "Pointer up: {:?} [{}, {}]",
            self.selection.state, self.selection.start, self.selection.end
        );
    }

    /// Affordance for a pointer at `pointer`. Never changes state.
    pub fn hover(&self, pointer: Norm) -> CursorHint {
        self.selection
            .hint(pointer, &self.window(), self.settings.edge_proximity)
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> CursorHint {
        match event {
            PointerEvent::Down(n) => {
                self.pointer_down(n);
                self.hover(n)
            }
            PointerEvent::Move(n) => {
                self.pointer_move(n);
                self.hover(n)
            }
            PointerEvent::Up => {
                self.pointer_up();
                CursorHint::Default
            }
            PointerEvent::Hover(n) => self.hover(n),
        }
    }

    /// Select `[start, end]` directly, with the same bounds a drag from
    /// `start` would have. Returns whether a selection now exists.
    pub fn select_range(&mut self, start: ApparentTime, end: ApparentTime) -> bool {
        let (a, b) = if end < start { (end, start) } else { (start, end) };
        let Some(clip_index) = self.clip_index_at_time(a) else {
            return false;
        };
        let Some((lower, upper)) = self.drag_limits(clip_index, a, false) else {
            return false;
        };
        let (a, b) = (a.clamp(lower, upper), b.clamp(lower, upper));
        if a == b {
            self.selection.clear();
            return false;
        }
        debug!("Select clip {} [{}, {}]", clip_index, a, b);
        self.selection = Selection::made(clip_index, a, b);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ========== View ==========

    pub fn set_zoom(&mut self, value: f64) {
        let total = self.duration_of_clips_minus_cuts();
        self.view.set_zoom(value, total);
    }

    pub fn set_time(&mut self, value: f64) {
        let total = self.duration_of_clips_minus_cuts();
        self.view.set_time(value, total);
    }

    pub fn set_play_head_time(&mut self, t: ApparentTime) {
        let total = ApparentTime(self.duration_of_clips_minus_cuts());
        self.view.play_head_time = t.clamp(ApparentTime::ZERO, total);
    }

    pub fn play_head_time(&self) -> ApparentTime {
        self.view.play_head_time
    }

    pub fn ticks(&self) -> Vec<Tick> {
        self.view.ticks()
    }

    // ========== Persistence ==========

    pub fn get_json(&self) -> ProjectDoc {
        ProjectDoc {
            clips: self.clips.clone(),
            cut_spans: self.cuts.as_slice().to_vec(),
        }
    }

    /// Replace clips and cuts with `doc`. Cuts are put back in timeline order.
    pub fn set_json(&mut self, doc: ProjectDoc) -> Result<(), TimelineError> {
        for (i, cut) in doc.cut_spans.iter().enumerate() {
            if cut.clip_index >= doc.clips.len() {
                return Err(TimelineError::InvalidProject(format!(
                    "cut {} references clip {} of {}",
                    i,
                    cut.clip_index,
                    doc.clips.len()
                )));
            }
            if !(cut.inpoint <= cut.outpoint) {
                return Err(TimelineError::InvalidProject(format!(
                    "cut {} has inpoint {} after outpoint {}",
                    i, cut.inpoint, cut.outpoint
                )));
            }
        }
        debug!(
            "Load {} clips, {} cuts",
            doc.clips.len(),
            doc.cut_spans.len()
        );
        self.clips = doc.clips;
        self.cuts = CutList::from_spans(doc.cut_spans);
        self.selection.clear();
        self.duration_changed();
        Ok(())
    }

    /// Parse and load a project JSON string.
    pub fn set_json_str(&mut self, json: &str) -> Result<(), TimelineError> {
        let doc: ProjectDoc = serde_json::from_str(json)?;
        self.set_json(doc)
    }

    fn duration_changed(&mut self) {
        let total = self.duration_of_clips_minus_cuts();
        self.view.refresh(total);
        let play_head = self.view.play_head_time.min(ApparentTime(total));
        self.view.play_head_time = play_head.max(ApparentTime::ZERO);
        trace!("Duration now {:.3}s", total);
        self.events.emit(DurationChangedEvent);
    }
}

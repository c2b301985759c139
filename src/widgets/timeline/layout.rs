//! Timeline projection: model state to normalized draw instructions.
//!
//! Stateless. A renderer multiplies every `Norm` by its track width and
//! draws; pointer input goes back through `Timeline::handle_pointer`.

use serde::Serialize;

use crate::core::time::{ApparentTime, Norm};
use crate::entities::selection::SelectionState;
use crate::entities::timeline::Timeline;
use crate::entities::view::Tick;

/// One clip bar. `start` may be negative or past 1 for partly visible clips.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClipRect {
    pub clip_index: usize,
    pub start: Norm,
    pub width: f64,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SelectionRect {
    pub start: Norm,
    pub width: f64,
    /// Edge labels, seconds with 2 decimals.
    pub start_label: String,
    pub end_label: String,
    /// Still being dragged.
    pub dragging: bool,
}

/// Cut position plus the index `Timeline::delete_cut` takes to remove it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CutMarker {
    pub cut_index: usize,
    pub norm: Norm,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimelineLayout {
    pub time_span_start: ApparentTime,
    pub time_span_end: ApparentTime,
    pub clips: Vec<ClipRect>,
    pub selection: Option<SelectionRect>,
    pub ticks: Vec<Tick>,
    pub cuts: Vec<CutMarker>,
    /// Only when the play-head is inside the window.
    pub play_head: Option<Norm>,
}

fn overlaps_window(start: Norm, width: f64) -> bool {
    start.get() < Norm::END.get() && start.get() + width > Norm::START.get()
}

pub fn project_layout(timeline: &Timeline) -> TimelineLayout {
    let view = timeline.view();
    let window = view.window();

    let clips = (0..timeline.clips().len())
        .filter_map(|i| {
            let (start, _) = timeline.clip_start_end(i)?;
            let start = window.time_to_norm(start);
            let width = window.secs_to_norm_width(timeline.duration_of_clip_minus_cuts(i));
            overlaps_window(start, width).then(|| ClipRect {
                clip_index: i,
                start,
                width,
                label: timeline.clips()[i].name.clone(),
            })
        })
        .collect();

    let sel = timeline.selection();
    let selection = (sel.state != SelectionState::NotSelecting).then(|| SelectionRect {
        start: window.time_to_norm(sel.start),
        width: window.secs_to_norm_width(sel.duration()),
        start_label: format!("{:.2}", sel.start.secs()),
        end_label: format!("{:.2}", sel.end.secs()),
        dragging: sel.state.is_dragging(),
    });

    let cuts = timeline
        .cuts()
        .iter()
        .enumerate()
        .map(|(cut_index, c)| CutMarker {
            cut_index,
            norm: window.time_to_norm(c.apparent_start),
        })
        .filter(|m| m.norm.is_visible())
        .collect();

    let play_head = Some(window.time_to_norm(view.play_head_time)).filter(|n| n.is_visible());

    TimelineLayout {
        time_span_start: view.time_span_start,
        time_span_end: view.time_span_end,
        clips,
        selection,
        ticks: view.ticks(),
        cuts,
        play_head,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn two_clips() -> Timeline {
        let mut tl = Timeline::new();
        tl.create_clip("a.mp4", 30.0);
        tl.create_clip("b.mp4", 30.0);
        tl
    }

    #[test]
    fn test_clip_rects() {
        let layout = project_layout(&two_clips());
        assert_eq!(layout.clips.len(), 2);
        assert!(approx(layout.clips[1].start.get(), 0.5));
        assert!(approx(layout.clips[1].width, 0.5));
        assert_eq!(layout.clips[1].label, "b.mp4");
        assert!(layout.selection.is_none());
        assert!(layout.cuts.is_empty());
    }

    #[test]
    fn test_offscreen_clips_are_dropped() {
        let mut tl = two_clips();
        tl.create_clip("c.mp4", 120.0);
        tl.set_zoom(1.0); // 1.2s window at the start
        let layout = project_layout(&tl);
        assert_eq!(layout.clips.len(), 1);
        assert_eq!(layout.clips[0].clip_index, 0);
    }

    #[test]
    fn test_selection_rect_labels() {
        let mut tl = two_clips();
        tl.select_range(ApparentTime(3.0), ApparentTime(4.5));
        let rect = project_layout(&tl).selection.unwrap();
        assert!(approx(rect.start.get(), 0.05));
        assert!(approx(rect.width, 0.025));
        assert_eq!(rect.start_label, "3.00");
        assert_eq!(rect.end_label, "4.50");
        assert!(!rect.dragging);
    }

    #[test]
    fn test_cut_markers_carry_index() {
        let mut tl = two_clips();
        tl.select_range(ApparentTime(6.0), ApparentTime(12.0));
        tl.create_cut().unwrap();
        let layout = project_layout(&tl);
        assert_eq!(layout.cuts.len(), 1);
        assert_eq!(layout.cuts[0].cut_index, 0);
        // 54s of content fits the 60s window
        assert!(approx(layout.cuts[0].norm.get(), 0.1));
    }

    #[test]
    fn test_play_head_only_inside_window() {
        let mut tl = Timeline::new();
        tl.create_clip("long.mp4", 600.0);
        tl.set_play_head_time(ApparentTime(30.0));
        assert!(approx(project_layout(&tl).play_head.unwrap().get(), 0.5));

        tl.set_play_head_time(ApparentTime(300.0));
        assert!(project_layout(&tl).play_head.is_none());
    }

    #[test]
    fn test_layout_serializes() {
        let mut tl = two_clips();
        tl.select_range(ApparentTime(1.0), ApparentTime(2.0));
        let json = serde_json::to_value(project_layout(&tl)).unwrap();
        assert_eq!(json["clips"][0]["label"], "a.mp4");
        assert_eq!(json["selection"]["start_label"], "1.00");
        assert!(json["ticks"].as_array().is_some_and(|t| !t.is_empty()));
    }
}

//! Non-destructive cut spans.
//!
//! A cut removes `[inpoint, outpoint)` from one clip. Inpoint/outpoint are
//! source times of the uncut clip and never move. `apparent_start` is where
//! the removed interval collapses to on the post-cut timeline; it moves
//! whenever something earlier on the timeline grows or shrinks.
//!
//! `CutList` keeps spans ordered by `apparent_start` (ties in source order)
//! and does the re-indexing when cuts or clips come and go.

use serde::{Deserialize, Serialize};

use crate::core::time::{ApparentTime, SourceTime, TIME_EPSILON};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CutSpan {
    pub clip_index: usize,
    pub inpoint: SourceTime,
    pub outpoint: SourceTime,
    pub apparent_start: ApparentTime,
}

impl CutSpan {
    /// Seconds removed from the timeline.
    pub fn duration(&self) -> f64 {
        self.outpoint - self.inpoint
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CutList {
    spans: Vec<CutSpan>,
}

impl CutList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap loaded spans, restoring timeline order. The sort is stable, so
    /// equal positions keep the order they were given in.
    pub fn from_spans(mut spans: Vec<CutSpan>) -> Self {
        spans.sort_by(|a, b| a.apparent_start.secs().total_cmp(&b.apparent_start.secs()));
        Self { spans }
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CutSpan> {
        self.spans.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CutSpan> {
        self.spans.iter()
    }

    pub fn as_slice(&self) -> &[CutSpan] {
        &self.spans
    }

    pub fn clear(&mut self) {
        self.spans.clear();
    }

    /// Spans belonging to one clip, in timeline order (which is also inpoint order).
    pub fn for_clip(&self, clip_index: usize) -> impl Iterator<Item = &CutSpan> {
        self.spans.iter().filter(move |c| c.clip_index == clip_index)
    }

    /// Total seconds removed from one clip.
    pub fn removed_from_clip(&self, clip_index: usize) -> f64 {
        self.for_clip(clip_index).map(CutSpan::duration).sum()
    }

    /// Seconds of `clip_index` removed before apparent time `at`.
    ///
    /// Adding this to a clip-relative apparent offset yields source time.
    /// A cut sitting at `at` counts: its interval precedes what is shown
    /// from `at` onward.
    pub fn removed_before(&self, clip_index: usize, at: ApparentTime) -> f64 {
        self.for_clip(clip_index)
            .take_while(|c| c.apparent_start - at <= TIME_EPSILON)
            .map(CutSpan::duration)
            .sum()
    }

    /// True if some cut position lies strictly inside `(start, end)`.
    /// A cut within [`TIME_EPSILON`] of either end counts as touching it.
    pub fn any_strictly_inside(&self, start: ApparentTime, end: ApparentTime) -> bool {
        self.spans.iter().any(|c| {
            c.apparent_start - start > TIME_EPSILON && end - c.apparent_start > TIME_EPSILON
        })
    }

    /// Insert keeping timeline order, then pull every later span back by the
    /// new span's duration. Returns the new span's index.
    pub fn insert(&mut self, span: CutSpan) -> usize {
        let index = self
            .spans
            .partition_point(|c| c.apparent_start - span.apparent_start <= TIME_EPSILON);
        let removed = span.duration();
        self.spans.insert(index, span);
        for later in &mut self.spans[index + 1..] {
            later.apparent_start -= removed;
        }
        index
    }

    /// Remove a span and push every later span forward by its duration.
    /// `None` if out of range.
    pub fn remove(&mut self, index: usize) -> Option<CutSpan> {
        if index >= self.spans.len() {
            return None;
        }
        let span = self.spans.remove(index);
        let restored = span.duration();
        for later in &mut self.spans[index..] {
            later.apparent_start += restored;
        }
        Some(span)
    }

    /// A clip of `duration` was inserted at `clip_index`.
    pub fn clip_inserted(&mut self, clip_index: usize, duration: f64) {
        for span in self.spans.iter_mut().filter(|c| c.clip_index >= clip_index) {
            span.clip_index += 1;
            span.apparent_start += duration;
        }
    }

    /// Clip `clip_index`, whose post-cut length was `net_duration`, was deleted.
    /// Returns how many of its cuts were purged.
    pub fn clip_removed(&mut self, clip_index: usize, net_duration: f64) -> usize {
        let before = self.spans.len();
        self.spans.retain(|c| c.clip_index != clip_index);
        for span in self.spans.iter_mut().filter(|c| c.clip_index > clip_index) {
            span.clip_index -= 1;
            span.apparent_start -= net_duration;
        }
        before - self.spans.len()
    }
}

impl<'a> IntoIterator for &'a CutList {
    type Item = &'a CutSpan;
    type IntoIter = std::slice::Iter<'a, CutSpan>;

    fn into_iter(self) -> Self::IntoIter {
        self.spans.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(clip_index: usize, inpoint: f64, outpoint: f64, apparent_start: f64) -> CutSpan {
        CutSpan {
            clip_index,
            inpoint: SourceTime(inpoint),
            outpoint: SourceTime(outpoint),
            apparent_start: ApparentTime(apparent_start),
        }
    }

    fn starts(list: &CutList) -> Vec<f64> {
        list.iter().map(|c| c.apparent_start.secs()).collect()
    }

    #[test]
    fn test_insert_keeps_order_and_shifts_later() {
        let mut list = CutList::new();
        // Cut [7,8) first: sits at 7
        assert_eq!(list.insert(span(0, 7.0, 8.0, 7.0)), 0);
        // Then [1,2): goes in front, pulls the 7 back to 6
        assert_eq!(list.insert(span(0, 1.0, 2.0, 1.0)), 0);
        assert_eq!(starts(&list), vec![1.0, 6.0]);
        assert_eq!(list.removed_from_clip(0), 2.0);
    }

    #[test]
    fn test_remove_pushes_later_forward() {
        let mut list = CutList::new();
        list.insert(span(0, 1.0, 2.0, 1.0));
        list.insert(span(0, 7.0, 8.0, 6.0));

        let removed = list.remove(0).unwrap();
        assert_eq!(removed.duration(), 1.0);
        assert_eq!(starts(&list), vec![7.0]);
        assert!(list.remove(5).is_none());
    }

    #[test]
    fn test_removed_before_counts_cut_at_position() {
        let mut list = CutList::new();
        list.insert(span(0, 2.0, 4.0, 2.0));
        list.insert(span(1, 0.0, 1.0, 8.0));

        assert_eq!(list.removed_before(0, ApparentTime(1.0)), 0.0);
        assert_eq!(list.removed_before(0, ApparentTime(2.0)), 2.0);
        assert_eq!(list.removed_before(0, ApparentTime(5.0)), 2.0);
        // Other clip's cuts never count
        assert_eq!(list.removed_before(1, ApparentTime(5.0)), 0.0);
    }

    #[test]
    fn test_strictly_inside_is_narrow() {
        let mut list = CutList::new();
        list.insert(span(0, 4.0, 5.0, 4.0));

        assert!(list.any_strictly_inside(ApparentTime(3.0), ApparentTime(6.0)));
        // Touching either end is allowed
        assert!(!list.any_strictly_inside(ApparentTime(2.0), ApparentTime(4.0)));
        assert!(!list.any_strictly_inside(ApparentTime(4.0), ApparentTime(6.0)));
    }

    #[test]
    fn test_clip_inserted_retargets() {
        let mut list = CutList::from_spans(vec![span(0, 1.0, 2.0, 1.0), span(1, 0.0, 1.0, 9.0)]);
        list.clip_inserted(1, 5.0);

        assert_eq!(list.get(0).map(|c| c.clip_index), Some(0));
        assert_eq!(list.get(0).map(|c| c.apparent_start), Some(ApparentTime(1.0)));
        assert_eq!(list.get(1).map(|c| c.clip_index), Some(2));
        assert_eq!(list.get(1).map(|c| c.apparent_start), Some(ApparentTime(14.0)));
    }

    #[test]
    fn test_clip_removed_purges_and_reindexes() {
        let mut list = CutList::from_spans(vec![
            span(0, 1.0, 2.0, 1.0),
            span(1, 0.0, 1.0, 9.0),
            span(2, 3.0, 4.0, 17.0),
        ]);
        // Clip 1 was 5s with 1s cut: net 4s
        let purged = list.clip_removed(1, 4.0);

        assert_eq!(purged, 1);
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(1).map(|c| c.clip_index), Some(1));
        assert_eq!(list.get(1).map(|c| c.apparent_start), Some(ApparentTime(13.0)));
    }

    #[test]
    fn test_from_spans_restores_order() {
        let list = CutList::from_spans(vec![
            span(0, 7.0, 8.0, 6.0),
            span(0, 2.0, 4.0, 2.0),
            span(0, 4.0, 5.0, 2.0),
        ]);
        assert_eq!(starts(&list), vec![2.0, 2.0, 6.0]);
        // Tie keeps input order
        assert_eq!(list.get(0).map(|c| c.inpoint), Some(SourceTime(2.0)));
        assert_eq!(list.get(1).map(|c| c.inpoint), Some(SourceTime(4.0)));
        assert_eq!(list.removed_before(0, ApparentTime(3.0)), 3.0);
    }

    #[test]
    fn test_camel_case_keys() {
        let json = serde_json::to_value(span(0, 2.0, 4.0, 2.0)).unwrap();
        assert_eq!(json["clipIndex"], 0);
        assert_eq!(json["apparentStart"], 2.0);
        assert_eq!(json["inpoint"], 2.0);
    }
}

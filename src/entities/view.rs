//! Zoom, pan and ruler ticks.
//!
//! Zoom and pan both arrive as slider values in `[0,1]`. Zoom maps linearly
//! onto `[zoom_max, zoom_min]` (1.0 is most zoomed in); pan is the fraction
//! of the scrollable range, so it survives zoom and content changes.

use serde::Serialize;

use crate::config::TimelineSettings;
use crate::core::time::{ApparentTime, Norm, TimeWindow};

/// Tick density for windows up to `max_span` seconds wide.
///
/// Tick `k` sits at `k * interval`; its tier is how many of `majors` divide
/// `k` (each entry a multiple of the previous). Top-tier ticks get a label.
#[derive(Clone, Copy, Debug)]
pub struct TickBand {
    pub max_span: f64,
    pub interval: f64,
    pub majors: &'static [u64],
}

pub const ZOOM_TO_TICK_SPAN: &[TickBand] = &[
    TickBand { max_span: 3.0, interval: 0.05, majors: &[2, 10] },
    TickBand { max_span: 12.0, interval: 0.1, majors: &[5, 10] },
    TickBand { max_span: 30.0, interval: 0.5, majors: &[2, 10] },
    TickBand { max_span: 120.0, interval: 1.0, majors: &[5, 10] },
    TickBand { max_span: 300.0, interval: 5.0, majors: &[2, 6] },
    TickBand { max_span: 600.0, interval: 10.0, majors: &[3, 6] },
    TickBand { max_span: 1800.0, interval: 30.0, majors: &[2, 10] },
    TickBand { max_span: 7200.0, interval: 60.0, majors: &[5, 10] },
    TickBand { max_span: 36000.0, interval: 300.0, majors: &[2, 12] },
    TickBand { max_span: f64::INFINITY, interval: 3600.0, majors: &[2, 6] },
];

/// Upper bound on ticks per window. Windows wider than the last band
/// multiply its interval by ten until they fit.
pub const MAX_TICKS: f64 = 600.0;

/// Band for a window `span` seconds wide.
pub fn tick_band(span: f64) -> &'static TickBand {
    ZOOM_TO_TICK_SPAN
        .iter()
        .find(|band| span <= band.max_span)
        .unwrap_or(&ZOOM_TO_TICK_SPAN[ZOOM_TO_TICK_SPAN.len() - 1])
}

/// Tick interval for a window `span` seconds wide.
pub fn tick_interval(band: &TickBand, span: f64) -> f64 {
    let mut interval = band.interval;
    while span / interval > MAX_TICKS {
        interval *= 10.0;
    }
    interval
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Tick {
    pub norm: Norm,
    pub time: ApparentTime,
    /// 0 = minor; higher is taller.
    pub tier: u8,
    pub label: Option<String>,
}

/// Ruler label: `m:ss` or `m:ss.s` when ticks are sub-second.
pub fn format_tick_label(t: ApparentTime, interval: f64) -> String {
    let secs = t.secs().max(0.0);
    if interval < 1.0 {
        let tenths = (secs * 10.0).round() as u64;
        format!("{}:{:04.1}", tenths / 600, (tenths % 600) as f64 / 10.0)
    } else {
        let total = secs.round() as u64;
        format!("{}:{:02}", total / 60, total % 60)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    pub zoom: f64,
    pub time_span_start: ApparentTime,
    pub time_span_end: ApparentTime,
    pub play_head_time: ApparentTime,
    zoom_value: f64,
    pan: f64,
    time_span_at_normal_zoom: f64,
    zoom_min: f64,
    zoom_max: f64,
}

impl ViewState {
    /// Starts at the zoom slider position closest to zoom 1.0, panned to the start.
    pub fn new(settings: &TimelineSettings) -> Self {
        let range = settings.zoom_max - settings.zoom_min;
        let zoom_value = if range > 0.0 {
            ((settings.zoom_max - 1.0) / range).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let mut view = Self {
            zoom: 1.0,
            time_span_start: ApparentTime::ZERO,
            time_span_end: ApparentTime::ZERO,
            play_head_time: ApparentTime::ZERO,
            zoom_value,
            pan: 0.0,
            time_span_at_normal_zoom: settings.time_span_at_normal_zoom,
            zoom_min: settings.zoom_min,
            zoom_max: settings.zoom_max,
        };
        view.zoom = view.zoom_for(zoom_value);
        view.refresh(0.0);
        view
    }

    fn zoom_for(&self, value: f64) -> f64 {
        self.zoom_max + value * (self.zoom_min - self.zoom_max)
    }

    /// Visible window width in seconds.
    pub fn zoomed_span(&self) -> f64 {
        self.time_span_at_normal_zoom * self.zoom
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.time_span_start, self.zoomed_span())
    }

    pub fn zoom_value(&self) -> f64 {
        self.zoom_value
    }

    pub fn pan(&self) -> f64 {
        self.pan
    }

    /// Zoom slider: 0 = `zoom_max` (widest), 1 = `zoom_min` (closest).
    pub fn set_zoom(&mut self, value: f64, total_duration: f64) {
        self.zoom_value = value.clamp(0.0, 1.0);
        self.zoom = self.zoom_for(self.zoom_value);
        self.set_time(self.pan, total_duration);
    }

    /// Pan slider over the scrollable range. Pinned to 0 when everything fits.
    pub fn set_time(&mut self, value: f64, total_duration: f64) {
        self.pan = value.clamp(0.0, 1.0);
        let span = self.zoomed_span();
        self.time_span_start = if total_duration <= span {
            ApparentTime::ZERO
        } else {
            ApparentTime(self.pan * (total_duration - span))
        };
        self.time_span_end = self.time_span_start + span;
    }

    /// Reapply zoom and pan after the content length changed.
    pub fn refresh(&mut self, total_duration: f64) {
        self.set_time(self.pan, total_duration);
    }

    /// Ruler ticks inside `[time_span_start, time_span_end]`.
    pub fn ticks(&self) -> Vec<Tick> {
        let span = self.zoomed_span();
        if span <= 0.0 || !span.is_finite() {
            return Vec::new();
        }
        let band = tick_band(span);
        let interval = tick_interval(band, span);
        let window = self.window();
        let first = (self.time_span_start.secs() / interval - 1e-9).ceil().max(0.0) as u64;
        let last = (self.time_span_end.secs() / interval + 1e-9).floor().max(0.0) as u64;

        (first..=last)
            .map(|k| {
                let time = ApparentTime(k as f64 * interval);
                let tier = band.majors.iter().filter(|&&m| k % m == 0).count() as u8;
                let label = (tier as usize == band.majors.len())
                    .then(|| format_tick_label(time, interval));
                Tick {
                    norm: window.time_to_norm(time),
                    time,
                    tier,
                    label,
                }
            })
            .collect()
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(&TimelineSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_zoom_slider_is_inverse_linear() {
        let mut view = ViewState::default();
        view.set_zoom(0.0, 0.0);
        assert!(approx(view.zoom, 20.0));
        view.set_zoom(1.0, 0.0);
        assert!(approx(view.zoom, 0.02));
        assert!(approx(view.zoomed_span(), 1.2));
        view.set_zoom(7.0, 0.0);
        assert!(approx(view.zoom_value(), 1.0));
    }

    #[test]
    fn test_default_starts_near_normal_zoom() {
        let view = ViewState::default();
        assert!(approx(view.zoom, 1.0));
        assert!(approx(view.zoomed_span(), 60.0));
    }

    #[test]
    fn test_pan_pinned_when_content_fits() {
        let mut view = ViewState::default();
        view.set_time(0.7, 30.0);
        assert_eq!(view.time_span_start, ApparentTime::ZERO);
        assert!(approx(view.time_span_end.secs(), 60.0));
    }

    #[test]
    fn test_pan_fraction_of_scrollable_range() {
        let mut view = ViewState::default();
        view.set_time(0.5, 160.0);
        // scrollable = 160 - 60
        assert!(approx(view.time_span_start.secs(), 50.0));
        assert!(approx(view.time_span_end.secs(), 110.0));

        view.set_time(1.0, 160.0);
        assert!(approx(view.time_span_end.secs(), 160.0));
    }

    #[test]
    fn test_zoom_reapplies_pan() {
        let mut view = ViewState::default();
        view.set_time(1.0, 300.0);
        assert!(approx(view.time_span_start.secs(), 240.0));
        view.set_zoom(1.0, 300.0);
        // Window end stays pinned to the content end
        assert!(approx(view.time_span_end.secs(), 300.0));
    }

    #[test]
    fn test_refresh_after_duration_change() {
        let mut view = ViewState::default();
        view.set_time(1.0, 200.0);
        view.refresh(50.0);
        assert_eq!(view.time_span_start, ApparentTime::ZERO);
    }

    #[test]
    fn test_tick_band_lookup() {
        assert!(approx(tick_band(1.2).interval, 0.05));
        assert!(approx(tick_band(60.0).interval, 1.0));
        assert!(approx(tick_band(1000.0).interval, 30.0));
        assert!(approx(tick_band(1e6).interval, 3600.0));
    }

    #[test]
    fn test_tick_count_bounded_at_extreme_zoom_out() {
        let settings = TimelineSettings {
            zoom_max: 1e5,
            ..TimelineSettings::default()
        };
        let mut view = ViewState::new(&settings);
        view.set_zoom(0.0, 0.0);
        assert!(approx(view.zoomed_span(), 6e6));

        let ticks = view.ticks();
        assert!(!ticks.is_empty());
        assert!(ticks.len() as f64 <= MAX_TICKS + 1.0);
        // 3600s stepped up to 36000s
        assert!(approx(ticks[1].time.secs(), 36000.0));
    }

    #[test]
    fn test_ticks_within_window_with_tiers() {
        let mut view = ViewState::default();
        view.set_time(0.5, 160.0); // window [50, 110], 1s ticks

        let ticks = view.ticks();
        assert_eq!(ticks.len(), 61);
        assert!(ticks.iter().all(|t| t.norm.is_visible()));
        assert!(approx(ticks[0].time.secs(), 50.0));
        assert_eq!(ticks[0].tier, 2);
        assert_eq!(ticks[0].label.as_deref(), Some("0:50"));
        assert_eq!(ticks[5].tier, 1);
        assert!(ticks[5].label.is_none());
        assert_eq!(ticks[1].tier, 0);
    }

    #[test]
    fn test_tick_labels() {
        assert_eq!(format_tick_label(ApparentTime(125.0), 5.0), "2:05");
        assert_eq!(format_tick_label(ApparentTime(2.5), 0.05), "0:02.5");
        assert_eq!(format_tick_label(ApparentTime(61.0), 0.1), "1:01.0");
    }
}

//! Time units used by the timeline.
//!
//! Three coordinate systems coexist in the editor and are easy to mix up:
//! - [`ApparentTime`]: seconds on the post-cut timeline (what the viewer sees)
//! - [`SourceTime`]: seconds inside one original, uncut clip
//! - [`Norm`]: horizontal position across the visible window, `[0,1]` when visible
//!
//! Durations are plain `f64` seconds and combine with either time unit.
//! All three serialize as bare numbers.

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Timeline positions closer than this are the same instant.
pub const TIME_EPSILON: f64 = 1e-9;

macro_rules! seconds_unit {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub f64);

        impl $name {
            pub const ZERO: Self = Self(0.0);

            #[inline]
            pub fn secs(self) -> f64 {
                self.0
            }

            #[inline]
            pub fn min(self, other: Self) -> Self {
                Self(self.0.min(other.0))
            }

            #[inline]
            pub fn max(self, other: Self) -> Self {
                Self(self.0.max(other.0))
            }

            #[inline]
            pub fn clamp(self, lo: Self, hi: Self) -> Self {
                Self(self.0.max(lo.0).min(hi.0))
            }
        }

        impl From<f64> for $name {
            fn from(secs: f64) -> Self {
                Self(secs)
            }
        }

        /// Shift by a duration.
        impl Add<f64> for $name {
            type Output = Self;
            fn add(self, rhs: f64) -> Self {
                Self(self.0 + rhs)
            }
        }

        impl Sub<f64> for $name {
            type Output = Self;
            fn sub(self, rhs: f64) -> Self {
                Self(self.0 - rhs)
            }
        }

        impl AddAssign<f64> for $name {
            fn add_assign(&mut self, rhs: f64) {
                self.0 += rhs;
            }
        }

        impl SubAssign<f64> for $name {
            fn sub_assign(&mut self, rhs: f64) {
                self.0 -= rhs;
            }
        }

        /// Distance between two instants of the same unit, in seconds.
        impl Sub for $name {
            type Output = f64;
            fn sub(self, rhs: Self) -> f64 {
                self.0 - rhs.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:.2}", self.0)
            }
        }
    };
}

seconds_unit!(
    /// Position on the post-cut ("apparent") timeline, in seconds.
    ApparentTime
);

seconds_unit!(
    /// Offset into an original, uncut clip, in seconds.
    /// Cut inpoints/outpoints live here and never move when other cuts change.
    SourceTime
);

/// Normalized horizontal position across the visible time window.
/// Values outside `[0,1]` are off-screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Norm(pub f64);

impl Norm {
    pub const START: Self = Self(0.0);
    pub const END: Self = Self(1.0);

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn clamp(self, lo: Self, hi: Self) -> Self {
        Self(self.0.max(lo.0).min(hi.0))
    }

    /// Inside the visible window.
    #[inline]
    pub fn is_visible(self) -> bool {
        (0.0..=1.0).contains(&self.0)
    }
}

impl From<f64> for Norm {
    fn from(v: f64) -> Self {
        Self(v)
    }
}

/// Visible window of the apparent timeline.
///
/// Pure conversions, no clamping: callers clamp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeWindow {
    pub start: ApparentTime,
    /// Window width in seconds (`time_span_at_normal_zoom * zoom`).
    pub span: f64,
}

impl TimeWindow {
    pub fn new(start: ApparentTime, span: f64) -> Self {
        Self { start, span }
    }

    pub fn end(&self) -> ApparentTime {
        self.start + self.span
    }

    pub fn time_to_norm(&self, t: ApparentTime) -> Norm {
        if self.span <= 0.0 {
            return Norm::START;
        }
        Norm((t - self.start) / self.span)
    }

    pub fn norm_to_time(&self, n: Norm) -> ApparentTime {
        self.start + n.0 * self.span
    }

    /// Width of a duration in normalized units.
    pub fn secs_to_norm_width(&self, secs: f64) -> f64 {
        if self.span <= 0.0 { 0.0 } else { secs / self.span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_norm_time_roundtrip() {
        let windows = [
            TimeWindow::new(ApparentTime(0.0), 60.0),
            TimeWindow::new(ApparentTime(12.5), 3.0),
            TimeWindow::new(ApparentTime(100.0), 1200.0),
        ];
        for w in windows {
            for n in [-0.5, 0.0, 0.123, 0.5, 1.0, 2.75] {
                let back = w.time_to_norm(w.norm_to_time(Norm(n)));
                assert!((back.get() - n).abs() < EPS, "window {:?} n={}", w, n);
            }
        }
    }

    #[test]
    fn test_conversions_do_not_clamp() {
        let w = TimeWindow::new(ApparentTime(10.0), 20.0);
        assert!((w.time_to_norm(ApparentTime(0.0)).get() + 0.5).abs() < EPS);
        assert!((w.norm_to_time(Norm(1.5)).secs() - 40.0).abs() < EPS);
        assert!(!Norm(1.5).is_visible());
        assert!(Norm(1.0).is_visible());
    }

    #[test]
    fn test_unit_arithmetic() {
        let a = ApparentTime(4.0);
        let b = ApparentTime(1.5);
        assert_eq!(a - b, 2.5);
        assert_eq!(a + 1.0, ApparentTime(5.0));
        let mut s = SourceTime(2.0);
        s += 0.5;
        s -= 1.0;
        assert_eq!(s, SourceTime(1.5));
        assert_eq!(format!("{}", ApparentTime(2.0)), "2.00");
    }

    #[test]
    fn test_serializes_as_bare_number() {
        let json = serde_json::to_string(&ApparentTime(2.5)).unwrap();
        assert_eq!(json, "2.5");
        let t: SourceTime = serde_json::from_str("4").unwrap();
        assert_eq!(t, SourceTime(4.0));
    }
}

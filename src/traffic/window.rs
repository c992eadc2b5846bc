//! Circular time-of-day windows and the slider filter state.

use anyhow::{Result, bail};
use chrono::NaiveTime;

use super::minutes::MINUTES_PER_DAY;

/// Window half-width in minutes used by the time slider.
pub const WINDOW_RADIUS: u16 = 60;

/// A half-open circular minute window `[min, max)` over the 1440-minute day.
///
/// Both windowing paths share this one struct: the direct per-trip filter
/// calls [`TimeWindow::contains`] and the bucketed path calls
/// [`TimeWindow::select`], so their membership arithmetic cannot drift
/// apart. A window with `min > max` wraps across midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub min: u16,
    pub max: u16,
}

impl TimeWindow {
    /// Builds the window centered on `center` with the given half-width.
    pub fn around(center: u16, radius: u16) -> Self {
        let day = MINUTES_PER_DAY as i32;
        let min = (i32::from(center) - i32::from(radius) + 1).rem_euclid(day) as u16;
        let max = ((i32::from(center) + i32::from(radius)) % day) as u16;
        Self { min, max }
    }

    pub fn wraps(&self) -> bool {
        self.min > self.max
    }

    /// Whether a minute-of-day falls inside the window.
    pub fn contains(&self, minute: u16) -> bool {
        if self.wraps() {
            minute >= self.min || minute < self.max
        } else {
            self.min <= minute && minute < self.max
        }
    }

    /// Flattens the buckets falling inside the window into one index list.
    ///
    /// A wrapping window concatenates the pre-midnight slice `[min, 1440)`
    /// with the post-midnight slice `[0, max)`; no bucket is visited twice
    /// or skipped in either branch.
    pub fn select(&self, buckets: &[Vec<usize>]) -> Vec<usize> {
        let (min, max) = (usize::from(self.min), usize::from(self.max));
        if self.wraps() {
            buckets[min..]
                .iter()
                .chain(buckets[..max].iter())
                .flatten()
                .copied()
                .collect()
        } else {
            buckets[min..max].iter().flatten().copied().collect()
        }
    }
}

/// The time slider state: a center minute or the "all trips" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFilter {
    #[default]
    All,
    Minute(u16),
}

impl TimeFilter {
    /// Maps the raw slider integer onto the filter; `-1` means no filter.
    pub fn from_raw(raw: i32) -> Result<Self> {
        match raw {
            -1 => Ok(TimeFilter::All),
            m if (0..MINUTES_PER_DAY as i32).contains(&m) => Ok(TimeFilter::Minute(m as u16)),
            _ => bail!("time filter out of range: {raw} (expected -1..=1439)"),
        }
    }

    /// The raw slider integer for this filter.
    pub fn raw(&self) -> i32 {
        match self {
            TimeFilter::All => -1,
            TimeFilter::Minute(m) => i32::from(*m),
        }
    }

    /// The ±60-minute window, or `None` when no filter is active.
    pub fn window(&self) -> Option<TimeWindow> {
        match self {
            TimeFilter::All => None,
            TimeFilter::Minute(m) => Some(TimeWindow::around(*m, WINDOW_RADIUS)),
        }
    }

    /// Display label, e.g. `8:30 AM` or `any time`.
    pub fn label(&self) -> String {
        match self {
            TimeFilter::All => "any time".to_string(),
            TimeFilter::Minute(m) => {
                let t = NaiveTime::from_hms_opt(u32::from(*m) / 60, u32::from(*m) % 60, 0)
                    .unwrap_or(NaiveTime::MIN);
                t.format("%-I:%M %p").to_string()
            }
        }
    }
}

//! Calendar helpers for the daily and weekly aggregates
//!
//! All day boundaries are UTC. A day `d` covers `[d 00:00, d+1 00:00)`.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};

/// Half-open UTC instant range covering one calendar day
pub fn day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day.and_time(chrono::NaiveTime::MIN).and_utc();
    let end = day
        .checked_add_days(Days::new(1))
        .map_or(DateTime::<Utc>::MAX_UTC, |next| next.and_time(chrono::NaiveTime::MIN).and_utc());
    (start, end)
}

/// Seven-day window starting at `start`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    start: NaiveDate,
}

impl WeekWindow {
    /// Window starting at an arbitrary day (not forced to a Monday)
    pub const fn starting(start: NaiveDate) -> Self {
        Self { start }
    }

    /// Monday-anchored week containing `day`
    pub fn containing(day: NaiveDate) -> Self {
        let offset = u64::from(day.weekday().num_days_from_monday());
        Self {
            start: day - Days::new(offset),
        }
    }

    /// Monday-anchored week before the one containing `day`
    pub fn previous(day: NaiveDate) -> Self {
        let current = Self::containing(day);
        Self {
            start: current.start - Days::new(7),
        }
    }

    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the window (inclusive)
    pub fn end(&self) -> NaiveDate {
        self.start + Days::new(6)
    }

    /// Each day of the window, in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..7u64).map(move |offset| start + Days::new(offset))
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && day <= self.end()
    }
}

/// Bucket per-day counts into seven slots relative to `start`.
///
/// Days with no row report 0; rows outside the window are ignored.
pub fn weekly_histogram(start: NaiveDate, rows: &[(NaiveDate, i64)]) -> [i64; 7] {
    let mut buckets = [0i64; 7];
    for (day, count) in rows {
        let offset = day.signed_duration_since(start).num_days();
        if let Ok(index) = usize::try_from(offset) {
            if let Some(slot) = buckets.get_mut(index) {
                *slot += count;
            }
        }
    }
    buckets
}

/// Abbreviated weekday names for the seven days starting at `start`
pub fn weekly_labels(start: NaiveDate) -> Vec<String> {
    WeekWindow::starting(start)
        .days()
        .map(|day| day.format("%a").to_string())
        .collect()
}

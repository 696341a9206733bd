//! Inclusive date range bounding which events a run considers.

use chrono::{DateTime, NaiveDate, Utc};

/// Inclusive calendar-date window, evaluated in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateWindow {
    /// Creates a window, returning `None` when `from` is after `to`.
    #[must_use]
    pub fn new(from: NaiveDate, to: NaiveDate) -> Option<Self> {
        (from <= to).then_some(Self { from, to })
    }

    /// Returns the first date in the window.
    #[must_use]
    pub const fn from(&self) -> NaiveDate {
        self.from
    }

    /// Returns the last date in the window.
    #[must_use]
    pub const fn to(&self) -> NaiveDate {
        self.to
    }

    /// Returns whether the instant falls on a date inside the window.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let date = instant.date_naive();
        self.from <= date && date <= self.to
    }
}

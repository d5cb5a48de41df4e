//! Date-window filtering.

use crate::Post;
use chrono::{DateTime, NaiveDate, Utc};

/// One UTC calendar day as an inclusive timestamp range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    /// 00:00:00.000 of the requested date
    pub start: DateTime<Utc>,
    /// 23:59:59.999 of the requested date
    pub end: DateTime<Utc>,
}

impl DateWindow {
    /// Build the window for a calendar date.
    pub fn for_date(date: NaiveDate) -> Self {
        // Both wall-clock times are valid for every calendar date.
        let start = date.and_hms_milli_opt(0, 0, 0, 0).unwrap().and_utc();
        let end = date.and_hms_milli_opt(23, 59, 59, 999).unwrap().and_utc();
        Self { start, end }
    }

    /// Whether a timestamp falls inside the window, bounds inclusive.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts <= self.end
    }

    /// Whether a post belongs to this day.
    ///
    /// Posts without a parsable `featured_at` are always rejected; an absent
    /// timestamp is never assumed in-window.
    pub fn accepts(&self, post: &Post) -> bool {
        post.featured_at_utc().is_some_and(|ts| self.contains(ts))
    }
}

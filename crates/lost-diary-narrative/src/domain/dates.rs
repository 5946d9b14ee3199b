//! Derived diary dates.
//!
//! Diary entries are stamped with dates inside a 24-day window that ends on
//! the day the session starts, so the story always reads as recent.

use chrono::{Days, NaiveDate};
use lost_diary_core::clock::Clock;

/// Length of the diary window in days.
pub const STORY_SPAN_DAYS: u64 = 24;

/// Narrative anchor days, counted from the first diary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Anchor {
    /// First entry.
    Day0,
    /// Day 1.
    Day1,
    /// Day 3.
    Day3,
    /// Day 6.
    Day6,
    /// Day 10.
    Day10,
    /// Day 16.
    Day16,
    /// Day 21.
    Day21,
    /// Day 23.
    Day23,
    /// Last entry, the day of the session.
    Day24,
}

impl Anchor {
    /// All anchors in chronological order.
    pub const ALL: [Self; 9] = [
        Self::Day0,
        Self::Day1,
        Self::Day3,
        Self::Day6,
        Self::Day10,
        Self::Day16,
        Self::Day21,
        Self::Day23,
        Self::Day24,
    ];

    /// Days after the first entry.
    #[must_use]
    pub const fn offset_days(self) -> u64 {
        match self {
            Self::Day0 => 0,
            Self::Day1 => 1,
            Self::Day3 => 3,
            Self::Day6 => 6,
            Self::Day10 => 10,
            Self::Day16 => 16,
            Self::Day21 => 21,
            Self::Day23 => 23,
            Self::Day24 => 24,
        }
    }

    /// Human label, e.g. `day 3`.
    #[must_use]
    pub fn label(self) -> String {
        format!("day {}", self.offset_days())
    }
}

/// Formats a date as `Month Day, Year`, e.g. `March 5, 2025`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Anchor dates for one session. Computed once, never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedDates {
    today: NaiveDate,
    anchors: [NaiveDate; 9],
}

impl DerivedDates {
    /// Derives the anchors for a session starting on `today`.
    #[must_use]
    pub fn derive(today: NaiveDate) -> Self {
        let first_day = today - Days::new(STORY_SPAN_DAYS);
        let anchors = Anchor::ALL.map(|anchor| first_day + Days::new(anchor.offset_days()));
        Self { today, anchors }
    }

    /// Derives the anchors from the clock's current date.
    #[must_use]
    pub fn from_clock(clock: &dyn Clock) -> Self {
        Self::derive(clock.today())
    }

    /// Date of `anchor`.
    #[must_use]
    pub fn date(&self, anchor: Anchor) -> NaiveDate {
        self.anchors[anchor as usize]
    }

    /// Formatted date of `anchor`.
    #[must_use]
    pub fn formatted(&self, anchor: Anchor) -> String {
        format_date(self.date(anchor))
    }

    /// Formatted session date.
    #[must_use]
    pub fn today(&self) -> String {
        format_date(self.today)
    }

    /// Formatted date of the first entry.
    #[must_use]
    pub fn first_day(&self) -> String {
        format_date(self.anchors[0])
    }

    /// `(anchor, date)` pairs in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (Anchor, NaiveDate)> + '_ {
        Anchor::ALL.iter().map(|anchor| (*anchor, self.date(*anchor)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use lost_diary_test_support::FixedClock;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_derive_spans_window_ending_today() {
        // Arrange
        let today = ymd(2025, 4, 5);

        // Act
        let dates = DerivedDates::derive(today);

        // Assert
        assert_eq!(dates.date(Anchor::Day0), ymd(2025, 3, 12));
        assert_eq!(dates.date(Anchor::Day1), ymd(2025, 3, 13));
        assert_eq!(dates.date(Anchor::Day3), ymd(2025, 3, 15));
        assert_eq!(dates.date(Anchor::Day6), ymd(2025, 3, 18));
        assert_eq!(dates.date(Anchor::Day10), ymd(2025, 3, 22));
        assert_eq!(dates.date(Anchor::Day16), ymd(2025, 3, 28));
        assert_eq!(dates.date(Anchor::Day21), ymd(2025, 4, 2));
        assert_eq!(dates.date(Anchor::Day23), ymd(2025, 4, 4));
        assert_eq!(dates.date(Anchor::Day24), today);
    }

    #[test]
    fn test_anchors_are_non_decreasing_and_end_today() {
        let today = ymd(2024, 3, 1);
        let dates = DerivedDates::derive(today);

        let ordered: Vec<NaiveDate> = dates.iter().map(|(_, date)| date).collect();

        assert_eq!(ordered.len(), 9);
        assert!(ordered.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(ordered.last().copied(), Some(today));
        // Crosses the leap day.
        assert_eq!(dates.date(Anchor::Day0), ymd(2024, 2, 6));
    }

    #[test]
    fn test_formats_month_day_year() {
        let dates = DerivedDates::derive(ymd(2025, 4, 5));

        assert_eq!(dates.formatted(Anchor::Day0), "March 12, 2025");
        assert_eq!(dates.today(), "April 5, 2025");
        assert_eq!(dates.first_day(), "March 12, 2025");
    }

    #[test]
    fn test_from_clock_uses_clock_date() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap());

        let dates = DerivedDates::from_clock(&clock);

        assert_eq!(dates.date(Anchor::Day24), ymd(2026, 1, 15));
        assert_eq!(dates.formatted(Anchor::Day0), "December 22, 2025");
    }

    #[test]
    fn test_anchor_labels() {
        assert_eq!(Anchor::Day0.label(), "day 0");
        assert_eq!(Anchor::Day24.label(), "day 24");
    }
}

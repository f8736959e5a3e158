//! Period presets and the date windows they resolve to.
//!
//! All windows are computed relative to an explicit reference instant so
//! callers (and tests) control what "now" means. Calendar boundaries use the
//! UTC calendar.

use std::str::FromStr;

use time::{Date, Duration, Month, OffsetDateTime};

use crate::Error;

/// The time window a summary report is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// The trailing seven days ending at the reference instant.
    Week,
    /// The calendar month containing the reference instant.
    Month,
    /// The calendar year containing the reference instant.
    Year,
}

impl Period {
    /// The value used for this period in query strings.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(Error::InvalidPeriod(other.to_owned())),
        }
    }
}

/// A half-open time range `[start, end)` used to scope an aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodWindow {
    /// The first instant inside the window.
    pub start: OffsetDateTime,
    /// The first instant after the window.
    pub end: OffsetDateTime,
}

impl PeriodWindow {
    /// Whether `instant` falls within the window.
    pub fn contains(&self, instant: OffsetDateTime) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Compute the window for `period` relative to the reference instant `now`.
pub fn period_window(period: Period, now: OffsetDateTime) -> PeriodWindow {
    match period {
        Period::Week => PeriodWindow {
            start: now - Duration::days(7),
            end: now,
        },
        Period::Month => month_window(now.year(), now.month()),
        Period::Year => year_window(now.year()),
    }
}

/// The window covering the calendar month containing `now`.
pub fn current_month_window(now: OffsetDateTime) -> PeriodWindow {
    month_window(now.year(), now.month())
}

/// The window covering the calendar month immediately before the one
/// containing `now`.
pub fn previous_month_window(now: OffsetDateTime) -> PeriodWindow {
    let (year, month) = match now.month() {
        Month::January => (now.year() - 1, Month::December),
        month => (now.year(), month.previous()),
    };

    month_window(year, month)
}

fn month_window(year: i32, month: Month) -> PeriodWindow {
    let (end_year, end_month) = match month {
        Month::December => (year + 1, Month::January),
        month => (year, month.next()),
    };

    PeriodWindow {
        start: first_moment_of(year, month),
        end: first_moment_of(end_year, end_month),
    }
}

fn year_window(year: i32) -> PeriodWindow {
    PeriodWindow {
        start: first_moment_of(year, Month::January),
        end: first_moment_of(year + 1, Month::January),
    }
}

fn first_moment_of(year: i32, month: Month) -> OffsetDateTime {
    Date::from_calendar_date(year, month, 1)
        .expect("invalid month start date")
        .midnight()
        .assume_utc()
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::Error;

    use super::{Period, period_window, previous_month_window};

    #[test]
    fn parses_known_periods() {
        assert_eq!("week".parse::<Period>(), Ok(Period::Week));
        assert_eq!("month".parse::<Period>(), Ok(Period::Month));
        assert_eq!("year".parse::<Period>(), Ok(Period::Year));
    }

    #[test]
    fn rejects_unknown_periods() {
        assert_eq!(
            "decade".parse::<Period>(),
            Err(Error::InvalidPeriod("decade".to_owned()))
        );
        assert_eq!(
            "Month".parse::<Period>(),
            Err(Error::InvalidPeriod("Month".to_owned()))
        );
    }

    #[test]
    fn week_window_is_the_trailing_seven_days() {
        let now = datetime!(2025-10-15 09:30 UTC);

        let window = period_window(Period::Week, now);

        assert_eq!(window.start, datetime!(2025-10-08 09:30 UTC));
        assert_eq!(window.end, now);
    }

    #[test]
    fn month_window_covers_the_calendar_month() {
        let window = period_window(Period::Month, datetime!(2025-10-15 09:30 UTC));

        assert_eq!(window.start, datetime!(2025-10-01 00:00 UTC));
        assert_eq!(window.end, datetime!(2025-11-01 00:00 UTC));
    }

    #[test]
    fn month_window_rolls_over_at_year_end() {
        let window = period_window(Period::Month, datetime!(2025-12-15 09:30 UTC));

        assert_eq!(window.start, datetime!(2025-12-01 00:00 UTC));
        assert_eq!(window.end, datetime!(2026-01-01 00:00 UTC));
    }

    #[test]
    fn year_window_covers_the_calendar_year() {
        let window = period_window(Period::Year, datetime!(2025-10-15 09:30 UTC));

        assert_eq!(window.start, datetime!(2025-01-01 00:00 UTC));
        assert_eq!(window.end, datetime!(2026-01-01 00:00 UTC));
    }

    #[test]
    fn previous_month_window_crosses_year_boundary() {
        let window = previous_month_window(datetime!(2025-01-15 09:30 UTC));

        assert_eq!(window.start, datetime!(2024-12-01 00:00 UTC));
        assert_eq!(window.end, datetime!(2025-01-01 00:00 UTC));
    }

    #[test]
    fn windows_are_half_open() {
        let window = period_window(Period::Month, datetime!(2025-10-15 09:30 UTC));

        assert!(window.contains(datetime!(2025-10-01 00:00 UTC)));
        assert!(window.contains(datetime!(2025-10-31 23:59:59 UTC)));
        assert!(!window.contains(datetime!(2025-11-01 00:00 UTC)));
        assert!(!window.contains(datetime!(2025-09-30 23:59:59 UTC)));
    }
}

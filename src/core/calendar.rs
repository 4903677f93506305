use chrono::{Datelike, Months, NaiveDate};
use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("{months} months after {reference} is outside the supported calendar")]
    OutOfRange { reference: NaiveDate, months: u32 },
    #[error("invalid date {0:?}: expected YYYY-MM-DD or YYYY-MM")]
    InvalidDate(String),
}

/// A calendar month, rendered as `YYYY-MM`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The calendar month lying `months` after the month of `reference`.
pub fn add_months(reference: NaiveDate, months: u32) -> Result<YearMonth, CalendarError> {
    reference
        .with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(months)))
        .map(YearMonth::from)
        .ok_or(CalendarError::OutOfRange { reference, months })
}

/// Whole calendar months from the month of `reference` to the month of `target`.
/// Negative when the target month is already behind us.
pub fn months_until(reference: NaiveDate, target: NaiveDate) -> i64 {
    let years = i64::from(target.year()) - i64::from(reference.year());
    let months = i64::from(target.month()) - i64::from(reference.month());
    years * 12 + months
}

/// Accepts a full `YYYY-MM-DD` date or a bare `YYYY-MM` month (taken as its first day).
pub fn parse_date(raw: &str) -> Result<NaiveDate, CalendarError> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d"))
        .map_err(|_| CalendarError::InvalidDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert_eq, proptest};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn add_months_rolls_over_year_end() {
        let month = add_months(date(2024, 12, 4), 6).expect("in range");
        assert_eq!(month.to_string(), "2025-06");
    }

    #[test]
    fn add_months_ignores_day_of_month() {
        // Jan 31 + 1 month must land in February, not March.
        let month = add_months(date(2025, 1, 31), 1).expect("in range");
        assert_eq!(month, YearMonth { year: 2025, month: 2 });
    }

    #[test]
    fn add_zero_months_is_reference_month() {
        assert_eq!(add_months(date(2026, 10, 16), 0).expect("in range").to_string(), "2026-10");
    }

    #[test]
    fn add_months_reports_calendar_overflow() {
        let err = add_months(date(2026, 1, 1), u32::MAX).expect_err("must overflow");
        assert!(matches!(err, CalendarError::OutOfRange { .. }));
    }

    #[test]
    fn months_until_counts_across_several_years() {
        assert_eq!(months_until(date(2024, 12, 4), date(2025, 6, 30)), 6);
        assert_eq!(months_until(date(2024, 3, 1), date(2026, 3, 1)), 24);
        assert_eq!(months_until(date(2024, 3, 1), date(2024, 1, 1)), -2);
    }

    #[test]
    fn parse_date_accepts_day_and_month_precision() {
        assert_eq!(parse_date("2025-06-15").expect("date"), date(2025, 6, 15));
        assert_eq!(parse_date("2025-06").expect("month"), date(2025, 6, 1));
        assert!(parse_date("June 2025").is_err());
    }

    #[test]
    fn year_month_serializes_as_string() {
        let json = serde_json::to_string(&YearMonth { year: 2025, month: 3 }).expect("serialize");
        assert_eq!(json, "\"2025-03\"");
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_add_months_agrees_with_months_until(
            year in 1990i32..2100,
            month in 1u32..13,
            day in 1u32..29,
            offset in 0u32..600
        ) {
            let reference = date(year, month, day);
            let landed = add_months(reference, offset).expect("in range");
            let landed_date = date(landed.year, landed.month, 1);
            prop_assert_eq!(months_until(reference, landed_date), i64::from(offset));
        }
    }
}

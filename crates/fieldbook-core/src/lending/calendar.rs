use chrono::{Datelike, Months, NaiveDate};

use crate::error::FieldbookError;
use crate::FieldbookResult;

/// Advance `start` by whole calendar months.
///
/// The day of month is clamped to the last valid day of the target month,
/// so 2024-01-31 + 1 month lands on 2024-02-29. Because of that clamp,
/// `add_months(add_months(d, a), b)` can differ from `add_months(d, a + b)`
/// when `d` falls near a month end (2025-01-31 + 1 + 1 is Mar 28, while
/// 2025-01-31 + 2 is Mar 31).
pub fn add_months(start: NaiveDate, months: u32) -> FieldbookResult<NaiveDate> {
    start
        .checked_add_months(Months::new(months))
        .ok_or_else(|| {
            FieldbookError::DateError(format!(
                "{start} + {months} months is outside the supported date range"
            ))
        })
}

/// Number of days in the given month (1-12).
pub fn days_in_month(year: i32, month: u32) -> FieldbookResult<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        FieldbookError::DateError(format!("invalid year/month: {year}-{month:02}"))
    })?;
    let last = add_months(first, 1)?
        .pred_opt()
        .ok_or_else(|| FieldbookError::DateError(format!("no last day for {year}-{month:02}")))?;
    Ok(last.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_add_zero_months() {
        assert_eq!(add_months(date(2025, 3, 15), 0).unwrap(), date(2025, 3, 15));
    }

    #[test]
    fn test_add_months_crosses_year() {
        assert_eq!(add_months(date(2025, 11, 10), 3).unwrap(), date(2026, 2, 10));
        assert_eq!(add_months(date(2025, 1, 1), 36).unwrap(), date(2028, 1, 1));
    }

    #[test]
    fn test_month_end_clamped() {
        assert_eq!(add_months(date(2023, 1, 31), 1).unwrap(), date(2023, 2, 28));
        assert_eq!(add_months(date(2024, 1, 31), 1).unwrap(), date(2024, 2, 29));
        assert_eq!(add_months(date(2024, 3, 31), 1).unwrap(), date(2024, 4, 30));
    }

    #[test]
    fn test_composition_equal_away_from_month_end() {
        let start = date(2025, 5, 12);
        let stepped = add_months(add_months(start, 7).unwrap(), 19).unwrap();
        assert_eq!(stepped, add_months(start, 26).unwrap());
    }

    #[test]
    fn test_composition_not_associative_at_month_end() {
        let start = date(2025, 1, 31);
        let stepped = add_months(add_months(start, 1).unwrap(), 1).unwrap();
        assert_eq!(stepped, date(2025, 3, 28));
        assert_eq!(add_months(start, 2).unwrap(), date(2025, 3, 31));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2023, 2).unwrap(), 28);
        assert_eq!(days_in_month(2024, 2).unwrap(), 29);
        assert_eq!(days_in_month(2024, 12).unwrap(), 31);
        assert_eq!(days_in_month(2024, 9).unwrap(), 30);
        assert!(days_in_month(2024, 13).is_err());
    }
}

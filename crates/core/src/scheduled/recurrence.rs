//! Occurrence date math for scheduled payments.
//!
//! Month-based cadences anchor on the schedule's start day-of-month and clamp
//! to shorter months. A schedule started on the 31st lands on Feb 29 and
//! returns to Mar 31 rather than sticking to the 29th for good.

use chrono::{Datelike, Days, NaiveDate};

use super::scheduled_model::Recurrence;

/// The occurrence after `from` for a schedule anchored at `start_date`.
///
/// Returns `None` for ONCE (no further occurrence) or when the date would
/// leave the representable range.
pub fn next_occurrence(
    recurrence: Recurrence,
    start_date: NaiveDate,
    from: NaiveDate,
) -> Option<NaiveDate> {
    match recurrence {
        Recurrence::Once => None,
        Recurrence::Daily => from.checked_add_days(Days::new(1)),
        Recurrence::Weekly => from.checked_add_days(Days::new(7)),
        Recurrence::Biweekly => from.checked_add_days(Days::new(14)),
        Recurrence::Monthly => add_months_anchored(from, 1, start_date.day()),
        Recurrence::Quarterly => add_months_anchored(from, 3, start_date.day()),
        Recurrence::Yearly => add_months_anchored(from, 12, start_date.day()),
    }
}

/// Steps `months` forward and lands on `anchor_day`, clamped to the target
/// month's length.
fn add_months_anchored(from: NaiveDate, months: i32, anchor_day: u32) -> Option<NaiveDate> {
    let total = from.year() * 12 + from.month0() as i32 + months;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    clamped_ymd(year, month, anchor_day)
}

/// The latest valid date at or before `day` in the given month.
fn clamped_ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    (1..=day)
        .rev()
        .find_map(|d| NaiveDate::from_ymd_opt(year, month, d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn chain(recurrence: Recurrence, start: NaiveDate, steps: usize) -> Vec<NaiveDate> {
        let mut dates = Vec::with_capacity(steps);
        let mut current = start;
        for _ in 0..steps {
            current = next_occurrence(recurrence, start, current).unwrap();
            dates.push(current);
        }
        dates
    }

    #[test]
    fn test_monthly_clamps_and_returns_to_the_anchor() {
        let start = date(2024, 1, 31);
        assert_eq!(
            chain(Recurrence::Monthly, start, 5),
            vec![
                date(2024, 2, 29),
                date(2024, 3, 31),
                date(2024, 4, 30),
                date(2024, 5, 31),
                date(2024, 6, 30),
            ]
        );
    }

    #[test]
    fn test_monthly_keeps_small_anchors_exact() {
        let start = date(2024, 1, 15);
        assert_eq!(
            chain(Recurrence::Monthly, start, 3),
            vec![date(2024, 2, 15), date(2024, 3, 15), date(2024, 4, 15)]
        );
    }

    #[test]
    fn test_quarterly_anchoring_across_a_year_boundary() {
        let start = date(2024, 1, 31);
        assert_eq!(
            chain(Recurrence::Quarterly, start, 4),
            vec![
                date(2024, 4, 30),
                date(2024, 7, 31),
                date(2024, 10, 31),
                date(2025, 1, 31),
            ]
        );
    }

    #[test]
    fn test_yearly_leap_day_returns_on_leap_years() {
        let start = date(2024, 2, 29);
        assert_eq!(
            chain(Recurrence::Yearly, start, 4),
            vec![
                date(2025, 2, 28),
                date(2026, 2, 28),
                date(2027, 2, 28),
                date(2028, 2, 29),
            ]
        );
    }

    #[test]
    fn test_day_based_cadences() {
        let start = date(2024, 3, 1);
        assert_eq!(
            next_occurrence(Recurrence::Daily, start, start),
            Some(date(2024, 3, 2))
        );
        assert_eq!(
            next_occurrence(Recurrence::Weekly, start, start),
            Some(date(2024, 3, 8))
        );
        assert_eq!(
            next_occurrence(Recurrence::Biweekly, start, start),
            Some(date(2024, 3, 15))
        );
    }

    #[test]
    fn test_once_has_no_next_occurrence() {
        let start = date(2024, 3, 1);
        assert_eq!(next_occurrence(Recurrence::Once, start, start), None);
    }

    #[test]
    fn test_december_wraps_into_january() {
        let start = date(2023, 12, 31);
        assert_eq!(
            next_occurrence(Recurrence::Monthly, start, start),
            Some(date(2024, 1, 31))
        );
    }

    proptest! {
        #[test]
        fn prop_next_occurrence_moves_strictly_forward(
            year in 2000i32..2100,
            month in 1u32..=12,
            day in 1u32..=28,
            recurrence_idx in 0usize..6,
        ) {
            let recurrences = [
                Recurrence::Daily,
                Recurrence::Weekly,
                Recurrence::Biweekly,
                Recurrence::Monthly,
                Recurrence::Quarterly,
                Recurrence::Yearly,
            ];
            let start = date(year, month, day);
            let next = next_occurrence(recurrences[recurrence_idx], start, start).unwrap();
            prop_assert!(next > start);
        }

        #[test]
        fn prop_monthly_day_is_the_clamped_anchor(
            year in 2000i32..2100,
            month in 1u32..=12,
            day in 1u32..=31,
        ) {
            prop_assume!(NaiveDate::from_ymd_opt(year, month, day).is_some());
            let start = date(year, month, day);
            let mut current = start;
            for _ in 0..24 {
                current = next_occurrence(Recurrence::Monthly, start, current).unwrap();
                // the day never drifts below the anchor unless the month is shorter
                let month_len = clamped_ymd(current.year(), current.month(), 31)
                    .unwrap()
                    .day();
                prop_assert_eq!(current.day(), day.min(month_len));
            }
        }
    }
}

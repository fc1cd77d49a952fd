use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Count working days (Mon-Fri) in `[start, end]` inclusive. Holidays are not
/// excluded; the calendar is weekday-only by policy.
pub fn count_working_days(start: NaiveDate, end: NaiveDate) -> u32 {
    if start > end {
        return 0;
    }
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| is_working_day(*d))
        .count() as u32
}

pub fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// End date of a span that starts at `start` and covers `working_days`
/// working days, skipping over weekends. `working_days` must be >= 1.
pub fn end_of_working_span(start: NaiveDate, working_days: u32) -> NaiveDate {
    let mut date = start;
    let mut remaining = working_days.max(1);
    loop {
        if is_working_day(date) {
            remaining -= 1;
            if remaining == 0 {
                return date;
            }
        }
        date = date + Days::new(1);
    }
}

/// First working day at or after `date`.
pub fn next_working_day(date: NaiveDate) -> NaiveDate {
    let mut d = date;
    while !is_working_day(d) {
        d = d + Days::new(1);
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn full_week_counts_five_working_days() {
        // 2026-03-02 is a Monday.
        assert_eq!(count_working_days(day(2026, 3, 2), day(2026, 3, 6)), 5);
        // Monday through Sunday still counts five.
        assert_eq!(count_working_days(day(2026, 3, 2), day(2026, 3, 8)), 5);
    }

    #[test]
    fn weekend_only_range_counts_zero() {
        // Saturday and Sunday.
        assert_eq!(count_working_days(day(2026, 3, 7), day(2026, 3, 8)), 0);
    }

    #[test]
    fn single_day_range() {
        assert_eq!(count_working_days(day(2026, 3, 4), day(2026, 3, 4)), 1);
        assert_eq!(count_working_days(day(2026, 3, 7), day(2026, 3, 7)), 0);
    }

    #[test]
    fn inverted_range_counts_zero() {
        assert_eq!(count_working_days(day(2026, 3, 6), day(2026, 3, 2)), 0);
    }

    #[test]
    fn ninety_calendar_days_span_counts_weekdays_only() {
        let start = day(2026, 3, 2);
        let end = start + chrono::Days::new(89);
        let counted = count_working_days(start, end);
        assert!(counted < 90);
        assert_eq!(counted, 65);
    }

    #[test]
    fn working_span_skips_weekends() {
        // 5 working days from a Monday end on Friday.
        assert_eq!(end_of_working_span(day(2026, 3, 2), 5), day(2026, 3, 6));
        // 6 working days from a Monday roll into the next week.
        assert_eq!(end_of_working_span(day(2026, 3, 2), 6), day(2026, 3, 9));
        // Starting on a Saturday begins counting from Monday.
        assert_eq!(end_of_working_span(day(2026, 3, 7), 1), day(2026, 3, 9));
    }

    #[test]
    fn next_working_day_rolls_over_weekend() {
        assert_eq!(next_working_day(day(2026, 3, 7)), day(2026, 3, 9));
        assert_eq!(next_working_day(day(2026, 3, 4)), day(2026, 3, 4));
    }
}

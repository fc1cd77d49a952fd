use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::advisory::burnout::BurnoutResult;
use crate::model::holiday::Holiday;
use crate::model::leave_request::LeaveRequest;
use crate::utils::working_days::{count_working_days, end_of_working_span, next_working_day};

/// Gap (days since last approved leave ended) that triggers a suggestion on
/// its own, independent of the burnout score.
const GAP_TRIGGER_DAYS: i64 = 60;
/// How far ahead to look for holidays worth bridging.
const HOLIDAY_LOOKAHEAD_DAYS: u64 = 60;
const SUGGESTED_SPAN_DAYS: u32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaveSuggestion {
    #[schema(example = "2026-03-09", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-03-11", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = 3)]
    pub working_days: u32,
    #[schema(example = "bridges the upcoming Spring Day holiday")]
    pub rationale: String,
}

/// Proactive leave windows for an employee whose burnout score or leave gap
/// crossed the trigger thresholds. Empty output means "no action needed".
pub fn suggest(
    burnout: &BurnoutResult,
    approved: &[LeaveRequest],
    holidays: &[Holiday],
    today: NaiveDate,
) -> Vec<LeaveSuggestion> {
    if burnout.score <= 60 && !gap_exceeded(approved, today) {
        return Vec::new();
    }

    let mut suggestions = Vec::new();

    if let Some((date, holiday)) = next_holiday(holidays, today) {
        let start = next_working_day(date + Days::new(1));
        let end = end_of_working_span(start, SUGGESTED_SPAN_DAYS);
        suggestions.push(LeaveSuggestion {
            start_date: start,
            end_date: end,
            working_days: SUGGESTED_SPAN_DAYS,
            rationale: format!("bridges the upcoming {} holiday", holiday.name),
        });
    }

    // A near-term breather regardless of the calendar.
    let start = next_monday(today);
    suggestions.push(LeaveSuggestion {
        start_date: start,
        end_date: end_of_working_span(start, SUGGESTED_SPAN_DAYS),
        working_days: SUGGESTED_SPAN_DAYS,
        rationale: format!(
            "burnout risk is {}; a short break soon beats a long one later",
            burnout.category
        ),
    });

    suggestions
}

fn gap_exceeded(approved: &[LeaveRequest], today: NaiveDate) -> bool {
    let last_end = approved
        .iter()
        .filter(|r| r.start_date <= today)
        .map(|r| r.end_date.min(today))
        .max();
    match last_end {
        Some(end) => (today - end).num_days() >= GAP_TRIGGER_DAYS,
        None => true,
    }
}

/// Earliest holiday observance strictly after `today` within the lookahead.
fn next_holiday(holidays: &[Holiday], today: NaiveDate) -> Option<(NaiveDate, &Holiday)> {
    let horizon = today + Days::new(HOLIDAY_LOOKAHEAD_DAYS);
    let mut date = today + Days::new(1);
    while date <= horizon {
        if let Some(holiday) = holidays.iter().find(|h| h.observed_on(date)) {
            return Some((date, holiday));
        }
        date = date + Days::new(1);
    }
    None
}

fn next_monday(today: NaiveDate) -> NaiveDate {
    let mut date = today + Days::new(1);
    while date.weekday() != Weekday::Mon {
        date = date + Days::new(1);
    }
    date
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::burnout::{BurnoutCategory, BurnoutResult};
    use crate::model::holiday::HolidayType;
    use crate::model::leave_request::{LeaveStatus, LeaveType};
    use chrono::Utc;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn burnt_out() -> BurnoutResult {
        BurnoutResult {
            employee_id: 1,
            score: 85,
            category: BurnoutCategory::Critical,
            factors: vec![],
            recommendations: vec![],
        }
    }

    fn rested() -> BurnoutResult {
        BurnoutResult {
            employee_id: 1,
            score: 15,
            category: BurnoutCategory::Low,
            factors: vec![],
            recommendations: vec![],
        }
    }

    fn recent_leave(today: NaiveDate) -> Vec<LeaveRequest> {
        let start = today - Days::new(10);
        let end = today - Days::new(6);
        vec![LeaveRequest {
            id: 0,
            employee_id: 1,
            leave_type: LeaveType::Annual,
            start_date: start,
            end_date: end,
            total_days: count_working_days(start, end),
            reason: "recent break on record".into(),
            status: LeaveStatus::Approved,
            applied_at: Utc::now(),
            manager_comment: None,
        }]
    }

    #[test]
    fn low_score_with_recent_leave_yields_nothing() {
        let today = day(2026, 3, 2);
        let out = suggest(&rested(), &recent_leave(today), &[], today);
        assert!(out.is_empty());
    }

    #[test]
    fn high_score_yields_a_window_even_without_holidays() {
        let today = day(2026, 3, 2);
        let out = suggest(&burnt_out(), &recent_leave(today), &[], today);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].start_date, day(2026, 3, 9));
        assert_eq!(out[0].end_date, day(2026, 3, 11));
    }

    #[test]
    fn long_gap_triggers_even_with_a_low_score() {
        let today = day(2026, 3, 2);
        let out = suggest(&rested(), &[], &[], today);
        assert!(!out.is_empty());
    }

    #[test]
    fn upcoming_holiday_produces_a_bridge_window() {
        let today = day(2026, 3, 2);
        let holidays = vec![Holiday {
            id: 1,
            name: "Spring Day".into(),
            // Wednesday.
            date: day(2026, 3, 18),
            kind: HolidayType::Company,
            is_recurring: false,
        }];
        let out = suggest(&burnt_out(), &[], &holidays, today);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].start_date, day(2026, 3, 19));
        assert!(out[0].rationale.contains("Spring Day"));
    }
}

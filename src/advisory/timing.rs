use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::holiday::Holiday;
use crate::model::leave_request::LeaveRequest;
use crate::utils::working_days::count_working_days;

const BASE_SCORE: i32 = 70;
const HOLIDAY_ADJACENCY_BONUS: i32 = 15;
const OVERLAP_PENALTY: i32 = 12;
const MAX_OVERLAP_PENALTY: i32 = 36;
const MONTH_END_PENALTY: i32 = 10;
const LONG_REQUEST_PENALTY: i32 = 5;
const LONG_REQUEST_DAYS: u32 = 10;
/// Calendar days around the range that count as "adjacent" to a holiday.
const ADJACENCY_DAYS: u64 = 3;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, ToSchema, strum_macros::Display,
)]
pub enum TimingLabel {
    Recommended,
    Acceptable,
    Risky,
    NotRecommended,
}

impl TimingLabel {
    fn from_score(score: u32) -> Self {
        match score {
            75..=100 => TimingLabel::Recommended,
            50..=74 => TimingLabel::Acceptable,
            30..=49 => TimingLabel::Risky,
            _ => TimingLabel::NotRecommended,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdviceResult {
    #[schema(example = 85)]
    pub score: u32,
    #[schema(example = "Recommended")]
    pub label: TimingLabel,
    pub factors: Vec<String>,
}

/// Score a proposed leave window. Higher is better timing. Inputs are the
/// holiday calendar and the teammates' approved leaves; the result is
/// advisory only and never blocks a submission.
pub fn advise(
    start: NaiveDate,
    end: NaiveDate,
    holidays: &[Holiday],
    teammate_leaves: &[LeaveRequest],
) -> AdviceResult {
    let mut score = BASE_SCORE;
    let mut factors = Vec::new();

    let adjacency_start = start - chrono::Days::new(ADJACENCY_DAYS);
    let adjacency_end = end + chrono::Days::new(ADJACENCY_DAYS);
    let adjacent_holiday = holidays.iter().find(|h| {
        adjacency_start
            .iter_days()
            .take_while(|d| *d <= adjacency_end)
            .any(|d| h.observed_on(d))
    });
    if let Some(holiday) = adjacent_holiday {
        score += HOLIDAY_ADJACENCY_BONUS;
        factors.push(format!("adjacent to {}", holiday.name));
    }

    let overlapping = teammate_leaves
        .iter()
        .filter(|l| l.start_date <= end && l.end_date >= start)
        .count();
    if overlapping > 0 {
        let penalty = (overlapping as i32 * OVERLAP_PENALTY).min(MAX_OVERLAP_PENALTY);
        score -= penalty;
        factors.push(format!("{overlapping} teammate(s) on leave in the same window"));
    }

    if touches_month_end(start, end) {
        score -= MONTH_END_PENALTY;
        factors.push("falls on month-end, typically a high-workload period".to_string());
    }

    let working_days = count_working_days(start, end);
    if working_days > LONG_REQUEST_DAYS {
        score -= LONG_REQUEST_PENALTY;
        factors.push(format!("long request: {working_days} working days"));
    }

    if factors.is_empty() {
        factors.push("no conflicts detected".to_string());
    }

    let score = score.clamp(0, 100) as u32;
    AdviceResult {
        score,
        label: TimingLabel::from_score(score),
        factors,
    }
}

fn touches_month_end(start: NaiveDate, end: NaiveDate) -> bool {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .any(|d| d.day() >= 25)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::holiday::HolidayType;
    use crate::model::leave_request::{LeaveStatus, LeaveType};
    use chrono::Utc;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn holiday(date: NaiveDate) -> Holiday {
        Holiday {
            id: 1,
            name: "Spring Day".into(),
            date,
            kind: HolidayType::National,
            is_recurring: false,
        }
    }

    fn teammate_leave(start: NaiveDate, end: NaiveDate) -> LeaveRequest {
        LeaveRequest {
            id: 0,
            employee_id: 2,
            leave_type: LeaveType::Annual,
            start_date: start,
            end_date: end,
            total_days: count_working_days(start, end),
            reason: "teammate time off".into(),
            status: LeaveStatus::Approved,
            applied_at: Utc::now(),
            manager_comment: None,
        }
    }

    #[test]
    fn quiet_mid_month_week_is_recommended_with_holiday_nearby() {
        let advice = advise(
            day(2026, 3, 9),
            day(2026, 3, 13),
            &[holiday(day(2026, 3, 16))],
            &[],
        );
        assert_eq!(advice.score, 85);
        assert_eq!(advice.label, TimingLabel::Recommended);
        assert!(advice.factors.iter().any(|f| f.contains("Spring Day")));
    }

    #[test]
    fn teammate_overlap_pushes_the_score_down() {
        let overlap = vec![
            teammate_leave(day(2026, 3, 9), day(2026, 3, 10)),
            teammate_leave(day(2026, 3, 11), day(2026, 3, 12)),
        ];
        let advice = advise(day(2026, 3, 9), day(2026, 3, 13), &[], &overlap);
        assert_eq!(advice.score, 46);
        assert_eq!(advice.label, TimingLabel::Risky);
    }

    #[test]
    fn overlap_penalty_is_capped() {
        let overlap: Vec<_> = (0..5)
            .map(|_| teammate_leave(day(2026, 3, 9), day(2026, 3, 13)))
            .collect();
        let advice = advise(day(2026, 3, 9), day(2026, 3, 13), &[], &overlap);
        assert_eq!(advice.score, (BASE_SCORE - MAX_OVERLAP_PENALTY) as u32);
    }

    #[test]
    fn month_end_range_is_penalized() {
        let advice = advise(day(2026, 3, 25), day(2026, 3, 27), &[], &[]);
        assert_eq!(advice.score, 60);
        assert_eq!(advice.label, TimingLabel::Acceptable);
    }

    #[test]
    fn advice_is_deterministic() {
        let a = advise(day(2026, 3, 9), day(2026, 3, 13), &[], &[]);
        let b = advise(day(2026, 3, 9), day(2026, 3, 13), &[], &[]);
        assert_eq!(a.score, b.score);
        assert_eq!(a.factors, b.factors);
    }
}

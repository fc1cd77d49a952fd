use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::leave_request::{LeaveRequest, LeaveType};

/// Trailing window the score looks at.
pub const HISTORY_WINDOW_DAYS: i64 = 180;
/// Gap length that earns the full gap weight.
const GAP_RAMP_DAYS: i64 = 120;
/// Leave days per window considered healthy.
const HEALTHY_DAYS_PER_WINDOW: u32 = 12;
/// Work stretch that earns the full stretch weight.
const STRETCH_RAMP_DAYS: i64 = 90;

const WEIGHT_GAP: i64 = 40;
const WEIGHT_VOLUME: u32 = 30;
const WEIGHT_STRETCH: i64 = 20;
const WEIGHT_TYPE_MIX: u32 = 10;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, ToSchema, strum_macros::Display,
)]
pub enum BurnoutCategory {
    Low,
    Moderate,
    High,
    Critical,
}

impl BurnoutCategory {
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=30 => BurnoutCategory::Low,
            31..=60 => BurnoutCategory::Moderate,
            61..=80 => BurnoutCategory::High,
            _ => BurnoutCategory::Critical,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BurnoutResult {
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = 72)]
    pub score: u32,
    #[schema(example = "High")]
    pub category: BurnoutCategory,
    pub factors: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeamBurnout {
    #[schema(example = 7)]
    pub manager_id: u64,
    #[schema(example = 4)]
    pub team_size: usize,
    #[schema(example = 55)]
    pub average_score: u32,
    /// Reports scoring above the High threshold (> 60).
    #[schema(example = 1)]
    pub high_risk_count: usize,
    pub members: Vec<BurnoutResult>,
}

/// Score an employee's burnout risk from their approved leave history.
///
/// Weighted heuristic, all weights explicit: gap since the last approved
/// leave (up to 40), low leave volume over the trailing 180 days (up to 30),
/// longest uninterrupted work stretch (up to 20), sick-dominated leave mix
/// (10). Deterministic for a given (history, today).
pub fn score(employee_id: u64, approved: &[LeaveRequest], today: NaiveDate) -> BurnoutResult {
    let window_start = today - chrono::Days::new(HISTORY_WINDOW_DAYS as u64);
    let mut factors = Vec::new();

    // Approved leave that has at least started by now, inside the window.
    let mut recent: Vec<&LeaveRequest> = approved
        .iter()
        .filter(|r| r.start_date <= today && r.end_date >= window_start)
        .collect();
    recent.sort_by_key(|r| r.start_date);

    // Factor 1: days since the last leave ended.
    let last_end = recent
        .iter()
        .map(|r| r.end_date.min(today))
        .max();
    let gap_days = match last_end {
        Some(end) => (today - end).num_days().max(0),
        None => GAP_RAMP_DAYS,
    };
    let gap_points = (gap_days.min(GAP_RAMP_DAYS) * WEIGHT_GAP / GAP_RAMP_DAYS) as u32;
    match last_end {
        None => factors.push(format!(
            "no approved leave in the last {HISTORY_WINDOW_DAYS} days"
        )),
        Some(_) if gap_days >= 30 => {
            factors.push(format!("{gap_days} days since the last leave ended"))
        }
        _ => {}
    }

    // Factor 2: how much leave was actually taken in the window.
    let taken: u32 = recent.iter().map(|r| r.total_days).sum();
    let volume_points =
        WEIGHT_VOLUME - taken.min(HEALTHY_DAYS_PER_WINDOW) * WEIGHT_VOLUME / HEALTHY_DAYS_PER_WINDOW;
    if taken < HEALTHY_DAYS_PER_WINDOW {
        factors.push(format!(
            "only {taken} leave days taken in the last {HISTORY_WINDOW_DAYS} days"
        ));
    }

    // Factor 3: longest run of days worked without any leave in the window.
    let longest_stretch = longest_work_stretch(&recent, window_start, today);
    let stretch_points =
        (longest_stretch.min(STRETCH_RAMP_DAYS) * WEIGHT_STRETCH / STRETCH_RAMP_DAYS) as u32;
    if longest_stretch >= 45 {
        factors.push(format!(
            "longest uninterrupted work stretch: {longest_stretch} days"
        ));
    }

    // Factor 4: leave-type mix. Time off that is mostly sick leave is rest
    // forced by illness, not recovery.
    let sick: u32 = recent
        .iter()
        .filter(|r| r.leave_type == LeaveType::Sick)
        .map(|r| r.total_days)
        .sum();
    let mix_points = if taken > 0 && sick * 2 >= taken {
        factors.push("sick leave dominates recent time off".to_string());
        WEIGHT_TYPE_MIX
    } else {
        0
    };

    let score = (gap_points + volume_points + stretch_points + mix_points).min(100);
    let category = BurnoutCategory::from_score(score);

    let mut recommendations = Vec::new();
    if matches!(category, BurnoutCategory::High | BurnoutCategory::Critical) {
        recommendations
            .push("schedule at least a long weekend within the next two weeks".to_string());
    }
    if matches!(category, BurnoutCategory::Critical) {
        recommendations.push("consider a full week off and a workload review".to_string());
    }
    if taken == 0 {
        recommendations.push("plan regular leave instead of letting days accrue".to_string());
    }

    BurnoutResult {
        employee_id,
        score,
        category,
        factors,
        recommendations,
    }
}

/// Aggregate scores for a manager's direct reports.
pub fn team_score(manager_id: u64, members: Vec<BurnoutResult>) -> TeamBurnout {
    let team_size = members.len();
    let average_score = if team_size == 0 {
        0
    } else {
        members.iter().map(|m| m.score).sum::<u32>() / team_size as u32
    };
    let high_risk_count = members.iter().filter(|m| m.score > 60).count();
    TeamBurnout {
        manager_id,
        team_size,
        average_score,
        high_risk_count,
        members,
    }
}

fn longest_work_stretch(
    recent: &[&LeaveRequest],
    window_start: NaiveDate,
    today: NaiveDate,
) -> i64 {
    let mut longest = 0i64;
    let mut cursor = window_start;
    for leave in recent {
        let start = leave.start_date.max(window_start);
        if start > cursor {
            longest = longest.max((start - cursor).num_days());
        }
        let after = leave.end_date + chrono::Days::new(1);
        cursor = cursor.max(after);
    }
    if today > cursor {
        longest = longest.max((today - cursor).num_days());
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::leave_request::LeaveStatus;
    use chrono::Utc;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn approved(start: NaiveDate, end: NaiveDate, leave_type: LeaveType) -> LeaveRequest {
        LeaveRequest {
            id: 0,
            employee_id: 1,
            leave_type,
            start_date: start,
            end_date: end,
            total_days: crate::utils::working_days::count_working_days(start, end),
            reason: "history entry for scoring".into(),
            status: LeaveStatus::Approved,
            applied_at: Utc::now(),
            manager_comment: None,
        }
    }

    #[test]
    fn no_leave_at_all_scores_critical_range() {
        let result = score(1, &[], day(2026, 6, 1));
        // Full gap (40) + full volume (30) + full stretch (20) = 90.
        assert_eq!(result.score, 90);
        assert_eq!(result.category, BurnoutCategory::Critical);
        assert!(!result.factors.is_empty());
        assert!(!result.recommendations.is_empty());
    }

    #[test]
    fn recent_regular_leave_scores_low() {
        let today = day(2026, 6, 1);
        let history = vec![
            approved(day(2026, 1, 5), day(2026, 1, 9), LeaveType::Annual),
            approved(day(2026, 3, 2), day(2026, 3, 6), LeaveType::Annual),
            approved(day(2026, 5, 18), day(2026, 5, 22), LeaveType::Personal),
        ];
        let result = score(1, &history, today);
        assert!(result.score <= 30, "score was {}", result.score);
        assert_eq!(result.category, BurnoutCategory::Low);
    }

    #[test]
    fn sick_dominated_history_adds_the_mix_weight() {
        let today = day(2026, 6, 1);
        let healthy = vec![approved(day(2026, 5, 18), day(2026, 5, 22), LeaveType::Annual)];
        let sick = vec![approved(day(2026, 5, 18), day(2026, 5, 22), LeaveType::Sick)];
        let healthy_score = score(1, &healthy, today).score;
        let sick_score = score(1, &sick, today).score;
        assert_eq!(sick_score, healthy_score + 10);
    }

    #[test]
    fn score_is_deterministic_across_calls() {
        let today = day(2026, 6, 1);
        let history = vec![approved(day(2026, 2, 2), day(2026, 2, 6), LeaveType::Annual)];
        let a = score(1, &history, today);
        let b = score(1, &history, today);
        assert_eq!(a.score, b.score);
        assert_eq!(a.category, b.category);
        assert_eq!(a.factors, b.factors);
    }

    #[test]
    fn category_buckets_match_the_documented_bounds() {
        assert_eq!(BurnoutCategory::from_score(0), BurnoutCategory::Low);
        assert_eq!(BurnoutCategory::from_score(30), BurnoutCategory::Low);
        assert_eq!(BurnoutCategory::from_score(31), BurnoutCategory::Moderate);
        assert_eq!(BurnoutCategory::from_score(60), BurnoutCategory::Moderate);
        assert_eq!(BurnoutCategory::from_score(61), BurnoutCategory::High);
        assert_eq!(BurnoutCategory::from_score(80), BurnoutCategory::High);
        assert_eq!(BurnoutCategory::from_score(81), BurnoutCategory::Critical);
        assert_eq!(BurnoutCategory::from_score(100), BurnoutCategory::Critical);
    }

    #[test]
    fn team_aggregate_counts_high_risk_members() {
        let members = vec![
            BurnoutResult {
                employee_id: 1,
                score: 20,
                category: BurnoutCategory::Low,
                factors: vec![],
                recommendations: vec![],
            },
            BurnoutResult {
                employee_id: 2,
                score: 80,
                category: BurnoutCategory::High,
                factors: vec![],
                recommendations: vec![],
            },
        ];
        let team = team_score(7, members);
        assert_eq!(team.team_size, 2);
        assert_eq!(team.average_score, 50);
        assert_eq!(team.high_risk_count, 1);
    }
}

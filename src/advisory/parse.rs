use chrono::{Datelike, Days, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::leave_request::LeaveType;
use crate::utils::working_days::{end_of_working_span, next_working_day};

/// Below this the caller must treat the result as non-authoritative and ask
/// the user to confirm before submitting anything.
pub const CONFIDENCE_THRESHOLD: f32 = 0.5;

const TYPE_CREDIT: f32 = 0.4;
const DURATION_CREDIT: f32 = 0.3;
const ANCHOR_CREDIT: f32 = 0.3;

static TYPE_KEYWORDS: Lazy<Vec<(&'static str, LeaveType)>> = Lazy::new(|| {
    vec![
        ("sick", LeaveType::Sick),
        ("ill", LeaveType::Sick),
        ("annual", LeaveType::Annual),
        ("vacation", LeaveType::Annual),
        ("holiday", LeaveType::Annual),
        ("personal", LeaveType::Personal),
        ("casual", LeaveType::Personal),
        ("maternity", LeaveType::Maternity),
        ("paternity", LeaveType::Paternity),
    ]
});

static NUMBER_WORDS: Lazy<Vec<(&'static str, u32)>> = Lazy::new(|| {
    vec![
        ("a", 1),
        ("an", 1),
        ("one", 1),
        ("two", 2),
        ("three", 3),
        ("four", 4),
        ("five", 5),
        ("six", 6),
        ("seven", 7),
        ("eight", 8),
        ("nine", 9),
        ("ten", 10),
    ]
});

/// Best-effort extraction from free text like "3 days sick leave starting
/// tomorrow". Never errors: missing pieces fall back to defaults (one
/// working day, starting today) without earning confidence.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ParsedLeave {
    #[schema(example = "sick", nullable = true)]
    pub leave_type: Option<LeaveType>,
    #[schema(example = "2026-03-03", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-03-05", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = 3)]
    pub working_days: u32,
    #[schema(example = 1.0)]
    pub confidence: f32,
}

impl ParsedLeave {
    pub fn is_authoritative(&self) -> bool {
        self.confidence >= CONFIDENCE_THRESHOLD
    }
}

pub fn parse(text: &str, today: NaiveDate) -> ParsedLeave {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .filter(|t| !t.is_empty())
        .collect();

    let mut confidence = 0.0f32;

    let leave_type = tokens.iter().find_map(|t| {
        TYPE_KEYWORDS
            .iter()
            .find(|(kw, _)| kw == t)
            .map(|(_, lt)| *lt)
    });
    if leave_type.is_some() {
        confidence += TYPE_CREDIT;
    }

    let working_days = extract_duration(&tokens);
    if working_days.is_some() {
        confidence += DURATION_CREDIT;
    }
    let working_days = working_days.unwrap_or(1);

    let anchor = extract_anchor(&tokens, today);
    if anchor.is_some() {
        confidence += ANCHOR_CREDIT;
    }
    let start_date = next_working_day(anchor.unwrap_or(today));
    let end_date = end_of_working_span(start_date, working_days);

    ParsedLeave {
        leave_type,
        start_date,
        end_date,
        working_days,
        confidence,
    }
}

fn extract_duration(tokens: &[&str]) -> Option<u32> {
    for (i, token) in tokens.iter().enumerate() {
        let Some(count) = parse_number(token) else {
            continue;
        };
        // A number only counts with a unit behind it.
        match tokens.get(i + 1).copied().unwrap_or("") {
            "day" | "days" => return Some(count),
            "week" | "weeks" => return Some(count * 5),
            _ => {}
        }
    }
    None
}

fn parse_number(token: &str) -> Option<u32> {
    if let Ok(n) = token.parse::<u32>() {
        return (n > 0 && n <= 365).then_some(n);
    }
    NUMBER_WORDS
        .iter()
        .find(|(word, _)| *word == token)
        .map(|(_, n)| *n)
}

fn extract_anchor(tokens: &[&str], today: NaiveDate) -> Option<NaiveDate> {
    for (i, token) in tokens.iter().enumerate() {
        match *token {
            "today" => return Some(today),
            "tomorrow" => return Some(today + Days::new(1)),
            "next" => {
                let follower = tokens.get(i + 1).copied().unwrap_or("");
                if follower == "week" {
                    return Some(next_weekday(today, Weekday::Mon));
                }
                if let Some(weekday) = parse_weekday(follower) {
                    return Some(next_weekday(today, weekday));
                }
            }
            t => {
                if let Ok(date) = NaiveDate::parse_from_str(t, "%Y-%m-%d") {
                    return Some(date);
                }
            }
        }
    }
    None
}

fn parse_weekday(token: &str) -> Option<Weekday> {
    match token {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// First `target` weekday strictly after `today`.
fn next_weekday(today: NaiveDate, target: Weekday) -> NaiveDate {
    let mut date = today + Days::new(1);
    while date.weekday() != target {
        date = date + Days::new(1);
    }
    date
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // Monday.
    fn today() -> NaiveDate {
        day(2026, 3, 2)
    }

    #[test]
    fn parses_count_type_and_relative_anchor() {
        let parsed = parse("3 days sick leave starting tomorrow", today());
        assert_eq!(parsed.leave_type, Some(LeaveType::Sick));
        assert_eq!(parsed.working_days, 3);
        assert_eq!(parsed.start_date, day(2026, 3, 3));
        assert_eq!(parsed.end_date, day(2026, 3, 5));
        assert!(parsed.is_authoritative());
    }

    #[test]
    fn a_week_of_vacation_next_monday() {
        let parsed = parse("I'd like a week of vacation starting next Monday", today());
        assert_eq!(parsed.leave_type, Some(LeaveType::Annual));
        assert_eq!(parsed.working_days, 5);
        assert_eq!(parsed.start_date, day(2026, 3, 9));
        assert_eq!(parsed.end_date, day(2026, 3, 13));
        assert!(parsed.is_authoritative());
    }

    #[test]
    fn explicit_iso_date_is_honoured() {
        let parsed = parse("2 days personal leave from 2026-04-01", today());
        assert_eq!(parsed.leave_type, Some(LeaveType::Personal));
        assert_eq!(parsed.start_date, day(2026, 4, 1));
        assert_eq!(parsed.end_date, day(2026, 4, 2));
    }

    #[test]
    fn weekend_anchor_rolls_to_the_next_working_day() {
        // 2026-03-07 is a Saturday.
        let parsed = parse("sick day 2026-03-07", today());
        assert_eq!(parsed.start_date, day(2026, 3, 9));
    }

    #[test]
    fn ambiguous_text_degrades_to_low_confidence_not_an_error() {
        let parsed = parse("need some time off soonish", today());
        assert!(parsed.confidence < CONFIDENCE_THRESHOLD);
        assert!(!parsed.is_authoritative());
        assert_eq!(parsed.working_days, 1);
        assert_eq!(parsed.start_date, today());
    }

    #[test]
    fn no_type_keyword_keeps_type_unknown() {
        let parsed = parse("2 days off starting tomorrow", today());
        assert_eq!(parsed.leave_type, None);
        // Duration + anchor alone still clear the threshold.
        assert!(parsed.is_authoritative());
    }
}

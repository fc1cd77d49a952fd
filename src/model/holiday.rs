use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    ToSchema,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HolidayType {
    National,
    Company,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "name": "New Year's Day",
    "date": "2026-01-01",
    "kind": "national",
    "is_recurring": true
}))]
pub struct Holiday {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "New Year's Day")]
    pub name: String,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "national")]
    pub kind: HolidayType,
    /// Recurring holidays reapply on the same month/day every year.
    #[schema(example = true)]
    pub is_recurring: bool,
}

impl Holiday {
    /// Whether this holiday is observed on `date`. Recurring entries match on
    /// month/day in any year at or after their first occurrence.
    pub fn observed_on(&self, date: NaiveDate) -> bool {
        if self.date == date {
            return true;
        }
        self.is_recurring
            && date.year() >= self.date.year()
            && date.month() == self.date.month()
            && date.day() == self.date.day()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn recurring_holiday_matches_same_month_day_in_later_years() {
        let h = Holiday {
            id: 1,
            name: "New Year's Day".into(),
            date: day(2024, 1, 1),
            kind: HolidayType::National,
            is_recurring: true,
        };
        assert!(h.observed_on(day(2024, 1, 1)));
        assert!(h.observed_on(day(2026, 1, 1)));
        assert!(!h.observed_on(day(2023, 1, 1)));
        assert!(!h.observed_on(day(2026, 1, 2)));
    }

    #[test]
    fn one_off_holiday_matches_exact_date_only() {
        let h = Holiday {
            id: 2,
            name: "Office move".into(),
            date: day(2026, 5, 14),
            kind: HolidayType::Company,
            is_recurring: false,
        };
        assert!(h.observed_on(day(2026, 5, 14)));
        assert!(!h.observed_on(day(2027, 5, 14)));
    }
}

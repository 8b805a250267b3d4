use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HolidayKind {
    Fixed,
    Islamic,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "date": "2026-12-03",
    "name": "National Day",
    "kind": "fixed"
}))]
pub struct PublicHoliday {
    pub date: NaiveDate,
    pub name: String,
    pub kind: HolidayKind,
}

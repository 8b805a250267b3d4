use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, ToSchema, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LeaveType {
    Annual,
    Sick,
    Emergency,
}

impl LeaveType {
    pub fn label(&self) -> &'static str {
        match self {
            LeaveType::Annual => "Annual Leave",
            LeaveType::Sick => "Sick Leave",
            LeaveType::Emergency => "Emergency Leave",
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, ToSchema, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": "LR-5f0c3a6e-8c1d-4b8a-9d8f-0a4f1e2b3c4d",
    "employee_id": "BAYN00004",
    "start_date": "2026-03-02",
    "end_date": "2026-03-04",
    "leave_type": "annual",
    "status": "pending",
    "business_days": 3,
    "offset_days": 1,
    "notes": "Family visit",
    "submitted_at": "2026-02-10T08:30:00Z"
}))]
pub struct LeaveRequest {
    pub id: String,
    /// owning employee's internal id
    pub employee_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub leave_type: LeaveType,
    pub status: LeaveStatus,
    /// counted days in the inclusive range
    pub business_days: u32,
    /// portion of `business_days` drawn from the offset pool
    pub offset_days: u32,
    #[schema(nullable = true)]
    pub notes: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl LeaveRequest {
    /// Days charged against the annual entitlement.
    pub fn regular_days(&self) -> u32 {
        self.business_days.saturating_sub(self.offset_days)
    }

    /// Pending and approved requests hold their days; rejected ones release them.
    pub fn is_active(&self) -> bool {
        self.status != LeaveStatus::Rejected
    }
}

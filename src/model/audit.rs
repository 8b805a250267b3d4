use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, ToSchema, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AuditAction {
    ConfirmBalance,
    RequestChange,
    EditLeave,
    AdminUpdate,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": "AUD-0b6f1a52-3c1e-4f7a-9f51-1d2c3b4a5e6f",
    "employee_id": "BAYN00004",
    "action": "confirm_balance",
    "previous_value": null,
    "new_value": "{\"totalLeaves\":23.0}",
    "notes": "Employee confirmed 2025 leave balance as correct",
    "timestamp": "2026-01-05T09:00:00Z",
    "performed_by": "BAYN00004"
}))]
pub struct AuditRecord {
    pub id: String,
    pub employee_id: String,
    pub action: AuditAction,
    #[schema(nullable = true)]
    pub previous_value: Option<String>,
    #[schema(nullable = true)]
    pub new_value: Option<String>,
    #[schema(nullable = true)]
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub performed_by: String,
}

/// Audit entry before the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewAuditRecord {
    pub employee_id: String,
    pub action: AuditAction,
    pub previous_value: Option<String>,
    pub new_value: Option<String>,
    pub notes: Option<String>,
    pub performed_by: String,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LeaveHistoryRecord {
    #[schema(example = "Jan 25")]
    pub month: String,
    #[schema(example = 2.0)]
    pub leaves_availed: f64,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize, ToSchema, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConfirmationStatus {
    #[default]
    Pending,
    Confirmed,
    ChangeRequested,
}

/// Previous-year leave record awaiting the employee's confirmation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaveHistory {
    pub year: i32,
    pub records: Vec<LeaveHistoryRecord>,
    pub status: ConfirmationStatus,
    #[schema(nullable = true)]
    pub confirmed_at: Option<DateTime<Utc>>,
    #[schema(nullable = true)]
    pub change_requested_at: Option<DateTime<Utc>>,
    #[schema(nullable = true)]
    pub change_request_notes: Option<String>,
    #[schema(nullable = true)]
    pub proposed_records: Option<Vec<LeaveHistoryRecord>>,
}

impl LeaveHistory {
    pub fn new(year: i32, records: Vec<LeaveHistoryRecord>) -> Self {
        Self {
            year,
            records,
            status: ConfirmationStatus::Pending,
            confirmed_at: None,
            change_requested_at: None,
            change_request_notes: None,
            proposed_records: None,
        }
    }

    /// Twelve months with nothing availed.
    pub fn empty(year: i32) -> Self {
        let records = month_labels(year)
            .into_iter()
            .map(|month| LeaveHistoryRecord {
                month,
                leaves_availed: 0.0,
            })
            .collect();
        Self::new(year, records)
    }

    pub fn total_availed(&self) -> f64 {
        self.records.iter().map(|r| r.leaves_availed).sum()
    }
}

/// "Jan 25" .. "Dec 25" for 2025.
pub fn month_labels(year: i32) -> Vec<String> {
    let yy = year.rem_euclid(100);
    MONTH_ABBREVIATIONS
        .iter()
        .map(|m| format!("{} {:02}", m, yy))
        .collect()
}

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};

const LOW_BALANCE_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entitlement {
    pub annual: f64,
    pub carry_over: f64,
    pub offset: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LeaveBalance {
    pub entitlement: f64,
    pub carry_over: f64,
    /// entitlement + carry-over
    pub total_allocation: f64,
    pub pending_days: u32,
    pub approved_days: u32,
    pub used_days: u32,
    pub remaining: f64,
    pub offset_balance: f64,
    pub used_offset_days: u32,
    pub remaining_offset: f64,
}

impl LeaveBalance {
    pub fn is_low(&self) -> bool {
        self.remaining > 0.0 && self.remaining < LOW_BALANCE_THRESHOLD
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining <= 0.0 && self.remaining_offset <= 0.0
    }
}

/// Derives the remaining balances from the entitlement and every request the
/// employee holds. Rejected requests release their days.
pub fn reconcile(entitlement: &Entitlement, requests: &[LeaveRequest]) -> LeaveBalance {
    let mut pending_days = 0;
    let mut approved_days = 0;
    let mut used_offset_days = 0;

    for req in requests {
        match req.status {
            LeaveStatus::Pending => pending_days += req.regular_days(),
            LeaveStatus::Approved => approved_days += req.regular_days(),
            LeaveStatus::Rejected => continue,
        }
        used_offset_days += req.offset_days;
    }

    let used_days = pending_days + approved_days;
    let total_allocation = entitlement.annual + entitlement.carry_over;

    LeaveBalance {
        entitlement: entitlement.annual,
        carry_over: entitlement.carry_over,
        total_allocation,
        pending_days,
        approved_days,
        used_days,
        remaining: total_allocation - f64::from(used_days),
        offset_balance: entitlement.offset,
        used_offset_days,
        remaining_offset: entitlement.offset - f64::from(used_offset_days),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MonthTotal {
    #[schema(example = "Mar 26")]
    pub month: String,
    pub days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LeaveSummary {
    pub pending_days: u32,
    pub approved_days: u32,
    pub by_month: Vec<MonthTotal>,
    pub by_type: BTreeMap<String, u32>,
}

/// Dashboard totals over non-rejected requests, bucketed by start month.
pub fn summarize(requests: &[LeaveRequest]) -> LeaveSummary {
    let mut by_month: BTreeMap<(i32, u32), u32> = BTreeMap::new();
    let mut by_type: BTreeMap<String, u32> = BTreeMap::new();
    let mut pending_days = 0;
    let mut approved_days = 0;

    for req in requests.iter().filter(|r| r.is_active()) {
        let days = req.regular_days();
        if req.status == LeaveStatus::Pending {
            pending_days += days;
        } else {
            approved_days += days;
        }
        *by_month
            .entry((req.start_date.year(), req.start_date.month()))
            .or_default() += days;
        *by_type.entry(type_key(req.leave_type)).or_default() += days;
    }

    LeaveSummary {
        pending_days,
        approved_days,
        by_month: by_month
            .into_iter()
            .map(|((year, month), days)| MonthTotal {
                month: month_label(year, month),
                days,
            })
            .collect(),
        by_type,
    }
}

fn type_key(leave_type: LeaveType) -> String {
    leave_type.to_string()
}

fn month_label(year: i32, month: u32) -> String {
    chrono::NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b %y").to_string())
        .unwrap_or_default()
}

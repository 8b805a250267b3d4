use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::leave::balance::reconcile;
use crate::leave::validation::validate_submission;
use crate::model::audit::{AuditRecord, NewAuditRecord};
use crate::model::employee::Employee;
use crate::model::leave_history::{ConfirmationStatus, LeaveHistory, LeaveHistoryRecord};
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use crate::model::notification::EmailNotification;

/// A leave request as submitted, before it is counted and validated.
#[derive(Debug, Clone)]
pub struct NewLeave {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub leave_type: LeaveType,
    pub offset_days: u32,
    pub notes: Option<String>,
}

/// Process-wide in-memory state. Each collection sits behind its own lock;
/// no method holds more than one lock at a time.
#[derive(Default)]
pub struct Store {
    employees: RwLock<Vec<Employee>>,
    requests: RwLock<Vec<LeaveRequest>>,
    histories: RwLock<HashMap<String, LeaveHistory>>,
    audit: RwLock<Vec<AuditRecord>>,
    outbox: RwLock<Vec<EmailNotification>>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl Store {
    /* ---------- employees ---------- */

    /// Swaps in a new roster. Requests are kept; histories are replaced for
    /// the employees that come with one.
    pub fn replace_roster(&self, employees: Vec<Employee>, histories: Vec<(String, LeaveHistory)>) {
        *write(&self.employees) = employees;
        let mut stored = write(&self.histories);
        for (employee_id, history) in histories {
            stored.insert(employee_id, history);
        }
    }

    pub fn employees(&self) -> Vec<Employee> {
        read(&self.employees).clone()
    }

    pub fn employee_count(&self) -> usize {
        read(&self.employees).len()
    }

    pub fn employee(&self, id: &str) -> Option<Employee> {
        read(&self.employees).iter().find(|e| e.id == id).cloned()
    }

    pub fn employee_by_login(&self, login_id: &str) -> Option<Employee> {
        read(&self.employees)
            .iter()
            .find(|e| e.employee_id.eq_ignore_ascii_case(login_id))
            .cloned()
    }

    pub fn set_manager_email(&self, id: &str, email: Option<String>) -> Result<Employee, AppError> {
        let mut employees = write(&self.employees);
        let employee = employees
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(AppError::EmployeeNotFound)?;
        employee.manager_email = email;
        Ok(employee.clone())
    }

    /* ---------- leave requests ---------- */

    pub fn all_requests(&self) -> Vec<LeaveRequest> {
        read(&self.requests).clone()
    }

    pub fn requests_for(&self, employee_id: &str) -> Vec<LeaveRequest> {
        read(&self.requests)
            .iter()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect()
    }

    pub fn request(&self, id: &str) -> Option<LeaveRequest> {
        read(&self.requests).iter().find(|r| r.id == id).cloned()
    }

    /// Validates against the employee's current balance and stores the
    /// request as pending. The write lock spans both steps, so two concurrent
    /// submissions cannot overdraw the same balance.
    pub fn submit(
        &self,
        employee: &Employee,
        leave: NewLeave,
        business_days: u32,
    ) -> Result<LeaveRequest, AppError> {
        let mut requests = write(&self.requests);
        let own: Vec<LeaveRequest> = requests
            .iter()
            .filter(|r| r.employee_id == employee.id)
            .cloned()
            .collect();

        let balance = reconcile(&employee.entitlement(), &own);
        let split = validate_submission(
            leave.start_date,
            leave.end_date,
            business_days,
            leave.offset_days,
            &balance,
            &own,
        )?;

        let request = LeaveRequest {
            id: format!("LR-{}", Uuid::new_v4()),
            employee_id: employee.id.clone(),
            start_date: leave.start_date,
            end_date: leave.end_date,
            leave_type: leave.leave_type,
            status: LeaveStatus::Pending,
            business_days: split.business_days,
            offset_days: split.offset_days,
            notes: leave
                .notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            submitted_at: Utc::now(),
        };
        requests.push(request.clone());
        Ok(request)
    }

    /// Moves a pending request to `status`; anything already decided stays put.
    pub fn transition(
        &self,
        request_id: &str,
        status: LeaveStatus,
    ) -> Result<LeaveRequest, AppError> {
        let mut requests = write(&self.requests);
        let request = requests
            .iter_mut()
            .find(|r| r.id == request_id)
            .ok_or(AppError::RequestNotFound)?;
        if request.status != LeaveStatus::Pending {
            return Err(AppError::AlreadyProcessed);
        }
        request.status = status;
        Ok(request.clone())
    }

    /* ---------- previous-year history ---------- */

    pub fn history(&self, employee_id: &str, year: i32) -> LeaveHistory {
        read(&self.histories)
            .get(employee_id)
            .filter(|h| h.year == year)
            .cloned()
            .unwrap_or_else(|| LeaveHistory::empty(year))
    }

    pub fn confirm_history(&self, employee_id: &str, year: i32) -> LeaveHistory {
        let mut histories = write(&self.histories);
        let history = histories
            .entry(employee_id.to_string())
            .or_insert_with(|| LeaveHistory::empty(year));
        if history.year != year {
            *history = LeaveHistory::empty(year);
        }
        history.status = ConfirmationStatus::Confirmed;
        history.confirmed_at = Some(Utc::now());
        history.clone()
    }

    /// Records a disputed history. The proposal is kept alongside the current
    /// records for HR to review; the current records are not overwritten.
    pub fn request_history_change(
        &self,
        employee_id: &str,
        year: i32,
        notes: &str,
        proposed: Vec<LeaveHistoryRecord>,
    ) -> Result<LeaveHistory, AppError> {
        let notes = notes.trim();
        if notes.is_empty() {
            return Err(AppError::MissingChangeNotes);
        }

        let mut histories = write(&self.histories);
        let history = histories
            .entry(employee_id.to_string())
            .or_insert_with(|| LeaveHistory::empty(year));
        if history.year != year {
            *history = LeaveHistory::empty(year);
        }

        let same_months = proposed.len() == history.records.len()
            && proposed
                .iter()
                .zip(&history.records)
                .all(|(p, c)| p.month == c.month);
        let sane_values = proposed
            .iter()
            .all(|r| r.leaves_availed.is_finite() && r.leaves_availed >= 0.0);
        if !same_months || !sane_values {
            return Err(AppError::InvalidHistoryRecords);
        }

        history.status = ConfirmationStatus::ChangeRequested;
        history.change_requested_at = Some(Utc::now());
        history.change_request_notes = Some(notes.to_string());
        history.proposed_records = Some(proposed);
        Ok(history.clone())
    }

    /* ---------- audit ---------- */

    pub fn append_audit(&self, record: NewAuditRecord) -> AuditRecord {
        let record = AuditRecord {
            id: format!("AUD-{}", Uuid::new_v4()),
            employee_id: record.employee_id,
            action: record.action,
            previous_value: record.previous_value,
            new_value: record.new_value,
            notes: record.notes,
            timestamp: Utc::now(),
            performed_by: record.performed_by,
        };
        write(&self.audit).push(record.clone());
        record
    }

    pub fn audit_log(&self, employee_id: Option<&str>) -> Vec<AuditRecord> {
        read(&self.audit)
            .iter()
            .filter(|r| employee_id.is_none_or(|id| r.employee_id == id))
            .cloned()
            .collect()
    }

    /* ---------- notifications ---------- */

    pub fn push_notification(&self, notification: EmailNotification) {
        write(&self.outbox).push(notification);
    }

    pub fn notifications_for(&self, employee_id: &str) -> Vec<EmailNotification> {
        read(&self.outbox)
            .iter()
            .filter(|n| n.employee_id == employee_id)
            .cloned()
            .collect()
    }
}

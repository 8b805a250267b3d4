use chrono::{NaiveDate, Utc};

use crate::model::employee::Employee;
use crate::model::leave_request::{LeaveRequest, LeaveType};
use crate::model::notification::EmailNotification;

/// "Monday, 2 March 2026"
fn long_date(date: NaiveDate) -> String {
    date.format("%A, %-d %B %Y").to_string()
}

fn plural(n: u32) -> &'static str {
    if n == 1 { "" } else { "s" }
}

fn subject(employee: &Employee, leave_type: LeaveType) -> String {
    format!("Leave Request from {} - {}", employee.name, leave_type.label())
}

/// Notification for the employee's manager, or `None` when no manager email
/// is on file.
pub fn manager_notification(
    employee: &Employee,
    request: &LeaveRequest,
) -> Option<EmailNotification> {
    let to = employee
        .manager_email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())?;

    let mut details = vec![
        format!("- Employee: {}", employee.name),
        format!("- Department: {}", employee.department),
        format!("- Leave Type: {}", request.leave_type.label()),
        format!("- Start Date: {}", long_date(request.start_date)),
        format!("- End Date: {}", long_date(request.end_date)),
        format!(
            "- Total Days: {} business day{}",
            request.business_days,
            plural(request.business_days)
        ),
    ];
    if request.offset_days > 0 {
        details.push(format!(
            "- Offset Days Used: {} day{}",
            request.offset_days,
            plural(request.offset_days)
        ));
    }
    if let Some(notes) = &request.notes {
        details.push(format!("- Notes: {}", notes));
    }
    details.push(format!("- Request ID: {}", request.id));
    details.push(format!(
        "- Submitted: {}",
        long_date(request.submitted_at.date_naive())
    ));

    let body = format!(
        "Dear Manager,\n\n\
         {name} ({department}) has submitted a new leave request that requires your approval.\n\n\
         Leave Request Details:\n\
         {details}\n\n\
         Please review this request at your earliest convenience in the Leave Management System.\n\n\
         ---\n\
         This is an automated notification from the Leave Planner system.",
        name = employee.name,
        department = employee.department,
        details = details.join("\n"),
    );

    Some(EmailNotification {
        to: to.to_string(),
        subject: subject(employee, request.leave_type),
        body,
        timestamp: Utc::now(),
        request_id: request.id.clone(),
        employee_id: employee.id.clone(),
    })
}

/// What the manager would receive, shown before the request is submitted.
pub fn email_preview(
    employee: &Employee,
    leave_type: LeaveType,
    start: NaiveDate,
    end: NaiveDate,
    business_days: u32,
    offset_days: u32,
    notes: Option<&str>,
) -> String {
    let mut lines = vec![
        "Your manager will receive an email notification with the following details:".to_string(),
        String::new(),
        format!("Subject: {}", subject(employee, leave_type)),
        String::new(),
        "Leave Request Details:".to_string(),
        format!("- Leave Type: {}", leave_type.label()),
        format!("- Start Date: {}", long_date(start)),
        format!("- End Date: {}", long_date(end)),
        format!("- Total Days: {} business day{}", business_days, plural(business_days)),
    ];
    if offset_days > 0 {
        lines.push(format!("- Offset Days Used: {}", offset_days));
    }
    if let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) {
        lines.push(format!("- Notes: {}", notes));
    }
    lines.join("\n")
}

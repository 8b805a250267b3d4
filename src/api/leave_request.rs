use crate::{
    auth::auth::AuthUser,
    config::Config,
    error::AppError,
    leave::{
        balance::{LeaveBalance, reconcile, summarize},
        calendar::{HolidayCalendar, business_days},
        validation::validate_submission,
    },
    model::{
        audit::{AuditAction, NewAuditRecord},
        employee::Employee,
        holiday::PublicHoliday,
        leave_request::{LeaveRequest, LeaveStatus, LeaveType},
        notification::EmailNotification,
        role::Role,
    },
    store::{NewLeave, Store},
    utils::notification::{email_preview, manager_notification},
};
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = "2026-03-02")]
    pub start_date: NaiveDate,
    #[schema(example = "2026-03-04")]
    pub end_date: NaiveDate,
    #[schema(example = "annual")]
    pub leave_type: LeaveType, // enum ensures Swagger dropdown
    /// days drawn from the offset pool instead of the annual balance
    #[schema(example = 1)]
    pub offset_days: Option<u32>,
    #[schema(example = "Family visit")]
    pub notes: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct SubmitLeaveResponse {
    pub request: LeaveRequest,
    /// holidays inside the range; only charged around when holiday exclusion is on
    pub public_holidays_in_range: Vec<PublicHoliday>,
    #[schema(nullable = true)]
    pub notification: Option<EmailNotification>,
    pub balance: LeaveBalance,
}

#[derive(Serialize, ToSchema)]
pub struct LeavePreviewResponse {
    /// weekdays in the range, holidays included
    pub business_days: u32,
    /// business days minus public holidays
    pub working_days: u32,
    /// what a submission would be charged under the current policy
    pub charged_days: u32,
    pub public_holidays_in_range: Vec<PublicHoliday>,
    pub offset_days: u32,
    pub regular_days: u32,
    pub valid: bool,
    #[schema(nullable = true)]
    pub message: Option<String>,
    #[schema(nullable = true)]
    pub email_preview: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct BalanceResponse {
    pub balance: LeaveBalance,
    pub low_balance: bool,
    pub exhausted: bool,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveRequest>,
    #[schema(example = 1)]
    pub total: usize,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    /// Filter by leave status
    #[schema(example = "pending")]
    pub status: Option<LeaveStatus>,
}

fn current_employee(auth: &AuthUser, store: &Store) -> Result<Employee, AppError> {
    store
        .employee(&auth.employee_id)
        .ok_or(AppError::EmployeeNotFound)
}

/// HR admins review everyone; managers review the people who name them.
fn can_review(auth: &AuthUser, store: &Store, owner_id: &str) -> bool {
    match auth.role {
        Role::HrAdmin => true,
        Role::Manager => {
            let reviewer_email = store.employee(&auth.employee_id).and_then(|e| e.email);
            match (reviewer_email, store.employee(owner_id)) {
                (Some(email), Some(owner)) => owner.reports_to(&email),
                _ => false,
            }
        }
        Role::Employee => false,
    }
}

/* =========================
Submit leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/leave",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request submitted", body = SubmitLeaveResponse),
        (status = 400, description = "Invalid range or insufficient balance", body = Object, example = json!({
            "message": "Insufficient leave balance. You have 2 days remaining."
        })),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Overlapping request", body = Object, example = json!({
            "message": "These dates overlap with an existing leave request"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    store: web::Data<Store>,
    config: web::Data<Config>,
    calendar: web::Data<HolidayCalendar>,
    payload: web::Json<CreateLeave>,
) -> Result<HttpResponse, AppError> {
    let employee = current_employee(&auth, &store)?;
    let payload = payload.into_inner();

    let charged = calendar.chargeable_days(
        payload.start_date,
        payload.end_date,
        config.exclude_public_holidays,
    );
    let holidays = calendar.holidays_between(payload.start_date, payload.end_date);

    let request = store.submit(
        &employee,
        NewLeave {
            start_date: payload.start_date,
            end_date: payload.end_date,
            leave_type: payload.leave_type,
            offset_days: payload.offset_days.unwrap_or(0),
            notes: payload.notes,
        },
        charged,
    )?;

    info!(
        request_id = %request.id,
        employee_id = %employee.employee_id,
        business_days = request.business_days,
        offset_days = request.offset_days,
        "Leave request submitted"
    );

    let notification = manager_notification(&employee, &request);
    match &notification {
        Some(n) => {
            store.push_notification(n.clone());
            info!(to = %n.to, request_id = %request.id, "Manager notification queued");
        }
        None => debug!(employee_id = %employee.employee_id, "No manager email configured"),
    }

    let balance = reconcile(&employee.entitlement(), &store.requests_for(&employee.id));

    Ok(HttpResponse::Created().json(SubmitLeaveResponse {
        request,
        public_holidays_in_range: holidays,
        notification,
        balance,
    }))
}

/* =========================
Preview a leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/leave/preview",
    request_body = CreateLeave,
    responses(
        (status = 200, description = "Day counts and validation outcome; nothing is stored", body = LeavePreviewResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn preview_leave(
    auth: AuthUser,
    store: web::Data<Store>,
    config: web::Data<Config>,
    calendar: web::Data<HolidayCalendar>,
    payload: web::Json<CreateLeave>,
) -> Result<HttpResponse, AppError> {
    let employee = current_employee(&auth, &store)?;
    let (start, end) = (payload.start_date, payload.end_date);

    let business = business_days(start, end);
    let working = calendar.working_days(start, end);
    let charged = calendar.chargeable_days(start, end, config.exclude_public_holidays);
    let offset_days = payload.offset_days.unwrap_or(0);

    let own = store.requests_for(&employee.id);
    let balance = reconcile(&employee.entitlement(), &own);
    let outcome = validate_submission(start, end, charged, offset_days, &balance, &own);

    let email = employee
        .manager_email
        .as_deref()
        .filter(|m| !m.trim().is_empty() && outcome.is_ok())
        .map(|_| {
            email_preview(
                &employee,
                payload.leave_type,
                start,
                end,
                charged,
                offset_days,
                payload.notes.as_deref(),
            )
        });

    Ok(HttpResponse::Ok().json(LeavePreviewResponse {
        business_days: business,
        working_days: working,
        charged_days: charged,
        public_holidays_in_range: calendar.holidays_between(start, end),
        offset_days,
        regular_days: charged.saturating_sub(offset_days),
        valid: outcome.is_ok(),
        message: outcome.err().map(|e| e.to_string()),
        email_preview: email,
    }))
}

/// List own leave requests
#[utoipa::path(
    get,
    path = "/api/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Own leave requests ordered by start date", body = LeaveListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    store: web::Data<Store>,
    query: web::Query<LeaveFilter>,
) -> Result<HttpResponse, AppError> {
    let mut data: Vec<LeaveRequest> = store
        .requests_for(&auth.employee_id)
        .into_iter()
        .filter(|r| query.status.is_none_or(|s| r.status == s))
        .collect();
    data.sort_by_key(|r| (r.start_date, r.submitted_at));

    Ok(HttpResponse::Ok().json(LeaveListResponse {
        total: data.len(),
        data,
    }))
}

/// Remaining annual and offset balance
#[utoipa::path(
    get,
    path = "/api/leave/balance",
    responses(
        (status = 200, description = "Reconciled balance", body = BalanceResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_balance(
    auth: AuthUser,
    store: web::Data<Store>,
) -> Result<HttpResponse, AppError> {
    let employee = current_employee(&auth, &store)?;
    let balance = reconcile(&employee.entitlement(), &store.requests_for(&employee.id));

    Ok(HttpResponse::Ok().json(BalanceResponse {
        low_balance: balance.is_low(),
        exhausted: balance.is_exhausted(),
        balance,
    }))
}

#[utoipa::path(
    get,
    path = "/api/leave/summary",
    responses(
        (status = 200, description = "Pending/approved totals by month and type", body = crate::leave::balance::LeaveSummary),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_summary(
    auth: AuthUser,
    store: web::Data<Store>,
) -> Result<HttpResponse, AppError> {
    let requests = store.requests_for(&auth.employee_id);
    Ok(HttpResponse::Ok().json(summarize(&requests)))
}

/// for getting a leave application details endpoint
#[utoipa::path(
    get,
    path = "/api/leave/{leave_id}",
    params(
        ("leave_id" = String, Path, description = "ID of the leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request found", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "Leave request not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let leave_id = path.into_inner();
    let request = store.request(&leave_id).ok_or(AppError::RequestNotFound)?;

    // other people's requests are reported missing unless the caller reviews them
    if request.employee_id != auth.employee_id && !can_review(&auth, &store, &request.employee_id) {
        return Err(AppError::RequestNotFound);
    }

    Ok(HttpResponse::Ok().json(request))
}

async fn decide(
    auth: AuthUser,
    store: web::Data<Store>,
    leave_id: String,
    status: LeaveStatus,
) -> Result<HttpResponse, AppError> {
    auth.require_manager_or_hr()?;

    let request = store.request(&leave_id).ok_or(AppError::RequestNotFound)?;
    if request.employee_id == auth.employee_id {
        return Err(AppError::Forbidden("Cannot decide on your own leave request"));
    }
    if !can_review(&auth, &store, &request.employee_id) {
        return Err(AppError::Forbidden("Not the reviewer for this employee"));
    }

    let updated = store.transition(&leave_id, status)?;
    store.append_audit(NewAuditRecord {
        employee_id: updated.employee_id.clone(),
        action: AuditAction::EditLeave,
        previous_value: Some(LeaveStatus::Pending.to_string()),
        new_value: Some(status.to_string()),
        notes: Some(format!("Leave request {} {}", updated.id, status)),
        performed_by: auth.login_id.clone(),
    });

    info!(
        request_id = %updated.id,
        status = %status,
        reviewer = %auth.login_id,
        "Leave request decided"
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Leave {}", status),
        "request": updated
    })))
}

/* =========================
Approve leave (Manager/HR)
========================= */
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/approve",
    params(
        ("leave_id" = String, Path, description = "ID of the leave request to approve")
    ),
    responses(
        (status = 200, description = "Leave approved successfully", body = Object, example = json!({
            "message": "Leave approved"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Leave request already processed", body = Object, example = json!({
            "message": "Leave request already processed"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    decide(auth, store, path.into_inner(), LeaveStatus::Approved).await
}

/* =========================
Reject leave (Manager/HR)
========================= */
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/reject",
    params(
        ("leave_id" = String, Path, description = "ID of the leave request to reject")
    ),
    responses(
        (status = 200, description = "Leave rejected successfully", body = Object, example = json!({
            "message": "Leave rejected"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Leave request already processed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    store: web::Data<Store>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    decide(auth, store, path.into_inner(), LeaveStatus::Rejected).await
}

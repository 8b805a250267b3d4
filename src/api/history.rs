use crate::{
    auth::auth::AuthUser,
    config::Config,
    error::AppError,
    model::{
        audit::{AuditAction, NewAuditRecord},
        leave_history::{LeaveHistory, LeaveHistoryRecord},
    },
    store::Store,
};
use actix_web::{HttpResponse, web};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HistoryResponse {
    pub history: LeaveHistory,
    #[schema(example = 12.5)]
    pub total_availed: f64,
}

impl From<LeaveHistory> for HistoryResponse {
    fn from(history: LeaveHistory) -> Self {
        Self {
            total_availed: history.total_availed(),
            history,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct ChangeRequest {
    #[schema(example = "March should be 2 days, not 3")]
    pub notes: String,
    /// the full corrected year, same months as the current records
    pub records: Vec<LeaveHistoryRecord>,
}

fn records_json(records: &[LeaveHistoryRecord]) -> Result<String, AppError> {
    Ok(serde_json::to_string(records).context("failed to encode history records")?)
}

/// Previous-year leave history
#[utoipa::path(
    get,
    path = "/api/history",
    responses(
        (status = 200, description = "Monthly leave taken in the history year", body = HistoryResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "History"
)]
pub async fn get_history(
    auth: AuthUser,
    store: web::Data<Store>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    let history = store.history(&auth.employee_id, config.history_year);
    Ok(HttpResponse::Ok().json(HistoryResponse::from(history)))
}

/* =========================
Confirm history as correct
========================= */
#[utoipa::path(
    post,
    path = "/api/history/confirm",
    responses(
        (status = 200, description = "History confirmed", body = HistoryResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "History"
)]
pub async fn confirm_history(
    auth: AuthUser,
    store: web::Data<Store>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    let year = config.history_year;
    let history = store.confirm_history(&auth.employee_id, year);

    let new_value = json!({
        "totalLeaves": history.total_availed(),
        "records": history.records,
    });
    store.append_audit(NewAuditRecord {
        employee_id: auth.employee_id.clone(),
        action: AuditAction::ConfirmBalance,
        previous_value: None,
        new_value: Some(new_value.to_string()),
        notes: Some(format!("Employee confirmed {} leave balance as correct", year)),
        performed_by: auth.login_id.clone(),
    });

    info!(employee_id = %auth.employee_id, year, "Leave history confirmed");
    Ok(HttpResponse::Ok().json(HistoryResponse::from(history)))
}

/* =========================
Dispute history
========================= */
#[utoipa::path(
    post,
    path = "/api/history/change-request",
    request_body = ChangeRequest,
    responses(
        (status = 200, description = "Change request recorded for HR review", body = HistoryResponse),
        (status = 400, description = "Missing notes or mismatched records", body = Object, example = json!({
            "message": "Please provide details about the discrepancy"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "History"
)]
pub async fn request_change(
    auth: AuthUser,
    store: web::Data<Store>,
    config: web::Data<Config>,
    payload: web::Json<ChangeRequest>,
) -> Result<HttpResponse, AppError> {
    let year = config.history_year;
    let ChangeRequest { notes, records } = payload.into_inner();

    let previous = store.history(&auth.employee_id, year);
    let proposed = records_json(&records)?;
    let history = store.request_history_change(&auth.employee_id, year, &notes, records)?;

    store.append_audit(NewAuditRecord {
        employee_id: auth.employee_id.clone(),
        action: AuditAction::RequestChange,
        previous_value: Some(records_json(&previous.records)?),
        new_value: Some(proposed),
        notes: history.change_request_notes.clone(),
        performed_by: auth.login_id.clone(),
    });

    info!(employee_id = %auth.employee_id, year, "Leave history change requested");
    Ok(HttpResponse::Ok().json(HistoryResponse::from(history)))
}

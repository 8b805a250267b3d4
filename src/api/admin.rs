use crate::{
    auth::auth::AuthUser,
    config::Config,
    error::AppError,
    model::audit::{AuditAction, NewAuditRecord},
    store::Store,
    utils::{import::import_roster, roster::apply_import},
};
use actix_web::{HttpResponse, web};
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct ImportRequest {
    /// extension picks the parser: .csv or .json
    #[schema(example = "roster.csv")]
    pub file_name: String,
    #[schema(example = "Employee No,Employee Name,DOB\nBAYN00004,Imelda Marcelo,10121988\n")]
    pub content: String,
}

#[derive(Serialize, ToSchema)]
pub struct ImportResponse {
    #[schema(example = 1)]
    pub imported: usize,
    #[schema(example = json!(["Row 3: Failed to parse"]))]
    pub skipped: Vec<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AuditQuery {
    /// internal employee id
    pub employee_id: Option<String>,
}

/* =========================
Roster import (HR)
========================= */
#[utoipa::path(
    post,
    path = "/api/admin/import",
    request_body = ImportRequest,
    responses(
        (status = 200, description = "Roster replaced; requests are kept", body = ImportResponse),
        (status = 400, description = "Unsupported or empty file", body = Object, example = json!({
            "message": "No valid employees found in file"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden", body = Object, example = json!({
            "message": "HR admin only"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
pub async fn import_employees(
    auth: AuthUser,
    store: web::Data<Store>,
    config: web::Data<Config>,
    payload: web::Json<ImportRequest>,
) -> Result<HttpResponse, AppError> {
    auth.require_hr_admin()?;

    let ImportRequest { file_name, content } = payload.into_inner();
    let year = config.history_year;
    let name = file_name.clone();

    // credential hashing is CPU bound, keep it off the async workers
    let outcome = web::block(move || import_roster(&name, &content, year))
        .await
        .map_err(|e| anyhow!("import worker failed: {}", e))??;

    for skipped in &outcome.skipped {
        warn!(file = %file_name, "{}", skipped);
    }

    let previous = store.employee_count();
    let skipped = outcome.skipped.clone();
    let imported = apply_import(&store, outcome);

    store.append_audit(NewAuditRecord {
        employee_id: auth.employee_id.clone(),
        action: AuditAction::AdminUpdate,
        previous_value: Some(format!("{} employees", previous)),
        new_value: Some(format!("{} employees", imported)),
        notes: Some(format!("Imported roster from {}", file_name)),
        performed_by: auth.login_id.clone(),
    });

    info!(file = %file_name, imported, skipped = skipped.len(), "Roster imported");
    Ok(HttpResponse::Ok().json(ImportResponse { imported, skipped }))
}

/// Audit log (HR)
#[utoipa::path(
    get,
    path = "/api/admin/audit",
    params(AuditQuery),
    responses(
        (status = 200, description = "Audit records, oldest first", body = [crate::model::audit::AuditRecord]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
pub async fn audit_log(
    auth: AuthUser,
    store: web::Data<Store>,
    query: web::Query<AuditQuery>,
) -> Result<HttpResponse, AppError> {
    auth.require_hr_admin()?;
    Ok(HttpResponse::Ok().json(store.audit_log(query.employee_id.as_deref())))
}

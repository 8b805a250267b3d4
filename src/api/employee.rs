use crate::{
    auth::auth::AuthUser, error::AppError, model::employee::Employee, model::role::Role,
    store::Store,
};
use actix_web::{HttpResponse, web};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

#[derive(Serialize, ToSchema)]
pub struct ProfileResponse {
    pub employee: Employee,
    pub role: Role,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateSettings {
    /// empty or missing clears the manager email
    #[schema(example = "manager@company.ae", format = "email", nullable = true)]
    pub manager_email: Option<String>,
}

/// Validated manager email; `None` means clear it.
pub fn normalize_manager_email(raw: Option<&str>) -> Result<Option<String>, AppError> {
    match raw.map(str::trim).filter(|e| !e.is_empty()) {
        None => Ok(None),
        Some(email) if EMAIL.is_match(email) => Ok(Some(email.to_string())),
        Some(_) => Err(AppError::InvalidEmail),
    }
}

/// Own profile
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Profile of the signed-in employee", body = ProfileResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Employee no longer on the roster", body = Object, example = json!({
            "message": "Employee not found"
        }))
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(auth: AuthUser, store: web::Data<Store>) -> Result<HttpResponse, AppError> {
    let employee = store
        .employee(&auth.employee_id)
        .ok_or(AppError::EmployeeNotFound)?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        employee,
        role: auth.role,
    }))
}

/// Set or clear the manager email
#[utoipa::path(
    put,
    path = "/api/me/settings",
    request_body = UpdateSettings,
    responses(
        (status = 200, description = "Settings saved", body = Employee),
        (status = 400, description = "Invalid email address", body = Object, example = json!({
            "message": "Invalid email address"
        })),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_settings(
    auth: AuthUser,
    store: web::Data<Store>,
    payload: web::Json<UpdateSettings>,
) -> Result<HttpResponse, AppError> {
    let email = normalize_manager_email(payload.manager_email.as_deref())?;
    let employee = store.set_manager_email(&auth.employee_id, email)?;

    info!(
        employee_id = %employee.employee_id,
        manager_email = ?employee.manager_email,
        "Manager email updated"
    );

    Ok(HttpResponse::Ok().json(employee))
}

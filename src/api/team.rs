use crate::{
    auth::auth::AuthUser,
    config::Config,
    error::AppError,
    leave::team::team_overview,
    store::Store,
};
use actix_web::{HttpResponse, web};
use chrono::Local;

/// Team balances and upcoming leave (Manager/HR)
#[utoipa::path(
    get,
    path = "/api/team",
    responses(
        (status = 200, description = "Balances of direct reports and their upcoming leave", body = crate::leave::team::TeamOverview),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden", body = Object, example = json!({
            "message": "Manager/HR only"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Team"
)]
pub async fn get_team(
    auth: AuthUser,
    store: web::Data<Store>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    auth.require_manager_or_hr()?;

    let manager = store
        .employee(&auth.employee_id)
        .ok_or(AppError::EmployeeNotFound)?;

    let overview = team_overview(
        &manager,
        &store.employees(),
        &store.all_requests(),
        Local::now().date_naive(),
        config.upcoming_window_days,
    );

    Ok(HttpResponse::Ok().json(overview))
}

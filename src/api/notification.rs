use crate::{auth::auth::AuthUser, error::AppError, store::Store};
use actix_web::{HttpResponse, web};

/// Manager notifications raised by the caller's own requests
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Queued notifications, oldest first", body = [crate::model::notification::EmailNotification]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn list_notifications(
    auth: AuthUser,
    store: web::Data<Store>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(store.notifications_for(&auth.employee_id)))
}

use crate::{error::AppError, model::role::Role};
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};

/// Identity placed in request extensions by the auth middleware.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub login_id: String,
    /// internal employee record id
    pub employee_id: String,
    pub role: Role,
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or(AppError::InvalidToken),
        )
    }
}

impl AuthUser {
    pub fn require_hr_admin(&self) -> Result<(), AppError> {
        if self.role == Role::HrAdmin {
            Ok(())
        } else {
            Err(AppError::Forbidden("HR admin only"))
        }
    }

    pub fn require_manager_or_hr(&self) -> Result<(), AppError> {
        if matches!(self.role, Role::HrAdmin | Role::Manager) {
            Ok(())
        } else {
            Err(AppError::Forbidden("Manager/HR only"))
        }
    }
}

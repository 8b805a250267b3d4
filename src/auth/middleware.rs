use crate::auth::auth::AuthUser;
use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::model::role::Role;
use crate::models::TokenType;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use serde_json::json;

pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?;

    let header_value = match req.headers().get("Authorization") {
        Some(h) => h.to_str().map_err(|_| {
            actix_web::error::ErrorUnauthorized(
                json!({"message": "Invalid Authorization header encoding"}),
            )
        })?,
        None => {
            let resp = HttpResponse::Unauthorized()
                .json(json!({"message": "Missing Authorization header"}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    let token = match header_value.strip_prefix("Bearer ") {
        Some(t) => t,
        None => {
            let resp = HttpResponse::Unauthorized()
                .json(json!({"message": "Authorization header must start with Bearer"}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) if c.token_type == TokenType::Access => c,
        Ok(_) => {
            let resp = HttpResponse::Unauthorized()
                .json(json!({"message": "Access token required"}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
        Err(e) => {
            let resp = HttpResponse::Unauthorized()
                .json(json!({"message": "Invalid or expired token", "details": e}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    let role = match Role::from_id(claims.role) {
        Some(role) => role,
        None => {
            let resp = HttpResponse::Unauthorized().json(json!({"message": "Invalid role"}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    req.extensions_mut().insert(AuthUser {
        login_id: claims.sub,
        employee_id: claims.employee_id,
        role,
    });

    next.call(req).await
}

use crate::{
    auth::{
        credentials::{authenticate, role_for},
        jwt::{generate_access_token, generate_refresh_token, verify_token},
    },
    config::Config,
    error::AppError,
    model::role::Role,
    models::{Claims, LoginReqDto, RefreshReqDto, TokenPair, TokenType},
    store::Store,
    utils::token_cache::RevokedTokens,
};
use actix_web::{HttpResponse, web};
use anyhow::Context;
use tracing::{debug, info, instrument};

// auth end points

fn issue_pair(
    login_id: &str,
    employee_id: &str,
    role: Role,
    config: &Config,
) -> Result<(TokenPair, Claims), AppError> {
    let access_token = generate_access_token(
        login_id,
        employee_id,
        role.id(),
        &config.jwt_secret,
        config.access_token_ttl,
    )
    .context("failed to sign access token")?;

    let (refresh_token, refresh_claims) = generate_refresh_token(
        login_id,
        employee_id,
        role.id(),
        &config.jwt_secret,
        config.refresh_token_ttl,
    )
    .context("failed to sign refresh token")?;

    Ok((
        TokenPair {
            access_token,
            refresh_token,
        },
        refresh_claims,
    ))
}

/// Claims of a well-formed, unexpired refresh token. Revocation is checked
/// separately, by spending the token.
fn refresh_claims(token: &str, config: &Config) -> Result<Claims, AppError> {
    let claims = verify_token(token, &config.jwt_secret).map_err(|e| {
        debug!(error = %e, "Refresh token rejected");
        AppError::InvalidToken
    })?;

    if claims.token_type != TokenType::Refresh {
        return Err(AppError::InvalidToken);
    }
    Ok(claims)
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Token pair issued", body = TokenPair),
        (status = 400, description = "Missing employee id or malformed date of birth", body = Object, example = json!({
            "message": "Please enter your Date of Birth in DDMMYYYY format"
        })),
        (status = 401, description = "Invalid credentials", body = Object, example = json!({
            "message": "Invalid credentials"
        })),
        (status = 429, description = "Too many attempts")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(store, config, user),
    fields(employee_id = %user.employee_id.trim())
)]
pub async fn login(
    user: web::Json<LoginReqDto>,
    store: web::Data<Store>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    info!("Login request received");

    let employee = match authenticate(&store, &user.employee_id, &user.date_of_birth) {
        Ok(employee) => employee,
        Err(e) => {
            info!(error = %e, "Login failed");
            return Err(e);
        }
    };

    let role = role_for(&employee, &config);
    debug!(role = ?role, "Credentials verified");

    let (pair, issued) = issue_pair(&employee.employee_id, &employee.id, role, &config)?;
    debug!(jti = %issued.jti, "Refresh token issued");

    info!("Login successful");
    Ok(HttpResponse::Ok().json(pair))
}

#[utoipa::path(
    post,
    path = "/auth/refresh",
    request_body = RefreshReqDto,
    responses(
        (status = 200, description = "New token pair; the presented refresh token is revoked", body = TokenPair),
        (status = 401, description = "Invalid, expired or revoked refresh token")
    ),
    tag = "Auth"
)]
pub async fn refresh_token(
    body: web::Json<RefreshReqDto>,
    store: web::Data<Store>,
    config: web::Data<Config>,
    revoked: web::Data<RevokedTokens>,
) -> Result<HttpResponse, AppError> {
    let claims = refresh_claims(&body.refresh_token, &config)?;

    // check and revoke in one step so a token is only ever rotated once
    if !revoked.revoke_once(&claims.jti).await {
        debug!(jti = %claims.jti, "Refresh token already spent");
        return Err(AppError::InvalidToken);
    }

    // the roster may have changed since the token was issued
    let employee = store
        .employee_by_login(&claims.sub)
        .ok_or(AppError::InvalidToken)?;
    let role = role_for(&employee, &config);

    let (pair, new_claims) = issue_pair(&employee.employee_id, &employee.id, role, &config)?;

    debug!(old_jti = %claims.jti, new_jti = %new_claims.jti, "Refresh token rotated");
    Ok(HttpResponse::Ok().json(pair))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    request_body = RefreshReqDto,
    responses(
        (status = 204, description = "Refresh token revoked (also returned for unknown tokens)")
    ),
    tag = "Auth"
)]
pub async fn logout(
    body: web::Json<RefreshReqDto>,
    config: web::Data<Config>,
    revoked: web::Data<RevokedTokens>,
) -> HttpResponse {
    // idempotent: anything unusable is already as good as logged out
    if let Ok(claims) = refresh_claims(&body.refresh_token, &config) {
        if revoked.revoke_once(&claims.jti).await {
            info!(login_id = %claims.sub, "Logged out");
        }
    }

    HttpResponse::NoContent().finish()
}

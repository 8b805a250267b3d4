use crate::{
    api::{admin, employee, history, holiday, leave_request, notification, team},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let requests_per_min = requests_per_min.max(1);
        let per_ms = 60_000 / u64::from(requests_per_min);
        let cfg = GovernorConfigBuilder::default()
            .milliseconds_per_request(per_ms.max(1))
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .expect("limiter period and burst are non-zero");
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let logout_limiter = Arc::new(build_limiter(config.rate_logout_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter)
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter)
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(logout_limiter)
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/me")
                    .service(web::resource("").route(web::get().to(employee::get_me)))
                    .service(
                        web::resource("/settings").route(web::put().to(employee::update_settings)),
                    ),
            )
            .service(
                web::scope("/leave")
                    // /leave
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::leave_list))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    // fixed segments before /{id}
                    .service(
                        web::resource("/preview")
                            .route(web::post().to(leave_request::preview_leave)),
                    )
                    .service(
                        web::resource("/balance")
                            .route(web::get().to(leave_request::get_balance)),
                    )
                    .service(
                        web::resource("/summary")
                            .route(web::get().to(leave_request::get_summary)),
                    )
                    // /leave/{id}
                    .service(web::resource("/{id}").route(web::get().to(leave_request::get_leave)))
                    // /leave/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(leave_request::approve_leave)),
                    )
                    // /leave/{id}/reject
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(leave_request::reject_leave)),
                    ),
            )
            .service(
                web::scope("/history")
                    .service(web::resource("").route(web::get().to(history::get_history)))
                    .service(
                        web::resource("/confirm").route(web::post().to(history::confirm_history)),
                    )
                    .service(
                        web::resource("/change-request")
                            .route(web::post().to(history::request_change)),
                    ),
            )
            .service(web::resource("/team").route(web::get().to(team::get_team)))
            .service(
                web::resource("/notifications")
                    .route(web::get().to(notification::list_notifications)),
            )
            .service(web::resource("/holidays").route(web::get().to(holiday::list_holidays)))
            .service(
                web::resource("/calendar/business-days")
                    .route(web::get().to(holiday::count_business_days)),
            )
            .service(
                web::scope("/admin")
                    .service(
                        web::resource("/import").route(web::post().to(admin::import_employees)),
                    )
                    .service(web::resource("/audit").route(web::get().to(admin::audit_log))),
            ),
    );
}

// LOGIN (employee id + date of birth)
//  ├─ access_token (15 min)
//  └─ refresh_token (7 days)

// API REQUEST
//  └─ Authorization: Bearer access_token

// ACCESS EXPIRED
//  └─ POST /auth/refresh with refresh_token
//       └─ returns a new pair, old refresh_token revoked

use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};

use leave_planner::config::Config;
use leave_planner::docs::ApiDoc;
use leave_planner::leave::calendar::HolidayCalendar;
use leave_planner::routes;
use leave_planner::store::Store;
use leave_planner::utils::roster::load_seed;
use leave_planner::utils::token_cache::RevokedTokens;

use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Leave Planner"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let store = Data::new(Store::default());
    match &config.seed_file {
        Some(path) => {
            let count = load_seed(&store, path, config.history_year)?;
            info!(employees = count, seed = %path.display(), "Roster seeded");
        }
        None => warn!("No SEED_FILE configured; roster is empty until an HR import"),
    }
    if config.hr_admin_ids.is_empty() {
        warn!("HR_ADMIN_IDS is empty; nobody can import rosters or read the audit log");
    }

    let revoked = Data::new(RevokedTokens::new(config.refresh_token_ttl));
    let calendar = Data::new(HolidayCalendar::default());
    let server_addr = config.server_addr.clone();
    let config = Data::new(config);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard serves the JS/CSS assets
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(store.clone())
            .app_data(config.clone())
            .app_data(revoked.clone())
            .app_data(calendar.clone())
            .service(index)
            // Configure auth + protected routes with rate limiting
            .configure(|cfg| routes::configure(cfg, &config))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}

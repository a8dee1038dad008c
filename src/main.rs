use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;

use leave_approval::config::Config;
use leave_approval::db::init_db;
use leave_approval::docs::ApiDoc;
use leave_approval::repository::{
    LeaveDispatcher, LeaveEngine, MySqlBackend, SqlEmployeeDirectory, SqlLeaveStore, SqlNotifier,
};
use leave_approval::routes;
use leave_approval::workflow::SystemClock;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.tracing_level()?)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url, config.db_max_connections).await?;

    let engine = Data::new(LeaveEngine::new(
        SqlEmployeeDirectory::new(pool.clone()),
        SqlLeaveStore::new(pool.clone()),
        SystemClock,
    ));
    let dispatcher = Data::new(LeaveDispatcher::new(SqlNotifier::new(pool)));

    let server_addr = config.server_addr.clone();
    let config_data = Data::new(config);

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(config_data.clone())
            .app_data(engine.clone())
            .app_data(dispatcher.clone())
            .configure(|cfg| routes::configure::<MySqlBackend>(cfg, &config_data))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run()
    .await
    .context("Server terminated with an error")
}

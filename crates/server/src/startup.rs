use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::AppConfig;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use models::db::{connect_with_config, ensure_schema};
use service::customer::repo::seaorm::SeaOrmCustomerRepository;
use service::customer::CustomerRepository;

use crate::errors::StartupError;
use crate::routes::{self, AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::permissive()
}

/// Connect to the store and assemble the router for `cfg`.
///
/// The local SQLite store gets its table created on the way up; a remote
/// store is expected to already carry the `customers` table.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let db = connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Store(e.to_string()))?;
    if cfg.database.is_sqlite() {
        ensure_schema(&db).await.map_err(|e| StartupError::Store(e.to_string()))?;
    }

    let repo: Arc<dyn CustomerRepository> = Arc::new(SeaOrmCustomerRepository::new(db));
    let state = AppState::new(repo);
    Ok(routes::build_router(
        state,
        build_cors(),
        Duration::from_secs(cfg.server.request_timeout_secs),
    ))
}

/// Serve `app` on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}

/// Public entry: load config, build the app and run the HTTP server.
pub async fn run() -> Result<(), StartupError> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let app = build_app(&cfg).await?;

    let addr: SocketAddr = cfg
        .server
        .bind_addr()
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))?;
    let listener = TcpListener::bind(addr).await.map_err(anyhow::Error::from)?;
    info!(%addr, "customer api listening");

    serve(listener, app, async {
        let _ = tokio::signal::ctrl_c().await;
        info!("shutdown signal received");
    })
    .await?;
    Ok(())
}

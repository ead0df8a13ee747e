// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use bi_dashboard::application::catalog::DashboardCatalog;
use bi_dashboard::application::dashboard_service::DashboardService;
use bi_dashboard::infrastructure::config::{load_app_config, load_catalog_config};
use bi_dashboard::infrastructure::postgres_executor::PgQueryExecutor;
use bi_dashboard::presentation::app_state::AppState;
use bi_dashboard::presentation::handlers;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    // Load configuration
    let app_config = load_app_config().context("failed to load config/app")?;
    let catalog = DashboardCatalog::from_config(
        load_catalog_config().context("failed to load config/dashboards")?,
    )?;
    for set in catalog.iter() {
        tracing::info!(
            dashboard = %set.dashboard,
            route = %set.route,
            charts = set.charts.len(),
            table = %set.table.route,
            "Registered dashboard"
        );
    }

    // Create executor (infrastructure layer)
    let executor = Arc::new(PgQueryExecutor::connect(&app_config.database).await?);

    // Create services (application layer)
    let dashboard_service = DashboardService::new(executor, Arc::new(catalog));
    let state = Arc::new(AppState { dashboard_service });

    // Build router (presentation layer)
    let mut router = handlers::router()
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    if let Some(origin) = &app_config.server.cors_origin {
        let origin: HeaderValue = origin
            .parse()
            .context("server.cors_origin is not a valid header value")?;
        router = router.layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET]),
        );
    }

    // Start server
    let addr: SocketAddr = app_config
        .server
        .bind
        .parse()
        .context("server.bind is not a socket address")?;
    tracing::info!("Starting bi-dashboard service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}

//! Campaign Ingest server.
//!
//! Configuration is read from `CAMPAIGN_INGEST__*` environment variables
//! (see `campaign_ingest::config`). `RUST_LOG` overrides the configured log
//! filter.

use std::sync::Arc;

use anyhow::{Context, Result};
use secrecy::ExposeSecret;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use campaign_ingest::adapters::http::{app_router, IngestPorts, WebhookAppState};
use campaign_ingest::adapters::postgres::{
    PostgresDeliveryRepository, PostgresEventRepository, PostgresMemberRepository,
    PostgresRegistrationRepository,
};
use campaign_ingest::adapters::sanitizer::AmmoniaSanitizer;
use campaign_ingest::config::{AppConfig, LogFormat, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    init_tracing(&config.server);
    config.validate().context("validating configuration")?;

    let verifier = config.webhook.build_verifier()?;
    let business_tz = config.webhook.business_tz()?;
    info!(
        mode = verifier.mode().as_str(),
        business_timezone = %business_tz,
        environment = ?config.server.environment,
        "Starting campaign ingest"
    );

    let db = &config.database;
    let pool = db
        .pool_options()
        .connect(db.url.expose_secret())
        .await
        .with_context(|| format!("connecting to PostgreSQL at {}", db.endpoint()))?;
    info!(
        endpoint = %db.endpoint(),
        max_connections = db.max_connections,
        "Database pool ready"
    );

    if db.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("running migrations")?;
        info!("Migrations applied");
    }

    let ports = IngestPorts {
        deliveries: Arc::new(PostgresDeliveryRepository::new(pool.clone())),
        events: Arc::new(PostgresEventRepository::new(pool.clone())),
        members: Arc::new(PostgresMemberRepository::new(pool.clone())),
        registrations: Arc::new(PostgresRegistrationRepository::new(pool.clone())),
        sanitizer: Arc::new(AmmoniaSanitizer::new()),
    };
    let state = WebhookAppState::new(ports, verifier, business_tz);
    let app = app_router(state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("Shutdown complete");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match server.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

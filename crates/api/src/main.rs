//! API server entry point.

use std::sync::Arc;

use api::auth::{Hs256TokenVerifier, TokenVerifier};
use api::config::{Config, LogFormat};
use metrics_exporter_prometheus::PrometheusHandle;
use record_store::{InMemoryAssetStore, InMemoryRecordStore, PostgresRecordStore, RecordStore};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn serve<S: RecordStore + Clone + 'static>(
    store: S,
    config: &Config,
    metrics_handle: PrometheusHandle,
) -> Result<(), BoxError> {
    if config.jwt_secret.is_none() {
        tracing::warn!("JWT_SECRET is not set, using the insecure development secret");
    }
    let verifier: Arc<dyn TokenVerifier> =
        Arc::new(Hs256TokenVerifier::new(config.jwt_secret_or_dev().as_bytes()));

    // Images are uploaded by clients straight to object storage; the server
    // only ever removes them.
    let state = api::create_default_state(store, Arc::new(InMemoryAssetStore::new()));
    let app = api::create_app(state, verifier, metrics_handle);

    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down gracefully");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = Config::from_env();
    init_tracing(&config);

    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;

    match &config.database_url {
        Some(url) => {
            let store = PostgresRecordStore::connect(url, config.db_max_connections).await?;
            store.run_migrations().await?;
            tracing::info!(
                max_connections = config.db_max_connections,
                "connected to PostgreSQL, migrations applied"
            );
            serve(store, &config, metrics_handle).await
        }
        None => {
            tracing::warn!("DATABASE_URL is not set, records are kept in memory only");
            serve(InMemoryRecordStore::new(), &config, metrics_handle).await
        }
    }
}

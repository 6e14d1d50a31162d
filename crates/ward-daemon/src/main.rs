use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use ward_daemon::{api, config::DaemonConfig};
use ward_storage::{IncidentStore, MemStore};
use ward_storage_sqlite::SqliteStore;

#[derive(Debug, Parser)]
#[command(name = "ward-daemon", version, about = "Civic incident workflow daemon")]
struct Cli {
    /// Where the HTTP API will listen, e.g. 127.0.0.1:8787
    #[arg(long, default_value = "127.0.0.1:8787")]
    listen: String,

    /// Sqlite database file for incident records.
    #[arg(long, default_value = ".ward/ward.db")]
    db_path: PathBuf,

    /// Keep incidents in memory only (testing/demo; nothing survives restart).
    #[arg(long, default_value_t = false)]
    in_memory: bool,

    /// Detections must exceed this confidence to open an incident.
    #[arg(long, default_value_t = 0.25)]
    confidence_threshold: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if !cli.confidence_threshold.is_finite()
        || !(0.0..=1.0).contains(&cli.confidence_threshold)
    {
        anyhow::bail!(
            "--confidence-threshold must be within 0.0..=1.0, got {}",
            cli.confidence_threshold
        );
    }

    let config = DaemonConfig {
        listen: cli.listen,
        db_path: cli.db_path,
        in_memory: cli.in_memory,
        confidence_threshold: cli.confidence_threshold,
    };
    info!("starting daemon with config: {:?}", config);

    let store: Arc<dyn IncidentStore> = if config.in_memory {
        Arc::new(MemStore::new())
    } else {
        Arc::new(SqliteStore::open(&config.db_path)?)
    };

    let state = api::AppState::new(store, config.clone());

    let app = Router::new()
        .route("/v1/detections", post(api::submit_detection))
        .route("/v1/reports", post(api::submit_report))
        .route("/v1/assignments", post(api::assign))
        .route("/v1/completions", post(api::submit_completion))
        .route("/v1/verifications", post(api::submit_verification))
        .route("/v1/incidents", get(api::list_incidents))
        .route("/v1/incidents/{id}", get(api::get_incident))
        .route("/v1/workers/{worker}/tasks", get(api::worker_tasks))
        .route("/v1/stats", get(api::stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr: SocketAddr = config.listen.parse()?;
    info!("listening on http://{}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("shutdown requested");
}

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tvl_aggregator::{api, Config, FileSnapshotSource, Orchestrator, SnapshotSource};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        eprintln!("Server error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let source: Arc<dyn SnapshotSource> =
        Arc::new(FileSnapshotSource::new(config.snapshot_path.clone()));

    // Fail fast on an unreadable snapshot; later loads are per request.
    source
        .load()
        .await
        .with_context(|| format!("loading snapshot from {}", config.snapshot_path))?;

    let orchestrator = Arc::new(Orchestrator::new(source));
    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let app = api::create_router(api::AppState::new(config, orchestrator));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding to {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await.context("serving HTTP")?;
    Ok(())
}

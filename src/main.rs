use std::sync::Arc;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use container_dispatch::agent::HttpAgentClient;
use container_dispatch::api::{create_router, AppState};
use container_dispatch::config::Settings;
use container_dispatch::core::dispatch::Dispatcher;
use container_dispatch::monitoring::PrometheusMetricsProvider;
use container_dispatch::registry::{
    PostgresContainerRegistry, PostgresHostRegistry, PostgresOperationLog,
};

#[derive(Debug, Parser)]
#[command(name = "container-dispatch")]
#[command(about = "Load-aware container dispatch across hypervisor hosts")]
struct Args {
    /// Configuration directory (falls back to CONFIG_PATH, then "config").
    #[arg(long)]
    config: Option<String>,

    /// Override the listen address from configuration, host:port.
    #[arg(long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let settings = Settings::new(args.config.as_deref())?;
    info!("Starting container dispatch scheduler");

    let pool = PgPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let dispatcher = Arc::new(Dispatcher::new(
        Arc::new(PostgresHostRegistry::new(pool.clone())),
        Arc::new(PostgresContainerRegistry::new(pool.clone())),
        Arc::new(PostgresOperationLog::new(pool)),
        Arc::new(PrometheusMetricsProvider::new(&settings.metrics)?),
        Arc::new(HttpAgentClient::new(&settings.agent)?),
    ));

    let state = Arc::new(AppState { dispatcher });
    let app = create_router(state);

    let addr = args
        .listen
        .unwrap_or_else(|| format!("{}:{}", settings.server.host, settings.server.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

//! Guichet - session and authorization gate for the operations console
//! Mission: Decide allow/redirect for every navigation, inject bearer
//! credentials into backend calls, and land each session on the right area

use anyhow::{Context, Result};
use clap::Parser;
use guichet::{config::Config, server};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "guichet",
    about = "Session and authorization gate for the operations console"
)]
struct Cli {
    /// Port to listen on (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Credential store path (overrides CREDENTIALS_DB_PATH)
    #[arg(long)]
    credentials_db: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(path) = cli.credentials_db {
        config.credentials_db_path = path;
    }

    info!("🚀 Guichet session gate starting");
    info!("🔐 Credential store at: {}", config.credentials_db_path);
    info!("🌐 Console API at: {}", config.api_base_url);
    info!("📡 Console upstream at: {}", config.upstream_url);

    let addr = format!("0.0.0.0:{}", config.port);
    let state =
        server::AppState::new(config).context("Failed to initialize application state")?;
    let app = server::build_app(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("🎯 Gate listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "guichet=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

//! Netherlink panel server binary.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};

use netherlink_core::tracing_init::init_tracing;
use netherlink_server::auth::hash_api_key;
use netherlink_server::storage::PanelDatabase;
use netherlink_server::{AppState, DEFAULT_JAVA_CDN_URL, app};

#[derive(Parser, Debug)]
#[command(name = "netherlink-server")]
#[command(version, about = "Netherlink panel - launcher distribution API")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:8080", env = "NETHERLINK_ADDR")]
    addr: SocketAddr,

    /// Path to SQLite database file.
    #[arg(long, env = "NETHERLINK_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Outbound manifest fetch timeout in seconds.
    #[arg(long, default_value_t = 15, env = "NETHERLINK_FETCH_TIMEOUT")]
    fetch_timeout: u64,

    /// Java runtime catalog URL served when no custom blob is configured.
    #[arg(long, default_value = DEFAULT_JAVA_CDN_URL, env = "NETHERLINK_JAVA_CDN_URL")]
    java_cdn_url: String,

    /// Raw admin key installed (hashed) at startup, for fresh deployments.
    #[arg(long, env = "NETHERLINK_BOOTSTRAP_KEY")]
    bootstrap_key: Option<String>,

    /// Output logs as JSON (for structured log aggregation).
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing("netherlink_server=info,tower_http=info", args.log_json);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %args.addr,
        "Starting netherlink-server"
    );

    let db = match &args.db_path {
        Some(path) => {
            info!(path = %path.display(), "Opening panel database");
            PanelDatabase::open(path).await?
        }
        None => {
            let default_path = default_db_path()?;
            info!(path = %default_path.display(), "Opening panel database (default path)");
            PanelDatabase::open(&default_path).await?
        }
    };

    if let Some(raw) = args
        .bootstrap_key
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
    {
        db.ensure_api_key(&hash_api_key(raw), "bootstrap").await?;
        warn!("Bootstrap API key installed from configuration");
    }

    let state = AppState::new(db, Duration::from_secs(args.fetch_timeout), args.java_cdn_url)?;
    let router = app(state);

    let listener = tokio::net::TcpListener::bind(args.addr).await?;
    info!(addr = %args.addr, "Panel listening");

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Panel stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Received shutdown signal");
}

fn default_db_path() -> anyhow::Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home.join(".netherlink").join("panel.db"))
}

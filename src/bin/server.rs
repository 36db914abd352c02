/// Behimelobot catalog proxy
use behimelobot::server::{self, AppState, ProxyConfig};
use clap::Parser;
use std::{net::SocketAddr, path::PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "behimelobot-server")]
#[command(about = "Catalog proxy for the Behimelobot music browser", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "BEHIMELOBOT_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on, overriding the configuration
    #[arg(short, long)]
    port: Option<u16>,

    /// Built web client to serve next to the API
    #[arg(long, env = "BEHIMELOBOT_WEB_DIR")]
    web_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "behimelobot=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = ProxyConfig::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(web_dir) = cli.web_dir {
        config.web_dir = Some(web_dir);
    }

    if !config.token_configured() {
        tracing::warn!("No catalog API token configured (set BEHIMELOBOT_API_TOKEN)");
    }

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    let app = server::router(AppState::from_config(&config));

    tracing::info!("Upstream: {}", config.upstream_base_url);
    match &config.web_dir {
        Some(dir) if dir.join("index.html").is_file() => {
            tracing::info!("Serving web client from {}", dir.display())
        }
        Some(dir) => tracing::warn!("No index.html in {}", dir.display()),
        None => tracing::info!("No web directory configured, serving the API only"),
    }
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

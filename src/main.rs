use anyhow::Context;
use clap::Parser;
use logsift::config::{Config, Loaded};
use logsift::observe::TracingObserver;
use logsift::{api, logging, QueryEngine};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "logsift", about = "logsift: query service over rotated access logs")]
struct Cli {
    /// YAML config file. Defaults apply when it does not exist.
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Port for the HTTP query endpoint.
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Directory for logsift's own hourly log files.
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _sink = logging::init(&cli.log_dir)?;

    let (config, loaded) = Config::load(&cli.config).context("loading config")?;
    if loaded == Loaded::Defaults {
        tracing::warn!(
            config = %cli.config.display(),
            log_path = %config.log_path.display(),
            "config file not found, using defaults"
        );
    }

    let engine = Arc::new(QueryEngine::from_config(&config, Arc::new(TracingObserver)));

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, log_path = %engine.catalog().dir().display(), "logsift listening");

    axum::serve(listener, api::router(engine))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    tracing::info!("logsift stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "cannot listen for ctrl-c");
    }
}

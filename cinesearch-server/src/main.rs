use std::path::PathBuf;

use anyhow::Context;
use cinesearch_core::CatalogClient;
use cinesearch_server::{
    AppState, create_app,
    infra::{
        config::{ConfigLoad, ConfigLoader},
        telemetry,
    },
};
use clap::{Args as ClapArgs, Parser};
use tracing::{info, warn};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "cinesearch-server")]
#[command(about = "JSON proxy for the movie catalog")]
struct Cli {
    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Configuration file (TOML)
    #[arg(short, long, env = "CINESEARCH_CONFIG")]
    config: Option<PathBuf>,

    /// Dotenv file to load instead of `./.env`
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_server(cli.serve).await
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = args.config {
        loader = loader.with_config_path(path);
    }
    if let Some(path) = args.env_file {
        loader = loader.with_env_file(path);
    }
    let ConfigLoad {
        mut config,
        warnings,
    } = loader.load().context("failed to load configuration")?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }

    telemetry::init_tracing()?;

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "configuration file loaded");
    }
    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => warn!(message = %warning.message, "configuration warning"),
        }
    }

    info!(
        catalog.base_url = %config.catalog.base_url,
        catalog.timeout = ?config.catalog.request_timeout,
        catalog.token_lifetime = ?config.catalog.token_lifetime,
        cache.genre_ttl = ?config.cache.genre_ttl,
        "catalog configuration in effect"
    );

    let client = CatalogClient::new(config.catalog.client_settings())
        .context("failed to build catalog client")?;
    let addr = config.server.bind_address();
    let router = create_app(AppState::new(client, config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Starting Cinesearch proxy on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

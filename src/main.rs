use anyhow::Result;
use clap::Parser;
use gh_video_cdn::{
    cli,
    config::{AppConfig, Args, Command, GlobalArgs, ManageAction, ServerConfig},
    routes::build_router,
    state::{AppState, Backend},
};
use std::io::ErrorKind;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // --- .env first, so RUST_LOG can live there too ---
    let dotenv = dotenvy::dotenv();

    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match dotenv {
        Ok(path) => tracing::debug!("loaded environment from {}", path.display()),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!("could not read .env: {}", err),
    }

    let Args { global, command } = Args::parse();

    match command {
        Command::Upload { path } => {
            let backend = connect(&global)?;
            cli::upload(&backend, &path).await
        }
        Command::Manage { action } => {
            let backend = connect(&global)?;
            cli::manage(&backend, action.unwrap_or(ManageAction::List)).await
        }
        Command::Serve { host, port } => serve(&global, host, port).await,
    }
}

/// Resolve configuration and build the GitHub-backed services.
/// Missing settings are fatal for CLI commands.
fn connect(global: &GlobalArgs) -> Result<Backend> {
    let cfg = AppConfig::from_env(global)?;
    tracing::debug!("resolved configuration: {:?}", cfg);
    Ok(Backend::connect(cfg)?)
}

async fn serve(global: &GlobalArgs, host: Option<String>, port: Option<u16>) -> Result<()> {
    let server = ServerConfig::from_env_and_args(host, port)?;

    // --- Initialize core services; the web UI reports missing settings ---
    let state = match AppConfig::from_env(global) {
        Ok(cfg) => {
            tracing::info!(
                "uploading to {}/{}",
                cfg.credentials.account,
                cfg.credentials.repository
            );
            AppState::ready(Backend::connect(cfg)?)
        }
        Err(err) => {
            tracing::warn!("starting without GitHub credentials: {}", err);
            AppState::unconfigured(err)
        }
    };

    let app = build_router(state);

    // --- Start server ---
    let addr = server.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(server.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", server.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    tracing::info!("Gallery available at http://{}/gallery", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

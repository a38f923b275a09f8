use std::future::Future;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

mod error;
mod handlers;
mod profile;
mod render;
mod routes;
mod signing;
mod state;


use self::state::AppState;

/// French vocabulary lookup and notebook
#[derive(Parser, Debug)]
#[command(name = "lexique", version, about)]
struct Args {
    /// JSON configuration file
    #[arg(long, env = "LEXIQUE_CONFIG", default_value = "config.json")]
    config: PathBuf,

    /// Address to listen on, overrides the configuration
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first so clap sees LEXIQUE_CONFIG from it
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();

    let mut config = profile::load_config(&args.config)?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    let state = AppState::build(config).await?;

    // Shutdown future (Ctrl+C)
    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl+c: {e}");
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutdown requested");
    };

    run(state, shutdown).await
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    if atty::is(atty::Stream::Stdout) {
        subscriber.init();
    } else {
        subscriber.json().init();
    }
}

pub async fn run(
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let bind = state.config.server.bind.clone();
    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;

    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("server exited")?;

    Ok(())
}

// ABOUTME: Entry point for the slidecast binary.
// ABOUTME: Loads config, recovers persisted containers, spawns the deck actor and timers, serves HTTP.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use slidecast_core::{DeckState, FileSinkDirectory, OutputSync};
use slidecast_server::{AppState, SlidecastConfig, create_router};
use slidecast_store::{Command, DeckHandle, RecordStore};

/// Live-presentation control daemon.
#[derive(Debug, Parser)]
#[command(name = "slidecast", version, about)]
struct Cli {
    /// Socket address to bind (overrides SLIDECAST_BIND)
    #[arg(long)]
    bind: Option<String>,

    /// Data directory (overrides SLIDECAST_HOME)
    #[arg(long)]
    home: Option<std::path::PathBuf>,

    /// Output sink name (overrides SLIDECAST_SINK)
    #[arg(long)]
    sink: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slidecast=debug,tower_http=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let mut config = SlidecastConfig::from_env().context("loading configuration")?;
    if let Some(bind) = cli.bind {
        config.bind = bind.parse().context("parsing --bind")?;
    }
    if let Some(home) = cli.home {
        config.sink_dir = home.join("sinks");
        config.home = home;
    }
    if let Some(sink) = cli.sink {
        config.sink_name = Some(sink);
    }

    tracing::info!("slidecast starting up, home: {}", config.home.display());

    let store = RecordStore::new(config.home.clone()).context("opening record store")?;
    let containers = store.load_all().context("recovering containers")?;
    tracing::info!("recovered {} container(s)", containers.len());
    let state = DeckState::from_containers(containers);

    std::fs::create_dir_all(&config.sink_dir).context("creating sink directory")?;
    let sinks = FileSinkDirectory::new(config.sink_dir.clone());
    let output = OutputSync::new(Box::new(sinks), config.sink_name.clone());
    let latest = output.latest_handle();

    let deck = slidecast_store::spawn(state, store, output);
    deck.refresh().await?;

    spawn_ticker(deck.clone(), config.autosave_interval, || Command::AutosaveTick);
    spawn_ticker(deck.clone(), config.sink_check_interval, || {
        Command::SinkCheckTick
    });

    let app_state = Arc::new(AppState::new(deck.clone(), latest));
    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    tracing::info!("overlay endpoint listening on http://{}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    // Flush every container before exiting.
    tracing::info!("shutting down, saving all containers");
    deck.save_all().await?;

    Ok(())
}

/// Periodically send a tick command to the actor. Ticks share the command
/// channel with mutations, so they never interleave with one.
fn spawn_ticker(
    deck: DeckHandle,
    period: std::time::Duration,
    make: impl Fn() -> Command + Send + 'static,
) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        interval.tick().await; // first tick fires immediately
        loop {
            interval.tick().await;
            if deck.send(make()).await.is_err() {
                break;
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install ctrl-c handler: {}", e);
    }
}

// College fantasy football client entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Open the origin store (SQLite) shared by every page context
// 4. Build the REST client
// 5. Create mpsc channels and the app state
// 6. Spawn app logic task
// 7. Run the TUI until the user quits
// 8. Cleanup on exit
//
// An optional first argument picks the start page: home, signin, league,
// players (or 1-4).

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use cff_app::app;
use cff_app::protocol::PageId;
use cff_core::api::client::HttpApi;
use cff_core::config;
use cff_core::db::Database;
use cff_core::session::SharedStorage;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("cff client starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: api={}, timeout={}s",
        config.api.base_url, config.api.timeout_secs
    );

    let store_path = config.store_path();
    let db = Database::open(&store_path).context("failed to open client store")?;
    info!("Client store opened at {}", store_path);
    let shared = SharedStorage::new(db);

    let api = HttpApi::from_config(&config.api).context("failed to build HTTP client")?;

    let start = match std::env::args().nth(1) {
        Some(arg) => parse_start_page(&arg).unwrap_or_else(|| {
            warn!("Unknown start page {:?}, using Home", arg);
            PageId::Home
        }),
        None => PageId::Home,
    };

    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (api_tx, api_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(64);

    let app_state = app::AppState::new(&shared, Arc::new(api), &config.search, api_tx, start);
    let storage_rx = shared.subscribe();

    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, api_rx, storage_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    if let Err(e) = cff_tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    let _ = tokio::time::timeout(Duration::from_secs(5), app_handle).await;

    info!("cff client shut down cleanly");
    Ok(())
}

fn parse_start_page(arg: &str) -> Option<PageId> {
    match arg.to_ascii_lowercase().as_str() {
        "home" => Some(PageId::Home),
        "signin" | "sign-in" | "login" => Some(PageId::SignIn),
        "league" => Some(PageId::League),
        "players" => Some(PageId::Players),
        other => other.parse().ok().and_then(PageId::from_number),
    }
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("cff.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cff=info,cff_core=info,cff_app=info,cff_tui=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

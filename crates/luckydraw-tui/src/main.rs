// Lucky draw console: main entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config (copying defaults into config/ on first run)
// 3. Create mpsc channels
// 4. Spawn app logic task
// 5. Run the TUI until the operator quits
// 6. Cleanup on exit

use std::time::Duration;

use luckydraw_core::config;
use luckydraw_tui::app;
use luckydraw_tui::tui;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("Lucky draw starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: range {}..={}, {} per round, {} ms draw delay",
        config.draw.min, config.draw.max, config.draw.draw_count, config.ui.draw_delay_ms
    );

    // 3. Create mpsc channels (before AppState so draw_tx can be passed in)
    let (draw_tx, draw_rx) = mpsc::channel(16);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let app_state = app::AppState::new(config, draw_tx);

    // 4. Spawn app logic task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, draw_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 5. The TUI consumes ui_rx and sends commands through cmd_tx.
    // It blocks until the operator quits.
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    // 6. Cleanup: wait for app task to finish (with timeout)
    let _ = tokio::time::timeout(Duration::from_secs(5), app_handle).await;

    info!("Lucky draw shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("luckydraw.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("luckydraw_tui=info,luckydraw_core=info,warn")
        }))
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

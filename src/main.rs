//! Termdeck - Main entry point.
//!
//! A terminal workbench: concurrent shell sessions shown as tabs and in
//! splittable panes, grouped by project.
//!
//! Usage: termdeck [OPTIONS] [PROJECT_DIR]
//!
//! Options:
//!   --version, -v    Show version
//!   --fresh          Ignore the saved workspace
//!
//! The project defaults to the current directory.

use std::env;
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Arc;

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use termdeck::app::App;
use termdeck::bridge::{NativePtyBridge, SpawnConfig};
use termdeck::config::Config;
use termdeck::logging;
use termdeck::snapshot::WorkspaceSnapshot;
use termdeck::workbench::Workbench;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum iterations for main loop (safety bound).
const MAX_MAIN_ITERATIONS: usize = 10_000_000;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--version" || a == "-v") {
        println!("termdeck v{}", VERSION);
        return Ok(());
    }
    let fresh = args.iter().any(|a| a == "--fresh");

    let project = match args.iter().skip(1).find(|a| !a.starts_with('-')) {
        Some(dir) => PathBuf::from(dir),
        None => env::current_dir()?,
    };

    let config = Config::load()?;
    if let Err(e) = logging::init(&config.log_config) {
        eprintln!("Logging disabled: {}", e);
    }
    info!("Starting termdeck v{} in {}", VERSION, project.display());

    // Set up panic hook to restore terminal on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let size = terminal.size()?;

    let spawn = SpawnConfig::default()
        .shell(config.terminal.shell.resolve_path())
        .size(size.width, size.height.saturating_sub(2));
    let bridge = Arc::new(NativePtyBridge::with_config(spawn));

    let mut workbench: Workbench<NativePtyBridge> =
        Workbench::new(Arc::clone(&bridge), project.clone(), config.terminal_settings());
    let saved = if fresh {
        None
    } else {
        WorkspaceSnapshot::load().unwrap_or_else(|e| {
            warn!("Could not read saved workspace: {}", e);
            None
        })
    };
    let restored = match saved.filter(|s| s.project_path == project) {
        Some(snapshot) => match workbench.restore(&snapshot).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Workspace restore failed: {}", e);
                false
            }
        },
        None => false,
    };
    if !restored && workbench.registry().is_empty() {
        workbench.create_session(None).await?;
    }

    let mut app = App::new(workbench, config);

    let mut iterations = 0;
    while app.is_running() && iterations < MAX_MAIN_ITERATIONS {
        terminal.draw(|frame| app.render(frame))?;

        app.update().await?;
        bridge.poll_status();

        if let Some(shell) = app.take_shell_change() {
            info!("Shell changed to {}", shell.display_name());
            bridge.set_shell(shell.resolve_path());
        }

        iterations += 1;
    }

    if let Err(e) = app.workbench().snapshot().save() {
        warn!("Could not save workspace: {}", e);
    }
    bridge.shutdown();
    info!("termdeck exiting");

    restore_terminal()?;
    Ok(())
}

/// Restores the terminal to its original state.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

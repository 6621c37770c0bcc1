//! book-admin binary entry point.
//!
//! Resolves settings, starts file logging, mounts the admin page from the stored
//! session, then runs the TUI in raw mode and restores the terminal on exit.
//!
use std::path::{Path, PathBuf};
use std::sync::Arc;

use book_admin::api::HttpBookApi;
use book_admin::app::config::AdminConfig;
use book_admin::app::keymap::Keymap;
use book_admin::app::{self, AppState, Theme, config_file_read_path, config_file_write_path};
use book_admin::error::{Context, Result, simple_error};
use book_admin::session::FileSessionStore;
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Terminal admin console for the book API.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Settings file (default: admin.conf in the config directory)
    #[arg(long, env = "BOOK_ADMIN_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the book API
    #[arg(long, env = "BOOK_ADMIN_API_URL")]
    api_url: Option<String>,

    /// JSON file holding the signed-in session
    #[arg(long, env = "BOOK_ADMIN_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Log file; RUST_LOG controls the level
    #[arg(long, env = "BOOK_ADMIN_LOG_FILE")]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Flags and environment win over the settings file.
    fn resolve(self) -> Result<AdminConfig> {
        let mut cfg = AdminConfig::load_or_init(self.config.as_deref())?;
        if let Some(url) = self.api_url {
            cfg.api_url = url;
        }
        if let Some(path) = self.session_file {
            cfg.session_file = path;
        }
        if let Some(path) = self.log_file {
            cfg.log_file = path;
        }
        Ok(cfg)
    }
}

fn init_logging(path: &Path) -> Result<WorkerGuard> {
    let file_name = path
        .file_name()
        .ok_or_else(|| simple_error(format!("log file has no name: {}", path.display())))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir).with_ctx(|| format!("create log directory {}", dir.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("book_admin=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}

fn config_path(name: &str) -> PathBuf {
    config_file_read_path(name).unwrap_or_else(|| config_file_write_path(name))
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Cli::parse().resolve()?;
    let _guard = init_logging(&cfg.log_file)?;
    info!(api_url = %cfg.api_url, session_file = %cfg.session_file.display(), "starting book-admin");

    let api = HttpBookApi::new(cfg.api_url.as_str()).with_ctx(|| format!("api url {}", cfg.api_url))?;
    let store = FileSessionStore::new(&cfg.session_file);
    let theme = Theme::load_or_init(&config_path("theme.conf"));
    let keymap = Keymap::load_or_init(&config_path("keybinds.conf"));
    let state = AppState::mount(&store, Arc::new(api), theme, keymap);

    let mut terminal = init_terminal().map_err(|e| format!("init terminal: {e}"))?;
    let res = app::run(&mut terminal, state).await;

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture).ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        eprintln!("application error: {err}");
    }
    Ok(())
}

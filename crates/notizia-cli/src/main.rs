//! `notizia`: terminal UI for the Notizia record store.
//!
//! # Usage
//!
//! ```
//! notizia --url http://localhost:5232
//! notizia --config ~/.config/notizia/config.toml
//! notizia --db ~/notizia.db
//! ```
//!
//! Set `NOTIZIA_LOG=/path/to/file` to write a trace log; nothing is logged to
//! the terminal the UI draws on.

mod app;
mod client;
mod form;
mod ui;

use std::{fs::OpenOptions, io, path::PathBuf, sync::Mutex, time::Duration};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use client::{ApiClient, ApiConfig};
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use notizia_core::store::RecordStore;
use notizia_store_sqlite::SqliteStore;
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:5232";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "notizia", about = "Terminal UI for the Notizia record store")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the notizia server (default: http://localhost:5232).
  #[arg(long, env = "NOTIZIA_URL")]
  url: Option<String>,

  /// Open this SQLite file directly instead of talking to a server. Takes
  /// precedence over `--url`.
  #[arg(long, value_name = "FILE")]
  db: Option<PathBuf>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  init_logging()?;

  if let Some(path) = &args.db {
    let store = SqliteStore::open(path)
      .await
      .with_context(|| format!("opening store at {}", path.display()))?;
    tracing::info!(path = %path.display(), "using local store");
    return run(store).await;
  }

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flag / env override config file, which overrides the default.
  let base_url = args
    .url
    .or_else(|| (!file_cfg.url.is_empty()).then_some(file_cfg.url))
    .unwrap_or_else(|| DEFAULT_URL.to_string());
  tracing::info!(%base_url, "using remote store");

  run(ApiClient::new(ApiConfig { base_url })?).await
}

/// Install a file subscriber when `NOTIZIA_LOG` is set.
fn init_logging() -> Result<()> {
  let Some(path) = std::env::var_os("NOTIZIA_LOG") else {
    return Ok(());
  };
  let file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(&path)
    .with_context(|| format!("opening log file {}", PathBuf::from(&path).display()))?;
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(Mutex::new(file))
    .with_ansi(false)
    .init();
  Ok(())
}

async fn run<S: RecordStore>(store: S) -> Result<()> {
  let mut app = App::new(store);

  // Load before touching the terminal so a dead server fails with a plain
  // error message.
  app.load_clients().await.context("loading clients")?;

  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop<S: RecordStore>(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<S>,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    match maybe_event {
      Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
        if !app.handle_key(key).await {
          break;
        }
      }
      // Resize and everything else: redraw on the next iteration.
      _ => {}
    }
  }

  Ok(())
}

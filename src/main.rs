mod db;
mod error;
mod export;
mod models;
mod pricing;
mod quoting;
mod run;
mod ui;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let db_path = get_db_path()?;
    init_logging(args.len() == 1, &db_path)?;

    let mut db = db::Database::open(&db_path)?;
    tracing::debug!(path = %db_path.display(), "Opened database");

    match args.len() {
        1 => run::as_tui(&mut db),
        2.. => run::as_cli(&args, &mut db),
        _ => {
            eprintln!("Usage: eventquote [command]");
            Ok(())
        }
    }
}

/// Logs go to stderr for the CLI. The TUI owns the terminal, so it logs to
/// `eventquote.log` next to the database instead.
fn init_logging(tui: bool, db_path: &Path) -> Result<()> {
    let filter = EnvFilter::try_from_env("EVENTQUOTE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    if tui {
        let log_path = db_path.with_file_name("eventquote.log");
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }
    Ok(())
}

fn get_db_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("EVENTQUOTE_DB") {
        if !path.is_empty() {
            return Ok(PathBuf::from(run::shellexpand(&path)));
        }
    }

    let proj_dirs = directories::ProjectDirs::from("com", "eventquote", "EventQuote")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("eventquote.db"))
}

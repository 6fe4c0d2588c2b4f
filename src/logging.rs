use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialize file-only logging. The terminal itself belongs to the TUI,
/// so log lines go to `keyloop.log` in the platform data dir. Filter with
/// `RUST_LOG` as usual.
pub fn init() -> Result<()> {
    let log_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("keyloop");
    fs::create_dir_all(&log_dir)?;
    let log_file = fs::File::create(log_dir.join("keyloop.log"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

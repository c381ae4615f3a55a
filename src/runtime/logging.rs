use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::{LoggingSettings, default_log_path};

/// Route `tracing` output to the log file; the terminal belongs to the UI.
///
/// `RUST_LOG` wins over `logging.level`. Returns the file in use, or `None`
/// when no log file could be opened.
pub fn init_logging(settings: &LoggingSettings) -> Option<PathBuf> {
    let path = settings.file.clone().or_else(default_log_path)?;

    if let Some(dir) = path.parent() {
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("cadenza: cannot create log directory {}: {e}", dir.display());
            return None;
        }
    }

    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("cadenza: cannot open log file {}: {e}", path.display());
            return None;
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(path)
}

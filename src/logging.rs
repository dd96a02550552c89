use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::app_dirs::AppDirs;

/// Environment variable holding the log filter, e.g. `TYPEMASTER_LOG=debug`
pub const LOG_ENV: &str = "TYPEMASTER_LOG";

/// Install a file logger when `TYPEMASTER_LOG` is set.
///
/// The terminal belongs to the UI, so nothing is ever written to stdout or
/// stderr. Returns whether a subscriber was installed.
pub fn init() -> bool {
    let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) else {
        return false;
    };
    match AppDirs::log_path() {
        Some(path) => init_file(&path, filter).is_ok(),
        None => false,
    }
}

fn init_file(path: &Path, filter: EnvFilter) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
}

// src/log.rs
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::consts::{LOG_FILE, STORE_DIR};

static INIT: OnceLock<()> = OnceLock::new();

/// Install the global subscriber: stderr for humans, `.store/debug.log` for history.
/// Safe to call more than once; only the first call wins.
pub fn init(verbose: bool) {
    INIT.get_or_init(|| {
        let default = if verbose { "promo_bot=debug" } else { "promo_bot=info" };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default));

        let stderr = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false);

        // File sink is best-effort: a read-only checkout still runs
        let file = open_log_file().map(|f| {
            fmt::layer()
                .with_writer(Mutex::new(f))
                .with_ansi(false)
        });

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(stderr)
            .with(file)
            .try_init();
    });
}

fn open_log_file() -> Option<fs::File> {
    let path = Path::new(STORE_DIR).join(LOG_FILE);
    fs::create_dir_all(STORE_DIR).ok()?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .ok()
}

/// Info-level logging
#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => {
        ::tracing::info!($($arg)*)
    };
}

/// Debug-level logging
#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

/// Warn-level logging
#[macro_export]
macro_rules! logw {
    ($($arg:tt)*) => {
        ::tracing::warn!($($arg)*)
    };
}

/// Error-level logging
#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        ::tracing::error!($($arg)*)
    };
}

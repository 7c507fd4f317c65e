//! Logger setup for the binary
//!
//! Library code logs through the `log` facade; the binary installs
//! `env_logger` filtered by `CHORDMOOD_LOG` (same syntax as `RUST_LOG`,
//! e.g. `debug` or `chordmood::audio=trace`). Without it only warnings and
//! errors are shown, so the REPL stays quiet unless asked.

use env_logger::{Builder, Env};

pub const LOG_ENV: &str = "CHORDMOOD_LOG";
pub const DEFAULT_FILTER: &str = "warn";

/// Logger builder reading its filter from `CHORDMOOD_LOG`
pub fn builder() -> Builder {
    let mut builder = Builder::from_env(Env::new().filter_or(LOG_ENV, DEFAULT_FILTER));
    builder.format_timestamp(None);
    builder
}

/// Install the logger. Later calls keep the first logger.
pub fn init() {
    if builder().try_init().is_err() {
        log::debug!("logger already installed");
    }
}

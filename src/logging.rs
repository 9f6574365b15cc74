//! Log backend setup.
//!
//! The crate logs through the `log` facade. Embedding applications may
//! install any backend; [`init_logging`] installs `env_logger`.

use crate::config::WorkbenchConfig;
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Installs `env_logger` as the global logger.
///
/// `RUST_LOG`, when set, takes precedence over `level`. Calling this more
/// than once is harmless; later calls are ignored.
pub fn init_logging(level: LevelFilter) {
    let env = Env::default().default_filter_or(level.as_str());
    if let Err(err) = Builder::from_env(env).try_init() {
        log::debug!("Logger already initialized: {}", err);
    }
}

/// Installs `env_logger` at the level configured in `config`.
pub fn init_logging_from_config(config: &WorkbenchConfig) {
    init_logging(config.level_filter());
}

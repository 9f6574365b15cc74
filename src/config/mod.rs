//! Configuration management for the workbench.
//!
//! This module provides configuration loading, validation, and access through a singleton pattern.
//! Configuration is read from a settings object under the "api-workbench" key and merged with defaults.

pub mod schema;

pub use schema::WorkbenchConfig;

use log::warn;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::sync::RwLock;

/// Key under which workbench settings live in a settings object.
pub const SETTINGS_KEY: &str = "api-workbench";

/// Global configuration instance.
///
/// This is lazily initialized on first access and can be updated when settings change.
static CONFIG: Lazy<RwLock<WorkbenchConfig>> =
    Lazy::new(|| RwLock::new(WorkbenchConfig::default()));

/// Loads configuration from a settings JSON value.
///
/// This function reads the "api-workbench" settings, merges them with defaults,
/// validates the result, and updates the global configuration.
///
/// # Arguments
///
/// * `settings_json` - Optional JSON value containing user settings under "api-workbench" key
///
/// # Returns
///
/// `Ok(WorkbenchConfig)` with the loaded configuration, or `Err` if validation fails.
///
/// # Example
///
/// ```no_run
/// use api_workbench::config::load_config;
/// use serde_json::json;
///
/// let settings = json!({
///     "api-workbench": {
///         "dataFile": "requests.json",
///         "saveRetries": 3
///     }
/// });
///
/// let config = load_config(Some(settings)).unwrap();
/// assert_eq!(config.save_retries, 3);
/// ```
pub fn load_config(settings_json: Option<Value>) -> Result<WorkbenchConfig, String> {
    let mut config = WorkbenchConfig::default();

    if let Some(settings) = settings_json {
        if let Some(workbench_settings) = settings.get(SETTINGS_KEY) {
            match serde_json::from_value::<WorkbenchConfig>(workbench_settings.clone()) {
                Ok(user_config) => {
                    config = config.merge(&user_config);
                }
                Err(e) => {
                    warn!(
                        "Failed to parse {} settings: {}. Using defaults.",
                        SETTINGS_KEY, e
                    );
                }
            }
        }
    }

    config
        .validate()
        .map_err(|e| format!("Invalid configuration: {}. Using defaults.", e))?;

    if let Ok(mut global_config) = CONFIG.write() {
        *global_config = config.clone();
    }

    Ok(config)
}

/// Gets the current global configuration.
///
/// Returns a clone of the current configuration, or the defaults if nothing
/// has been loaded yet.
pub fn get_config() -> WorkbenchConfig {
    CONFIG
        .read()
        .map(|c| c.clone())
        .unwrap_or_else(|_| WorkbenchConfig::default())
}

/// Updates the global configuration in place.
///
/// If the result fails validation the configuration reverts to defaults.
///
/// # Example
///
/// ```no_run
/// use api_workbench::config::update_config;
///
/// update_config(|config| {
///     config.executor_timeout_ms = 60000;
/// });
/// ```
pub fn update_config<F>(updater: F)
where
    F: FnOnce(&mut WorkbenchConfig),
{
    if let Ok(mut config) = CONFIG.write() {
        updater(&mut config);

        if let Err(e) = config.validate() {
            warn!("Configuration validation failed after update: {}", e);
            *config = WorkbenchConfig::default();
        }
    }
}

/// Resets the configuration to defaults.
pub fn reset_config() {
    if let Ok(mut config) = CONFIG.write() {
        *config = WorkbenchConfig::default();
    }
}

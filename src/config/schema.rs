//! Configuration schema for the workbench.
//!
//! This module defines the configuration structure and validation logic for all
//! user-configurable settings: where the document lives, how hard the store
//! retries a contended save, the executor timeout and the log level.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for the workbench.
///
/// All settings are read from a settings object under the `"api-workbench"`
/// key. Missing settings fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkbenchConfig {
    /// Path of the JSON document holding requests, environments and groups.
    ///
    /// Defaults to `saved_requests.json` in the working directory.
    #[serde(default = "default_data_file")]
    pub data_file: String,

    /// Number of remove+rename attempts on the fallback save path.
    ///
    /// Defaults to 5. Must be greater than 0.
    #[serde(default = "default_save_retries")]
    pub save_retries: u32,

    /// Base backoff between rename attempts, in milliseconds.
    ///
    /// Attempt `n` waits `n * retryBaseDelayMs` before the next one. Defaults to 50.
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    /// Pause after removing the old file before renaming, in milliseconds.
    ///
    /// Defaults to 10.
    #[serde(default = "default_removal_settle_ms")]
    pub removal_settle_ms: u64,

    /// Executor timeout in milliseconds.
    ///
    /// Maximum time to wait for a complete response. Defaults to 30000ms.
    ///
    /// Must be greater than 0.
    #[serde(default = "default_executor_timeout_ms")]
    pub executor_timeout_ms: u64,

    /// Log level used when `RUST_LOG` is not set (`error`..`trace`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            save_retries: default_save_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            removal_settle_ms: default_removal_settle_ms(),
            executor_timeout_ms: default_executor_timeout_ms(),
            log_level: default_log_level(),
        }
    }
}

impl WorkbenchConfig {
    /// Validates the configuration and returns errors if any settings are invalid.
    ///
    /// # Returns
    ///
    /// `Ok(())` if all settings are valid, or `Err` with a descriptive error message.
    pub fn validate(&self) -> Result<(), String> {
        if self.data_file.trim().is_empty() {
            return Err("dataFile must not be empty".to_string());
        }

        if self.save_retries == 0 {
            return Err("saveRetries must be greater than 0".to_string());
        }

        if self.executor_timeout_ms == 0 {
            return Err("executorTimeoutMs must be greater than 0".to_string());
        }

        if self.log_level.parse::<log::LevelFilter>().is_err() {
            return Err(format!("logLevel '{}' is not a valid level", self.log_level));
        }

        Ok(())
    }

    /// Path of the data file.
    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_file)
    }

    /// Returns the configured log level, `Info` if it does not parse.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }

    /// Merges this configuration with another, using values from `other` where present.
    ///
    /// # Arguments
    ///
    /// * `other` - Configuration to merge with (takes precedence)
    ///
    /// # Returns
    ///
    /// A new `WorkbenchConfig` with merged values.
    pub fn merge(&self, other: &WorkbenchConfig) -> Self {
        Self {
            data_file: other.data_file.clone(),
            save_retries: other.save_retries,
            retry_base_delay_ms: other.retry_base_delay_ms,
            removal_settle_ms: other.removal_settle_ms,
            executor_timeout_ms: other.executor_timeout_ms,
            log_level: other.log_level.clone(),
        }
    }
}

// Default value functions for serde

fn default_data_file() -> String {
    "saved_requests.json".to_string()
}

fn default_save_retries() -> u32 {
    5
}

fn default_retry_base_delay_ms() -> u64 {
    50
}

fn default_removal_settle_ms() -> u64 {
    10
}

fn default_executor_timeout_ms() -> u64 {
    30000 // 30 seconds in milliseconds
}

fn default_log_level() -> String {
    "info".to_string()
}

//! Request execution configuration.
//!
//! This module defines configuration options for executing requests,
//! currently the fixed timeout an executor applies to each network call.

use crate::config::{get_config, WorkbenchConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for request execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Request timeout in milliseconds.
    ///
    /// Maximum time to wait for a complete response (including connection,
    /// headers, and body download). Defaults to 30000ms.
    pub timeout_ms: u64,
}

impl ExecutionConfig {
    /// Creates a new ExecutionConfig with the given timeout.
    ///
    /// # Arguments
    ///
    /// * `timeout_ms` - Timeout duration in milliseconds
    pub fn new(timeout_ms: u64) -> Self {
        Self { timeout_ms }
    }

    /// Creates an ExecutionConfig from workbench settings.
    pub fn from_config(config: &WorkbenchConfig) -> Self {
        Self {
            timeout_ms: config.executor_timeout_ms,
        }
    }

    /// Returns the timeout as a `std::time::Duration`.
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ExecutionConfig {
    /// Creates a default ExecutionConfig using global configuration.
    fn default() -> Self {
        Self::from_config(&get_config())
    }
}

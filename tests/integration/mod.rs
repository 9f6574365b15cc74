//! Integration tests module for API Workbench
//!
//! Shared helpers for tests that drive the public store and executor API
//! against real files in a temporary directory.

pub mod request_chaining_test;
pub mod store_lifecycle_test;

use api_workbench::store::{DocumentStore, OsFileSystem, RetryPolicy};
use std::sync::Once;
use tempfile::TempDir;

static INIT: Once = Once::new();

/// Initialize test environment (run once)
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// A store over `<dir>/workbench.json` whose save retries never sleep.
pub fn store_in(dir: &TempDir) -> DocumentStore {
    init_test_env();
    DocumentStore::with_file_system(
        dir.path().join("workbench.json"),
        OsFileSystem,
        RetryPolicy::immediate(5),
    )
}

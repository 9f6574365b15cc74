//! Durable document writes.
//!
//! A save first rewrites the target in place (truncate, write, fsync). When
//! that fails, typically because another process holds the file open with
//! exclusive semantics, the document goes to `<file>.tmp` and is moved over
//! the target with a bounded remove+rename retry loop.

use super::error::{StoreError, StoreResult};
use crate::config::WorkbenchConfig;
use crate::models::Document;
use log::{debug, info, warn};
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// File operations the store needs.
///
/// The store is generic over this so tests can inject failures into
/// individual steps of the save protocol.
pub trait FileSystem: Send + Sync {
    /// Reads the whole file.
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Opens `path` truncated, writes `contents` and fsyncs.
    fn write_direct(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Writes `contents` to `path`, creating or replacing it.
    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    fn exists(&self, path: &Path) -> bool;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write_direct(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        file.write_all(contents)?;
        file.sync_all()
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Timing of the fallback remove+rename loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of rename attempts.
    pub attempts: u32,
    /// Attempt `n` is followed by a `n * base_delay` pause.
    pub base_delay: Duration,
    /// Pause after removing the old target.
    pub settle: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            base_delay: Duration::from_millis(50),
            settle: Duration::from_millis(10),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &WorkbenchConfig) -> Self {
        Self {
            attempts: config.save_retries,
            base_delay: Duration::from_millis(config.retry_base_delay_ms),
            settle: Duration::from_millis(config.removal_settle_ms),
        }
    }

    /// A policy that never sleeps.
    pub fn immediate(attempts: u32) -> Self {
        Self {
            attempts,
            base_delay: Duration::ZERO,
            settle: Duration::ZERO,
        }
    }
}

/// Returns `<path>.tmp`.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Serializes `document` as 2-space indented JSON and writes it to `path`.
///
/// # Errors
///
/// - [`StoreError::Serialization`] if the document cannot be encoded
/// - [`StoreError::TempWrite`] if the direct write failed and so did the temp file write
/// - [`StoreError::SaveRetriesExhausted`] if every rename attempt failed; the
///   temp file is removed first
pub fn save_document<F: FileSystem + ?Sized>(
    fs: &F,
    path: &Path,
    policy: &RetryPolicy,
    document: &Document,
) -> StoreResult<()> {
    let data = serde_json::to_vec_pretty(document)?;

    match fs.write_direct(path, &data) {
        Ok(()) => {
            info!(
                "Saved {} requests to {}",
                document.requests.len(),
                path.display()
            );
            return Ok(());
        }
        Err(e) => {
            debug!(
                "Direct write to {} failed ({}), falling back to temp file",
                path.display(),
                e
            );
        }
    }

    let tmp = temp_path(path);
    fs.write_file(&tmp, &data)
        .map_err(|source| StoreError::TempWrite {
            path: tmp.clone(),
            source,
        })?;

    let mut last_error = None;
    for attempt in 1..=policy.attempts {
        if fs.exists(path) {
            if let Err(e) = fs.remove_file(path) {
                debug!("Could not remove {}: {}", path.display(), e);
            }
            sleep(policy.settle);
        }

        match fs.rename(&tmp, path) {
            Ok(()) => {
                info!(
                    "Saved {} requests to {} (attempt {})",
                    document.requests.len(),
                    path.display(),
                    attempt
                );
                return Ok(());
            }
            Err(e) => {
                warn!("Rename attempt {} failed: {}", attempt, e);
                last_error = Some(e);
                if attempt < policy.attempts {
                    sleep(policy.base_delay * attempt);
                }
            }
        }
    }

    if let Err(e) = fs.remove_file(&tmp) {
        debug!("Could not remove temp file {}: {}", tmp.display(), e);
    }

    Err(StoreError::SaveRetriesExhausted {
        attempts: policy.attempts,
        source: last_error
            .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "no save attempts were made")),
    })
}

fn sleep(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}

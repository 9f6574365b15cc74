//! Persistent document store.
//!
//! The [`DocumentStore`] owns the JSON data file. Every logical operation
//! reloads the whole document from disk, so there is no in-memory cache to
//! go stale. One read/write lock per store serializes access:
//!
//! - [`DocumentStore::load`] takes the lock in read mode. If the document
//!   had to be synthesized or repaired it switches to write mode, re-reads
//!   the file and persists the result under that same write lock, so ids
//!   handed out by a load stay valid.
//! - Every mutating operation holds the write lock for its whole
//!   load, mutate, save cycle.
//!
//! Operations are split by entity across submodules (`requests`,
//! `environments`, `groups`, `settings`); they all go through
//! [`DocumentStore::mutate`].

pub mod error;
pub mod ids;
pub(crate) mod migrations;
pub mod writer;

mod environments;
mod groups;
mod requests;
mod settings;

pub use error::{ErrorKind, StoreError, StoreResult};
pub use ids::{generate_id, now_timestamp, unique_name};
pub use writer::{FileSystem, OsFileSystem, RetryPolicy};

use crate::config::WorkbenchConfig;
use crate::models::{Document, ProxyResponse};
use crate::variables::ResponseSource;
use log::{debug, warn};
use migrations::migrate;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// The single authority over the persisted [`Document`].
///
/// Generic over [`FileSystem`] so tests can inject I/O failures; production
/// code uses the [`OsFileSystem`] default.
#[derive(Debug)]
pub struct DocumentStore<F: FileSystem = OsFileSystem> {
    path: PathBuf,
    fs: F,
    retry: RetryPolicy,
    lock: RwLock<()>,
}

impl DocumentStore<OsFileSystem> {
    /// Creates a store for `path` with the default retry policy.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_file_system(path, OsFileSystem, RetryPolicy::default())
    }

    /// Creates a store from the data file and retry settings in `config`.
    pub fn from_config(config: &WorkbenchConfig) -> Self {
        Self::with_file_system(
            config.data_path(),
            OsFileSystem,
            RetryPolicy::from_config(config),
        )
    }
}

impl<F: FileSystem> DocumentStore<F> {
    /// Creates a store backed by a custom [`FileSystem`].
    pub fn with_file_system(path: impl Into<PathBuf>, fs: F, retry: RetryPolicy) -> Self {
        Self {
            path: path.into(),
            fs,
            retry,
            lock: RwLock::new(()),
        }
    }

    /// Path of the backing data file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and migrates the document.
    ///
    /// A missing, empty or unparsable file yields a fresh document with one
    /// "Default" environment; corruption is logged, never returned. A fresh
    /// document, or one that migration repaired (generated environment or
    /// group, reassigned references, renamed duplicates), is saved before it
    /// is returned. A failure of that corrective save is logged and the
    /// document is still returned.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] if the file exists but cannot be read.
    pub fn load(&self) -> StoreResult<Document> {
        {
            let _guard = self.read_guard();
            let (document, needs_save) = self.read_document()?;
            if !needs_save {
                return Ok(document);
            }
        }

        let _guard = self.write_guard();
        let (document, needs_save) = self.read_document()?;
        if needs_save {
            debug!("Saving repaired document to {}", self.path.display());
            if let Err(e) = self.write_document(&document) {
                warn!("Failed to save repaired document: {}", e);
            }
        }
        Ok(document)
    }

    /// Persists `document`, replacing the data file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SaveRetriesExhausted`] when the file stayed
    /// locked through every retry, or another persistence error.
    pub fn save(&self, document: &Document) -> StoreResult<()> {
        let _guard = self.write_guard();
        self.write_document(document)
    }

    /// Runs one load, mutate, save cycle under the write lock.
    ///
    /// Nothing is written when `operation` fails.
    pub(crate) fn mutate<T, Op>(&self, operation: Op) -> StoreResult<T>
    where
        Op: FnOnce(&mut Document) -> StoreResult<T>,
    {
        let _guard = self.write_guard();
        let (mut document, _) = self.read_document()?;
        let result = operation(&mut document)?;
        self.write_document(&document)?;
        Ok(result)
    }

    /// Reads and migrates the file without taking the lock.
    ///
    /// The flag reports whether the result differs from what is on disk in a
    /// way that must be saved.
    fn read_document(&self) -> StoreResult<(Document, bool)> {
        if !self.fs.exists(&self.path) {
            return Ok((fresh_document(), true));
        }

        let bytes = match self.fs.read_file(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok((fresh_document(), true)),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if bytes.is_empty() {
            return Ok((fresh_document(), true));
        }

        match serde_json::from_slice::<Document>(&bytes) {
            Ok(mut document) => {
                let needs_save = migrate(&mut document);
                Ok((document, needs_save))
            }
            Err(e) => {
                warn!(
                    "JSON parse error in {}: {}. Starting from a new document",
                    self.path.display(),
                    e
                );
                Ok((fresh_document(), true))
            }
        }
    }

    fn write_document(&self, document: &Document) -> StoreResult<()> {
        writer::save_document(&self.fs, &self.path, &self.retry, document)
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, ()> {
        self.lock.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, ()> {
        self.lock.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Looks up responses by loading the current document.
///
/// Load failures are logged and treated as a miss.
impl<F: FileSystem> ResponseSource for DocumentStore<F> {
    fn last_response(&self, request_name: &str) -> Option<ProxyResponse> {
        match self.load() {
            Ok(document) => document.last_response(request_name),
            Err(e) => {
                warn!("Could not load document to resolve '{}': {}", request_name, e);
                None
            }
        }
    }
}

fn fresh_document() -> Document {
    let mut document = Document::new_default();
    migrate(&mut document);
    document
}

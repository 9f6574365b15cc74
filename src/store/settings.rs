//! UI settings stored alongside the data.

use super::error::StoreResult;
use super::writer::FileSystem;
use super::DocumentStore;
use log::info;

impl<F: FileSystem> DocumentStore<F> {
    /// Persists the response viewer's word-wrap flag.
    pub fn set_word_wrap(&self, enabled: bool) -> StoreResult<()> {
        self.mutate(|doc| {
            doc.word_wrap = enabled;
            Ok(())
        })?;
        info!("Word wrap set to {}", enabled);
        Ok(())
    }
}

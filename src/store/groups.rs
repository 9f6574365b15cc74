//! Group operations.

use super::error::{StoreError, StoreResult};
use super::writer::FileSystem;
use super::DocumentStore;
use crate::models::document::new_group;
use crate::models::Group;
use log::info;

impl<F: FileSystem> DocumentStore<F> {
    /// Returns every group; the `"default"` group is always present.
    pub fn list_groups(&self) -> StoreResult<Vec<Group>> {
        Ok(self.load()?.groups)
    }

    /// Creates a group named `name`.
    pub fn create_group(&self, name: &str) -> StoreResult<Group> {
        if name.is_empty() {
            return Err(StoreError::validation("Group name is required"));
        }

        let group = self.mutate(|doc| {
            if doc.has_group_named(name) {
                return Err(StoreError::conflict("Group already exists"));
            }
            let group = new_group(name);
            doc.groups.push(group.clone());
            Ok(group)
        })?;

        info!("Created group '{}' ({})", group.name, group.id);
        Ok(group)
    }

    /// Deletes group `id`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if no group has this id
    /// - [`StoreError::Conflict`] for the `"default"` group or a group any request is filed under
    pub fn delete_group(&self, id: &str) -> StoreResult<()> {
        if id.is_empty() {
            return Err(StoreError::validation("Group ID is required"));
        }

        let name = self.mutate(|doc| {
            let group = doc
                .group(id)
                .ok_or_else(|| StoreError::not_found("Group not found"))?;
            if group.is_default() {
                return Err(StoreError::conflict("Cannot delete default group"));
            }
            if doc.group_in_use(&group.name) {
                return Err(StoreError::conflict("Cannot delete group with requests"));
            }

            let name = group.name.clone();
            doc.groups.retain(|g| g.id != id);
            Ok(name)
        })?;

        info!("Deleted group '{}' ({})", name, id);
        Ok(())
    }
}

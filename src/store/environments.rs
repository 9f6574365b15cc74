//! Environment and variable operations.

use super::error::{StoreError, StoreResult};
use super::ids::now_timestamp;
use super::writer::FileSystem;
use super::DocumentStore;
use crate::models::document::new_environment;
use crate::models::{Environment, ResolvedVariable, Variable};
use crate::variables::resolve_variable_value;
use log::info;

impl<F: FileSystem> DocumentStore<F> {
    /// Returns the current environment.
    pub fn current_environment(&self) -> StoreResult<Environment> {
        self.load()?
            .current_environment()
            .cloned()
            .ok_or_else(|| StoreError::not_found("Current environment not found"))
    }

    /// Returns every environment and the id of the current one.
    pub fn list_environments(&self) -> StoreResult<(Vec<Environment>, String)> {
        let doc = self.load()?;
        Ok((doc.environments, doc.current_environment))
    }

    /// Returns the current environment's variables with their effective values.
    pub fn variables_with_resolved(&self) -> StoreResult<Vec<ResolvedVariable>> {
        let environment = self.current_environment()?;
        Ok(environment
            .variables
            .into_iter()
            .map(|v| ResolvedVariable {
                resolved_value: resolve_variable_value(&v.value),
                is_env_var: v.is_env_reference(),
                key: v.key,
                value: v.value,
            })
            .collect())
    }

    /// Replaces the current environment's variables.
    pub fn save_variables(&self, variables: Vec<Variable>) -> StoreResult<()> {
        let count = variables.len();
        self.mutate(|doc| {
            let current = doc.current_environment.clone();
            let environment = doc
                .environment_mut(&current)
                .ok_or_else(|| StoreError::not_found("Current environment not found"))?;
            environment.variables = variables;
            environment.updated_at = now_timestamp();
            Ok(())
        })?;

        info!("Saved {} variables", count);
        Ok(())
    }

    /// Creates an empty environment named `name`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] if `name` is empty
    /// - [`StoreError::Conflict`] if an environment already has this name
    pub fn create_environment(&self, name: &str) -> StoreResult<Environment> {
        if name.is_empty() {
            return Err(StoreError::validation("Environment name is required"));
        }

        let environment = self.mutate(|doc| {
            if doc.environments.iter().any(|e| e.name == name) {
                return Err(StoreError::conflict("Environment name already exists"));
            }
            let environment = new_environment(name, Vec::new());
            doc.environments.push(environment.clone());
            Ok(environment)
        })?;

        info!("Created environment '{}' ({})", environment.name, environment.id);
        Ok(environment)
    }

    /// Renames environment `id` and/or replaces its variables.
    ///
    /// `None` (or an empty name) leaves that field untouched.
    pub fn update_environment(
        &self,
        id: &str,
        name: Option<&str>,
        variables: Option<Vec<Variable>>,
    ) -> StoreResult<Environment> {
        if id.is_empty() {
            return Err(StoreError::validation("Environment ID is required"));
        }
        let name = name.filter(|n| !n.is_empty());

        let environment = self.mutate(|doc| {
            if doc.environment(id).is_none() {
                return Err(StoreError::not_found("Environment not found"));
            }
            if let Some(name) = name {
                if doc.environments.iter().any(|e| e.id != id && e.name == name) {
                    return Err(StoreError::conflict("Environment name already exists"));
                }
            }

            let environment = doc
                .environment_mut(id)
                .ok_or_else(|| StoreError::not_found("Environment not found"))?;
            if let Some(name) = name {
                environment.name = name.to_string();
            }
            if let Some(variables) = variables {
                environment.variables = variables;
            }
            environment.updated_at = now_timestamp();
            Ok(environment.clone())
        })?;

        info!("Updated environment {}", id);
        Ok(environment)
    }

    /// Deletes environment `id`.
    ///
    /// Deleting the current environment makes the first remaining one current.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Conflict`] if it is the only environment
    /// - [`StoreError::NotFound`] if no environment has this id
    pub fn delete_environment(&self, id: &str) -> StoreResult<()> {
        if id.is_empty() {
            return Err(StoreError::validation("Environment ID is required"));
        }

        self.mutate(|doc| {
            if doc.environments.len() <= 1 {
                return Err(StoreError::conflict("Cannot delete the last environment"));
            }

            let before = doc.environments.len();
            doc.environments.retain(|e| e.id != id);
            if doc.environments.len() == before {
                return Err(StoreError::not_found("Environment not found"));
            }

            if doc.current_environment == id {
                if let Some(first) = doc.environments.first() {
                    doc.current_environment = first.id.clone();
                }
            }
            Ok(())
        })?;

        info!("Deleted environment {}", id);
        Ok(())
    }

    /// Replaces the variables of `target_id` with a copy of `source_id`'s.
    pub fn copy_environment(&self, target_id: &str, source_id: &str) -> StoreResult<Environment> {
        if target_id.is_empty() {
            return Err(StoreError::validation("Target environment ID is required"));
        }
        if source_id.is_empty() {
            return Err(StoreError::validation("Source environment ID is required"));
        }

        let environment = self.mutate(|doc| {
            let variables = doc
                .environment(source_id)
                .map(|e| e.variables.clone())
                .ok_or_else(|| StoreError::not_found("Source environment not found"))?;

            let target = doc
                .environment_mut(target_id)
                .ok_or_else(|| StoreError::not_found("Target environment not found"))?;
            target.variables = variables;
            target.updated_at = now_timestamp();
            Ok(target.clone())
        })?;

        info!("Copied variables from {} to {}", source_id, target_id);
        Ok(environment)
    }

    /// Makes environment `id` current.
    pub fn activate_environment(&self, id: &str) -> StoreResult<()> {
        if id.is_empty() {
            return Err(StoreError::validation("Environment ID is required"));
        }

        self.mutate(|doc| {
            if doc.environment(id).is_none() {
                return Err(StoreError::not_found("Environment not found"));
            }
            doc.current_environment = id.to_string();
            Ok(())
        })?;

        info!("Activated environment {}", id);
        Ok(())
    }
}

//! Saved request operations.

use super::error::{StoreError, StoreResult};
use super::ids::{generate_id, now_timestamp, unique_name};
use super::writer::FileSystem;
use super::DocumentStore;
use crate::models::{ProxyResponse, RequestDraft, SavedRequest, DEFAULT_GROUP_NAME, DEFAULT_METHOD};
use log::info;

impl<F: FileSystem> DocumentStore<F> {
    /// Returns every saved request in stored order.
    pub fn list_requests(&self) -> StoreResult<Vec<SavedRequest>> {
        Ok(self.load()?.requests)
    }

    /// Looks up a saved request by id.
    pub fn get_request(&self, id: &str) -> StoreResult<SavedRequest> {
        self.load()?
            .request(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Request not found"))
    }

    /// Looks up a saved request by exact, case-sensitive name.
    pub fn find_request_by_name(&self, name: &str) -> StoreResult<Option<SavedRequest>> {
        Ok(self.load()?.request_by_name(name).cloned())
    }

    /// Saves a new request.
    ///
    /// The method defaults to `GET` and the group to `"default"`. A text body
    /// holding valid JSON is stored decoded.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] if the name or URL is empty
    /// - [`StoreError::Conflict`] if another request already uses the name
    pub fn create_request(&self, draft: RequestDraft) -> StoreResult<SavedRequest> {
        let draft = validate_draft(draft)?;

        let created = self.mutate(|doc| {
            if doc.request_name_taken(&draft.name, None) {
                return Err(name_conflict(&draft.name));
            }

            let now = now_timestamp();
            let mut request = SavedRequest {
                id: generate_id(),
                created_at: now.clone(),
                updated_at: now,
                ..Default::default()
            };
            request.apply_draft(draft);
            doc.requests.push(request.clone());
            Ok(request)
        })?;

        info!("Created request '{}' ({})", created.name, created.id);
        Ok(created)
    }

    /// Replaces every user-editable field of request `id`.
    ///
    /// `lastResponse` is kept unless the draft carries one. `id` and
    /// `createdAt` never change.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] if the id, name or URL is empty
    /// - [`StoreError::Conflict`] if a different request already uses the name
    /// - [`StoreError::NotFound`] if no request has this id
    pub fn update_request(&self, id: &str, draft: RequestDraft) -> StoreResult<SavedRequest> {
        if id.is_empty() {
            return Err(StoreError::validation("Request ID is required"));
        }
        let draft = validate_draft(draft)?;

        let updated = self.mutate(|doc| {
            if doc.request_name_taken(&draft.name, Some(id)) {
                return Err(name_conflict(&draft.name));
            }

            let request = doc
                .request_mut(id)
                .ok_or_else(|| StoreError::not_found("Request not found"))?;
            request.apply_draft(draft);
            request.updated_at = now_timestamp();
            Ok(request.clone())
        })?;

        info!("Updated request '{}' ({})", updated.name, updated.id);
        Ok(updated)
    }

    /// Removes request `id`.
    pub fn delete_request(&self, id: &str) -> StoreResult<()> {
        if id.is_empty() {
            return Err(StoreError::validation("Request ID is required"));
        }

        self.mutate(|doc| {
            let before = doc.requests.len();
            doc.requests.retain(|r| r.id != id);
            if doc.requests.len() == before {
                return Err(StoreError::not_found("Request not found"));
            }
            Ok(())
        })?;

        info!("Deleted request {}", id);
        Ok(())
    }

    /// Copies request `id` under a fresh id and a unique `"<name> (Copy)"` name.
    ///
    /// The copy has no `lastResponse`.
    pub fn duplicate_request(&self, id: &str) -> StoreResult<SavedRequest> {
        if id.is_empty() {
            return Err(StoreError::validation("Request ID is required"));
        }

        let copy = self.mutate(|doc| {
            let original = doc
                .request(id)
                .ok_or_else(|| StoreError::not_found("Request not found"))?;

            let name = unique_name(&format!("{} (Copy)", original.name), &doc.request_names());
            let now = now_timestamp();
            let copy = SavedRequest {
                id: generate_id(),
                name,
                last_response: None,
                created_at: now.clone(),
                updated_at: now,
                ..original.clone()
            };
            doc.requests.push(copy.clone());
            Ok(copy)
        })?;

        info!("Duplicated request {} as '{}' ({})", id, copy.name, copy.id);
        Ok(copy)
    }

    /// Stores `response` as the `lastResponse` of request `id`.
    ///
    /// This is what later `{{"Name".path}}` references read.
    pub fn record_response(&self, id: &str, response: ProxyResponse) -> StoreResult<()> {
        self.mutate(|doc| {
            let request = doc
                .request_mut(id)
                .ok_or_else(|| StoreError::not_found("Request not found"))?;
            request.last_response = Some(response.normalized());
            request.updated_at = now_timestamp();
            Ok(())
        })?;

        info!("Recorded response for request {}", id);
        Ok(())
    }
}

fn validate_draft(mut draft: RequestDraft) -> StoreResult<RequestDraft> {
    if draft.name.is_empty() {
        return Err(StoreError::validation("Request name is required"));
    }
    if draft.url.is_empty() {
        return Err(StoreError::validation("URL is required"));
    }
    if draft.method.is_empty() {
        draft.method = DEFAULT_METHOD.to_string();
    }
    if draft.group.is_empty() {
        draft.group = DEFAULT_GROUP_NAME.to_string();
    }
    Ok(draft)
}

fn name_conflict(name: &str) -> StoreError {
    StoreError::conflict(format!(
        "Request name '{}' already exists. Please choose a different name.",
        name
    ))
}

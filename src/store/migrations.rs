//! Load-time repairs applied to every parsed document.
//!
//! Steps run in a fixed order; later steps rely on earlier ones (the default
//! group must exist before requests are filed under it).

use crate::models::document::{new_environment, new_group};
use crate::models::{Body, Document, DEFAULT_ENVIRONMENT_NAME, DEFAULT_GROUP_NAME};
use log::info;
use std::collections::HashSet;

/// Applies every migration to `doc`.
///
/// Returns `true` when the document changed in a way that must be persisted
/// before it is handed out: ids were generated, references repaired or
/// request names deduplicated. Decoding string bodies alone is
/// deterministic and does not count.
pub(crate) fn migrate(doc: &mut Document) -> bool {
    let mut changed = migrate_legacy_variables(doc);
    changed |= ensure_environment(doc);
    changed |= ensure_current_environment(doc);
    changed |= ensure_default_group(doc);
    changed |= assign_default_group(doc);
    decode_string_bodies(doc);
    changed |= deduplicate_request_names(doc);
    changed
}

fn migrate_legacy_variables(doc: &mut Document) -> bool {
    if doc.variables.is_empty() || !doc.environments.is_empty() {
        return false;
    }

    let environment = new_environment(DEFAULT_ENVIRONMENT_NAME, doc.variables.clone());
    doc.current_environment = environment.id.clone();
    doc.environments.push(environment);
    info!(
        "Migrated {} variables to {} environment",
        doc.variables.len(),
        DEFAULT_ENVIRONMENT_NAME
    );
    true
}

fn ensure_environment(doc: &mut Document) -> bool {
    if !doc.environments.is_empty() {
        return false;
    }
    let environment = new_environment(DEFAULT_ENVIRONMENT_NAME, Vec::new());
    doc.current_environment = environment.id.clone();
    doc.environments.push(environment);
    true
}

/// Points `currentEnvironment` at the first environment when it is unset or dangling.
fn ensure_current_environment(doc: &mut Document) -> bool {
    if doc.current_environment().is_some() {
        return false;
    }
    match doc.environments.first() {
        Some(first) => {
            doc.current_environment = first.id.clone();
            true
        }
        None => false,
    }
}

fn ensure_default_group(doc: &mut Document) -> bool {
    if doc.has_default_group() {
        return false;
    }
    doc.groups.push(new_group(DEFAULT_GROUP_NAME));
    info!("Created '{}' group", DEFAULT_GROUP_NAME);
    true
}

fn assign_default_group(doc: &mut Document) -> bool {
    let mut migrated = 0;
    for request in doc.requests.iter_mut().filter(|r| r.group.is_empty()) {
        request.group = DEFAULT_GROUP_NAME.to_string();
        migrated += 1;
    }
    if migrated > 0 {
        info!("Migrated {} requests to '{}' group", migrated, DEFAULT_GROUP_NAME);
    }
    migrated > 0
}

fn decode_string_bodies(doc: &mut Document) {
    let mut request_bodies = 0;
    let mut response_bodies = 0;

    for request in &mut doc.requests {
        if decode_in_place(&mut request.body) {
            request_bodies += 1;
        }
        if let Some(response) = request.last_response.as_mut() {
            if decode_in_place(&mut response.body) {
                response_bodies += 1;
            }
        }
    }

    if request_bodies > 0 || response_bodies > 0 {
        info!(
            "Migrated {} request bodies and {} response bodies from strings to JSON",
            request_bodies, response_bodies
        );
    }
}

/// Replaces a text body that holds structured JSON with the decoded value.
///
/// JSON string literals are left as they are.
fn decode_in_place(body: &mut Body) -> bool {
    if !body.is_undecoded_json() {
        return false;
    }
    *body = Body::from_text(&body.to_text());
    true
}

/// Keeps the first request with each name and suffixes later ones ` (2)`, ` (3)`, ...
fn deduplicate_request_names(doc: &mut Document) -> bool {
    let mut seen: HashSet<String> = HashSet::with_capacity(doc.requests.len());
    let mut changed = false;

    for request in &mut doc.requests {
        let original = request.name.clone();
        let mut candidate = original.clone();
        let mut counter = 1u64;

        while seen.contains(&candidate) {
            counter += 1;
            candidate = format!("{} ({})", original, counter);
        }

        if candidate != original {
            info!("Renamed duplicate request '{}' to '{}'", original, candidate);
            request.name = candidate.clone();
            changed = true;
        }
        seen.insert(candidate);
    }

    changed
}

//! Store lifecycle integration tests
//!
//! These tests drive requests, environments, groups and settings through
//! the public store API and check what ends up on disk.

use super::store_in;
use api_workbench::models::{Body, RequestDraft, Variable, DEFAULT_GROUP_NAME};
use api_workbench::store::ErrorKind;
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

fn read_raw(dir: &TempDir) -> Value {
    let text = fs::read_to_string(dir.path().join("workbench.json")).expect("data file");
    serde_json::from_str(&text).expect("valid JSON")
}

#[test]
fn test_request_crud_workflow() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let created = store
        .create_request(
            RequestDraft::new("List Users", "", "https://api.example.com/users")
                .with_header("Accept", "application/json"),
        )
        .unwrap();
    assert_eq!(created.method, "GET");
    assert_eq!(created.group, DEFAULT_GROUP_NAME);
    assert!(!created.id.is_empty());
    assert_eq!(created.created_at, created.updated_at);

    let mut draft = RequestDraft::new("List Active Users", "GET", "https://api.example.com/users?active=1");
    draft.description = "Only active accounts".to_string();
    let updated = store.update_request(&created.id, draft).unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.description, "Only active accounts");

    let copy = store.duplicate_request(&created.id).unwrap();
    assert_eq!(copy.name, "List Active Users (Copy)");
    assert_ne!(copy.id, created.id);
    let second_copy = store.duplicate_request(&created.id).unwrap();
    assert_eq!(second_copy.name, "List Active Users (Copy) (2)");

    assert_eq!(store.list_requests().unwrap().len(), 3);
    assert_eq!(
        store
            .find_request_by_name("List Active Users (Copy)")
            .unwrap()
            .map(|r| r.id),
        Some(copy.id.clone())
    );

    store.delete_request(&copy.id).unwrap();
    let err = store.get_request(&copy.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(store.list_requests().unwrap().len(), 2);
}

#[test]
fn test_validation_and_conflicts_leave_file_untouched() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store
        .create_request(RequestDraft::new("Login", "POST", "https://api.example.com/login"))
        .unwrap();
    let before = read_raw(&dir);

    let err = store
        .create_request(RequestDraft::new("", "GET", "https://x"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.to_string(), "Request name is required");

    let err = store.create_request(RequestDraft::new("X", "GET", "")).unwrap_err();
    assert_eq!(err.to_string(), "URL is required");

    let err = store
        .create_request(RequestDraft::new("Login", "GET", "https://x"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(
        err.to_string(),
        "Request name 'Login' already exists. Please choose a different name."
    );

    assert_eq!(read_raw(&dir), before);
}

#[test]
fn test_names_are_case_sensitive() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.create_request(RequestDraft::new("login", "GET", "https://x")).unwrap();
    store.create_request(RequestDraft::new("Login", "GET", "https://x")).unwrap();
    assert_eq!(store.list_requests().unwrap().len(), 2);
}

#[test]
fn test_json_text_body_is_stored_decoded() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let created = store
        .create_request(
            RequestDraft::new("Create", "POST", "https://x/items").with_body(r#"{"name":"widget","qty":2}"#),
        )
        .unwrap();
    assert_eq!(created.body, Body::Json(json!({"name": "widget", "qty": 2})));

    let raw = read_raw(&dir);
    assert_eq!(raw["requests"][0]["body"], json!({"name": "widget", "qty": 2}));
}

#[test]
fn test_environment_workflow() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let (environments, current) = store.list_environments().unwrap();
    assert_eq!(environments.len(), 1);
    assert_eq!(environments[0].name, "Default");
    assert_eq!(current, environments[0].id);
    let default_id = current;

    store
        .save_variables(vec![Variable::new("host", "localhost:8080")])
        .unwrap();

    let staging = store.create_environment("Staging").unwrap();
    assert!(staging.variables.is_empty());
    let err = store.create_environment("Staging").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let copied = store.copy_environment(&staging.id, &default_id).unwrap();
    assert_eq!(copied.get("host"), Some("localhost:8080"));

    store
        .update_environment(
            &staging.id,
            Some("Stage"),
            Some(vec![Variable::new("host", "stage.example.com")]),
        )
        .unwrap();
    store.activate_environment(&staging.id).unwrap();

    let current = store.current_environment().unwrap();
    assert_eq!(current.name, "Stage");
    assert_eq!(current.get("host"), Some("stage.example.com"));

    // Copy stays independent of later edits to the source.
    let default = store
        .list_environments()
        .unwrap()
        .0
        .into_iter()
        .find(|e| e.id == default_id)
        .unwrap();
    assert_eq!(default.get("host"), Some("localhost:8080"));

    store.delete_environment(&staging.id).unwrap();
    assert_eq!(store.current_environment().unwrap().id, default_id);

    let err = store.delete_environment(&default_id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.to_string(), "Cannot delete the last environment");
}

#[test]
fn test_group_workflow() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let groups = store.list_groups().unwrap();
    assert_eq!(groups.len(), 1);
    let default = groups[0].clone();
    assert!(default.is_default());

    let auth = store.create_group("auth").unwrap();
    let login = store
        .create_request(RequestDraft::new("Login", "POST", "https://x/login").with_group("auth"))
        .unwrap();

    let err = store.delete_group(&auth.id).unwrap_err();
    assert_eq!(err.to_string(), "Cannot delete group with requests");

    let err = store.delete_group(&default.id).unwrap_err();
    assert_eq!(err.to_string(), "Cannot delete default group");

    store.delete_request(&login.id).unwrap();
    store.delete_group(&auth.id).unwrap();
    assert_eq!(store.list_groups().unwrap().len(), 1);
}

#[test]
fn test_word_wrap_persists_across_stores() {
    let dir = TempDir::new().unwrap();
    store_in(&dir).set_word_wrap(true).unwrap();

    assert!(store_in(&dir).load().unwrap().word_wrap);
    assert_eq!(read_raw(&dir)["wordWrap"], json!(true));
}

#[test]
fn test_legacy_document_is_migrated_on_load() {
    let dir = TempDir::new().unwrap();
    let legacy = json!({
        "requests": [
            {"id": "a", "name": "Ping", "url": "https://x/ping", "method": "GET",
             "body": "{\"k\":1}"},
            {"id": "b", "name": "Ping", "url": "https://x/ping2", "method": "GET"}
        ],
        "variables": [{"key": "host", "value": "legacy.local"}],
        "environments": null,
        "groups": null
    });
    fs::write(dir.path().join("workbench.json"), legacy.to_string()).unwrap();

    let store = store_in(&dir);
    let document = store.load().unwrap();

    assert_eq!(document.environments.len(), 1);
    assert_eq!(document.environments[0].name, "Default");
    assert_eq!(document.current_environment, document.environments[0].id);
    assert_eq!(document.environments[0].get("host"), Some("legacy.local"));
    assert!(document.has_default_group());
    assert!(document.requests.iter().all(|r| r.group == DEFAULT_GROUP_NAME));
    assert_eq!(document.requests[0].body, Body::Json(json!({"k": 1})));

    assert_eq!(document.requests[0].name, "Ping");
    assert_eq!(document.requests[1].name, "Ping (2)");

    // Name repair is persisted immediately.
    let raw = read_raw(&dir);
    assert_eq!(raw["requests"][1]["name"], json!("Ping (2)"));
}

#[test]
fn test_corrupt_file_loads_fresh_document() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("workbench.json"), "{ not json").unwrap();

    let document = store_in(&dir).load().unwrap();
    assert!(document.requests.is_empty());
    assert_eq!(document.environments.len(), 1);
}

#[test]
fn test_saved_file_is_indented_json() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.create_request(RequestDraft::new("A", "GET", "https://x")).unwrap();

    let text = fs::read_to_string(dir.path().join("workbench.json")).unwrap();
    assert!(text.starts_with("{\n  \""));
    assert!(!dir.path().join("workbench.json.tmp").exists());
}

#[test]
fn test_listed_ids_stay_valid_after_legacy_load() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("workbench.json"),
        r#"{"variables":[{"key":"host","value":"h"}]}"#,
    )
    .unwrap();
    let store = store_in(&dir);

    let (_, first_current) = store.list_environments().unwrap();
    let (_, second_current) = store.list_environments().unwrap();
    assert_eq!(first_current, second_current);

    store.activate_environment(&first_current).unwrap();

    let default_group = store.list_groups().unwrap().remove(0);
    let err = store.delete_group(&default_group.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn test_fresh_store_ids_stay_valid() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let environment = store.current_environment().unwrap();
    store.create_environment("Other").unwrap();
    assert_eq!(store.current_environment().unwrap().id, environment.id);
}

#[test]
fn test_null_scalar_fields_do_not_discard_document() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("workbench.json"),
        r#"{"requests":[{"id":"1","name":"Keep","url":"https://x","method":null,"group":null,"description":null}]}"#,
    )
    .unwrap();
    let store = store_in(&dir);

    let requests = store.list_requests().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].name, "Keep");
    assert_eq!(requests[0].group, DEFAULT_GROUP_NAME);

    store.create_group("g").unwrap();
    let raw = fs::read_to_string(dir.path().join("workbench.json")).unwrap();
    assert!(raw.contains("\"Keep\""));
}

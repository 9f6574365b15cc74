//! Request chaining and persistence integration tests
//!
//! These tests send saved requests through stub executors and verify that
//! recorded responses feed later templates, that environment indirection
//! reaches the outgoing request, and that saves survive a locked data file.

use super::store_in;
use api_workbench::executor::{send_request, send_saved_request, Executor};
use api_workbench::models::{Body, ProxyRequest, ProxyResponse, RequestDraft, Variable};
use api_workbench::store::{DocumentStore, ErrorKind, FileSystem, OsFileSystem, RetryPolicy, StoreError};
use serde_json::json;
use serial_test::serial;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use tempfile::TempDir;

/// Captures every outgoing request and replies with a fixed response.
struct Capture {
    reply: ProxyResponse,
    sent: Mutex<Vec<ProxyRequest>>,
}

impl Capture {
    fn replying(reply: ProxyResponse) -> Self {
        Self {
            reply,
            sent: Mutex::new(Vec::new()),
        }
    }

    fn last(&self) -> ProxyRequest {
        self.sent.lock().unwrap().last().cloned().expect("a request was sent")
    }
}

impl Executor for Capture {
    fn execute(&self, request: &ProxyRequest) -> ProxyResponse {
        self.sent.lock().unwrap().push(request.clone());
        self.reply.clone()
    }
}

fn login_reply() -> ProxyResponse {
    let mut response = ProxyResponse::new(200, "200 OK").with_body(
        r#"{"token":"abc-123","user":{"id":7,"roles":["admin"]},"items":[{"sku":"A1"},{"sku":"B2"}]}"#,
    );
    response.add_header("Content-Type".to_string(), "application/json".to_string());
    response
}

#[test]
fn test_token_flows_into_next_request() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let login = store
        .create_request(RequestDraft::new("Login", "POST", "https://api.example.com/login"))
        .unwrap();
    let profile = store
        .create_request(
            RequestDraft::new("Profile", "GET", "https://api.example.com/users/{{\"Login\".user.id}}")
                .with_header("Authorization", "Bearer {{\"Login\".token}}"),
        )
        .unwrap();

    let recorded = send_saved_request(&store, &|_: &ProxyRequest| login_reply(), &login.id).unwrap();
    assert_eq!(recorded.body, Body::Json(json!({
        "token": "abc-123",
        "user": {"id": 7, "roles": ["admin"]},
        "items": [{"sku": "A1"}, {"sku": "B2"}]
    })));

    let executor = Capture::replying(ProxyResponse::new(200, "200 OK"));
    send_saved_request(&store, &executor, &profile.id).unwrap();

    let sent = executor.last();
    assert_eq!(sent.url, "https://api.example.com/users/7");
    assert_eq!(
        sent.headers.get("Authorization").map(String::as_str),
        Some("Bearer abc-123")
    );

    // The template itself is never rewritten.
    let stored = store.get_request(&profile.id).unwrap();
    assert_eq!(stored.url, "https://api.example.com/users/{{\"Login\".user.id}}");
}

#[test]
fn test_full_response_and_missing_field_references() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let login = store
        .create_request(RequestDraft::new("Login", "POST", "https://x/login"))
        .unwrap();
    send_saved_request(&store, &|_: &ProxyRequest| login_reply(), &login.id).unwrap();

    let executor = Capture::replying(ProxyResponse::new(200, "200 OK"));
    let mut request = ProxyRequest::new("POST", "https://x/users/{{\"Login\".user.id}}?extra={{\"Login\".user.nickname}}");
    request.body = Body::Text("{{\"Login\".response}}".to_string());
    send_request(&store, &executor, request).unwrap();

    let sent = executor.last();
    // A missing field resolves to empty text.
    assert_eq!(sent.url, "https://x/users/7?extra=");
    assert_eq!(sent.body, login_reply().normalized().body);
}

#[test]
fn test_object_is_spliced_into_json_body() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let login = store
        .create_request(RequestDraft::new("Login", "POST", "https://x/login"))
        .unwrap();
    send_saved_request(&store, &|_: &ProxyRequest| login_reply(), &login.id).unwrap();

    let update = store
        .create_request(
            RequestDraft::new("Update", "PUT", "https://x/profile")
                .with_body(r#"{"owner": "{{"Login".user}}", "token": "{{"Login".token}}"}"#),
        )
        .unwrap();

    let executor = Capture::replying(ProxyResponse::new(204, "204 No Content"));
    send_saved_request(&store, &executor, &update.id).unwrap();

    assert_eq!(
        executor.last().body,
        Body::Json(json!({"owner": {"id": 7, "roles": ["admin"]}, "token": "abc-123"}))
    );
}

#[test]
fn test_unresolvable_references_stay_literal() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store
        .create_request(RequestDraft::new("Never Sent", "GET", "https://x"))
        .unwrap();

    let executor = Capture::replying(ProxyResponse::new(200, "200 OK"));
    let url = "https://x/{{\"Never Sent\".id}}/{{\"Ghost\".id}}/{{missing}}";
    send_request(&store, &executor, ProxyRequest::new("GET", url)).unwrap();

    assert_eq!(executor.last().url, url);
}

#[test]
fn test_failed_send_is_recorded() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let login = store
        .create_request(RequestDraft::new("Login", "POST", "https://x/login"))
        .unwrap();

    let failing = |_: &ProxyRequest| ProxyResponse::failure("Request failed: connection refused");
    let response = send_saved_request(&store, &failing, &login.id).unwrap();
    assert_eq!(response.status_code, 0);

    let recorded = store.get_request(&login.id).unwrap().last_response.unwrap();
    assert_eq!(recorded.error.as_deref(), Some("Request failed: connection refused"));

    // The recorded failure has an empty body, so its fields resolve to empty text.
    let executor = Capture::replying(ProxyResponse::new(200, "200 OK"));
    send_request(&store, &executor, ProxyRequest::new("GET", "https://x/{{\"Login\".token}}")).unwrap();
    assert_eq!(executor.last().url, "https://x/");
}

#[test]
#[serial]
fn test_environment_indirection_reaches_request() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store
        .save_variables(vec![
            Variable::new("host", "api.local"),
            Variable::new("apiKey", "$WORKBENCH_IT_API_KEY"),
        ])
        .unwrap();

    std::env::set_var("WORKBENCH_IT_API_KEY", "k-live-42");
    let executor = Capture::replying(ProxyResponse::new(200, "200 OK"));
    let mut request = ProxyRequest::new("GET", "https://{{host}}/v1");
    request.add_header("X-Api-Key".to_string(), "{{apiKey}}".to_string());
    send_request(&store, &executor, request.clone()).unwrap();
    assert_eq!(
        executor.last().headers.get("X-Api-Key").map(String::as_str),
        Some("k-live-42")
    );

    let resolved = store.variables_with_resolved().unwrap();
    let api_key = resolved.iter().find(|v| v.key == "apiKey").unwrap();
    assert!(api_key.is_env_var);
    assert_eq!(api_key.value, "$WORKBENCH_IT_API_KEY");
    assert_eq!(api_key.resolved_value, "k-live-42");

    std::env::remove_var("WORKBENCH_IT_API_KEY");
    send_request(&store, &executor, request).unwrap();
    assert_eq!(
        executor.last().headers.get("X-Api-Key").map(String::as_str),
        Some("$WORKBENCH_IT_API_KEY")
    );
}

#[test]
fn test_switching_environment_changes_resolution() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.save_variables(vec![Variable::new("host", "dev.local")]).unwrap();
    let prod = store.create_environment("Production").unwrap();
    store
        .update_environment(&prod.id, None, Some(vec![Variable::new("host", "prod.example.com")]))
        .unwrap();

    let executor = Capture::replying(ProxyResponse::new(200, "200 OK"));
    send_request(&store, &executor, ProxyRequest::new("GET", "https://{{host}}/")).unwrap();
    assert_eq!(executor.last().url, "https://dev.local/");

    store.activate_environment(&prod.id).unwrap();
    send_request(&store, &executor, ProxyRequest::new("GET", "https://{{host}}/")).unwrap();
    assert_eq!(executor.last().url, "https://prod.example.com/");
}

/// Behaves like a data file held open by another process: direct writes
/// always fail and the first `locked_renames` renames fail too.
struct LockedFile {
    locked_renames: u32,
    renames: AtomicU32,
}

impl LockedFile {
    fn new(locked_renames: u32) -> Self {
        Self {
            locked_renames,
            renames: AtomicU32::new(0),
        }
    }
}

impl FileSystem for LockedFile {
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        OsFileSystem.read_file(path)
    }

    fn write_direct(&self, _path: &Path, _contents: &[u8]) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "file is locked"))
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        OsFileSystem.write_file(path, contents)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        OsFileSystem.remove_file(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let attempt = self.renames.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.locked_renames {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "file is locked"));
        }
        OsFileSystem.rename(from, to)
    }

    fn exists(&self, path: &Path) -> bool {
        OsFileSystem.exists(path)
    }
}

#[test]
fn test_save_succeeds_once_lock_is_released() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("locked.json");
    let store = DocumentStore::with_file_system(&path, LockedFile::new(2), RetryPolicy::immediate(5));

    let created = store
        .create_request(RequestDraft::new("Ping", "GET", "https://x/ping"))
        .unwrap();

    assert_eq!(store.get_request(&created.id).unwrap().name, "Ping");
    assert!(!dir.path().join("locked.json.tmp").exists());
}

#[test]
fn test_save_gives_up_when_lock_persists() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("locked.json");
    let store = DocumentStore::with_file_system(&path, LockedFile::new(u32::MAX), RetryPolicy::immediate(3));

    let err = store
        .create_request(RequestDraft::new("Ping", "GET", "https://x/ping"))
        .unwrap_err();

    assert!(matches!(err, StoreError::SaveRetriesExhausted { attempts: 3, .. }));
    assert_eq!(err.kind(), ErrorKind::Persistence);
    assert_eq!(
        err.to_string(),
        "failed to save after 3 attempts - file may be locked by another process"
    );
    assert!(!dir.path().join("locked.json.tmp").exists());
    assert!(store.list_requests().unwrap().is_empty());
}

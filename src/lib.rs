//! API Workbench
//!
//! A local API-testing core: named HTTP request definitions, environments of
//! variables and request groups, all persisted in a single JSON document, plus
//! a template engine that fills `{{...}}` tokens from variables or from other
//! requests' recorded responses.
//!
//! # Architecture
//!
//! - **models**: Saved requests, responses, environments, groups and the persisted document
//! - **store**: The document store (load/save, atomic writes, migrations) and every mutating operation
//! - **variables**: Response reference parsing, field extraction and template substitution
//! - **executor**: The `Executor` seam and the send workflows that record responses
//! - **config**: Workbench settings with a global accessor
//! - **logging**: `env_logger` setup for the `log` facade
//!
//! # Response chaining
//!
//! Sending a saved request stores its response as `lastResponse`. Any later
//! template can then read from it:
//!
//! - `{{"Login".token}}` substitutes the `token` field of Login's last response body
//! - `{{"Login".response}}` substitutes the whole body
//! - `"{{"Login".user}}"` inside a JSON body splices the `user` object in as raw JSON
//!
//! Unresolvable references are left in the text as written.
//!
//! # Usage
//!
//! ```no_run
//! use api_workbench::executor::send_saved_request;
//! use api_workbench::models::{ProxyRequest, ProxyResponse, RequestDraft};
//! use api_workbench::store::DocumentStore;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = DocumentStore::new("saved_requests.json");
//! let login = store.create_request(RequestDraft::new("Login", "POST", "https://api.example.com/login"))?;
//!
//! let executor = |_: &ProxyRequest| ProxyResponse::new(200, "200 OK").with_body(r#"{"token":"abc"}"#);
//! let response = send_saved_request(&store, &executor, &login.id)?;
//! assert_eq!(response.status_code, 200);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod executor;
pub mod logging;
pub mod models;
pub mod store;
pub mod variables;

pub use config::WorkbenchConfig;
pub use executor::{send_request, send_saved_request, Executor};
pub use logging::init_logging;
pub use models::{Body, Document, ProxyRequest, ProxyResponse, SavedRequest};
pub use store::{DocumentStore, ErrorKind, StoreError, StoreResult};

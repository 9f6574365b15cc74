//! Request execution.
//!
//! The outbound HTTP call sits behind the [`Executor`] trait: it receives a
//! fully-resolved [`ProxyRequest`] and always returns a [`ProxyResponse`],
//! with transport failures reported in its `error` field.
//!
//! [`send_request`] and [`send_saved_request`] wire an executor to the store:
//! load the document, resolve templates against the current environment and
//! recorded responses, execute, and (for saved requests) record the response
//! so later `{{"Name".path}}` references can read it.
//!
//! A network executor built on `reqwest` is available as `NativeExecutor`
//! with the `native-http` feature.

pub mod config;
pub mod error;

#[cfg(feature = "native-http")]
pub mod native;

pub use config::ExecutionConfig;
pub use error::RequestError;

#[cfg(feature = "native-http")]
pub use native::NativeExecutor;

use crate::models::{method_or_default, Document, ProxyRequest, ProxyResponse};
use crate::store::{DocumentStore, FileSystem, StoreError, StoreResult};
use crate::variables::resolve_request;
use log::{debug, info, warn};

/// Performs a fully-resolved request.
///
/// Implementations enforce their own timeout and must not panic on network
/// failure; they return a response whose `error` is set instead.
pub trait Executor {
    fn execute(&self, request: &ProxyRequest) -> ProxyResponse;
}

impl<T> Executor for T
where
    T: Fn(&ProxyRequest) -> ProxyResponse,
{
    fn execute(&self, request: &ProxyRequest) -> ProxyResponse {
        self(request)
    }
}

/// Resolves and executes an ad-hoc request. Nothing is persisted.
///
/// The method defaults to `GET`. Response references resolve against the
/// document as loaded at the start of the call.
///
/// # Errors
///
/// - [`StoreError::Validation`] if the URL is empty
/// - any error from loading the document
///
/// # Examples
///
/// ```no_run
/// use api_workbench::executor::send_request;
/// use api_workbench::models::{ProxyRequest, ProxyResponse};
/// use api_workbench::store::DocumentStore;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = DocumentStore::new("saved_requests.json");
/// let echo = |request: &ProxyRequest| ProxyResponse::new(200, "200 OK").with_body(request.url.clone());
///
/// let response = send_request(&store, &echo, ProxyRequest::new("GET", "http://{{host}}/health"))?;
/// println!("{}", response.status);
/// # Ok(())
/// # }
/// ```
pub fn send_request<F: FileSystem>(
    store: &DocumentStore<F>,
    executor: &dyn Executor,
    mut request: ProxyRequest,
) -> StoreResult<ProxyResponse> {
    if request.url.is_empty() {
        return Err(StoreError::validation("URL is required"));
    }
    request.method = method_or_default(&request.method);

    let document = store.load()?;
    execute_resolved(&document, executor, &request)
}

/// Resolves and executes saved request `id`, then records the response as its
/// `lastResponse`.
///
/// # Errors
///
/// - [`StoreError::Validation`] if `id` is empty
/// - [`StoreError::NotFound`] if no request has this id
/// - any error from loading the document or recording the response
pub fn send_saved_request<F: FileSystem>(
    store: &DocumentStore<F>,
    executor: &dyn Executor,
    id: &str,
) -> StoreResult<ProxyResponse> {
    if id.is_empty() {
        return Err(StoreError::validation("Request ID is required"));
    }

    let document = store.load()?;
    let saved = document
        .request(id)
        .ok_or_else(|| StoreError::not_found("Request not found"))?;
    let request = saved.to_proxy_request();

    let response = execute_resolved(&document, executor, &request)?;
    store.record_response(id, response.clone())?;

    if response.is_success() {
        info!("Sent '{}' and recorded response ({})", saved.name, response.status);
    } else if let Some(error) = &response.error {
        warn!("Sent '{}' and recorded failure: {}", saved.name, error);
    } else {
        warn!("Sent '{}' and recorded response ({})", saved.name, response.status);
    }
    Ok(response)
}

fn execute_resolved(
    document: &Document,
    executor: &dyn Executor,
    request: &ProxyRequest,
) -> StoreResult<ProxyResponse> {
    let environment = document
        .current_environment()
        .ok_or_else(|| StoreError::not_found("Current environment not found"))?;

    let resolved = resolve_request(request, &environment.variables, document);
    if resolved.url != request.url {
        debug!("Resolved URL: {} -> {}", request.url, resolved.url);
    }

    Ok(executor.execute(&resolved).normalized())
}

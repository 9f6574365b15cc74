//! Native HTTP executor using reqwest's blocking client.
//!
//! Only available with the `native-http` feature.

use super::config::ExecutionConfig;
use super::error::RequestError;
use super::Executor;
use crate::models::{Body, ProxyRequest, ProxyResponse};
use log::{debug, info, warn};
use reqwest::blocking::Client;

/// Executes requests over the network with a fixed timeout.
#[derive(Debug, Clone)]
pub struct NativeExecutor {
    client: Client,
}

impl NativeExecutor {
    /// Builds an executor whose client applies `config`'s timeout to every request.
    pub fn new(config: &ExecutionConfig) -> Result<Self, RequestError> {
        let client = Client::builder()
            .timeout(config.timeout_duration())
            .build()
            .map_err(|e| RequestError::BuildError(e.to_string()))?;
        Ok(Self { client })
    }

    fn build(&self, request: &ProxyRequest) -> Result<reqwest::blocking::RequestBuilder, RequestError> {
        let url = url::Url::parse(&request.url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(RequestError::UnsupportedProtocol(url.scheme().to_string()));
        }

        // Any valid token is sent as written, extension methods included.
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|_| RequestError::BuildError(format!("invalid method {:?}", request.method)))?;

        let mut builder = self.client.request(method, url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let body = request.body.to_text();
        if !body.is_empty() {
            builder = builder.body(body);
        }

        Ok(builder)
    }
}

impl Executor for NativeExecutor {
    fn execute(&self, request: &ProxyRequest) -> ProxyResponse {
        let builder = match self.build(request) {
            Ok(builder) => builder,
            Err(e) => {
                warn!("Failed to create request: {}", e);
                return ProxyResponse::failure(format!("Failed to create request: {}", e));
            }
        };

        debug!("Making request to: {} {}", request.method, request.url);
        let response = match builder.send() {
            Ok(response) => response,
            Err(e) => {
                let error = RequestError::from(e);
                warn!("Request failed: {}", error);
                return ProxyResponse::failure(format!("Request failed: {}", error));
            }
        };

        let status = response.status();
        let status_line = format!("{} {}", status.as_u16(), status.canonical_reason().unwrap_or(""))
            .trim_end()
            .to_string();

        let mut result = ProxyResponse::new(status.as_u16(), status_line);
        for name in response.headers().keys() {
            if let Some(value) = response.headers().get(name).and_then(|v| v.to_str().ok()) {
                result.add_header(name.as_str().to_string(), value.to_string());
            }
        }

        match response.bytes() {
            Ok(bytes) => {
                info!(
                    "Request completed: {} ({} bytes)",
                    result.status,
                    bytes.len()
                );
                result.body = Body::from_bytes(&bytes);
            }
            Err(e) => {
                let error = RequestError::BodyError(e.to_string());
                warn!("{}", error);
                result.error = Some(error.to_string());
            }
        }
        result
    }
}

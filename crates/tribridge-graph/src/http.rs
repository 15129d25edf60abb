//! HTTP plumbing shared by the wire drivers
//!
//! Maps transport and status failures onto the error kinds callers act on:
//! anything that means "cannot talk to the store" becomes
//! `BackendUnavailable`, anything that means "the store said no to this
//! request" becomes `Query`.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tribridge_core::{BridgeError, ConnectionConfig, Result};

/// Connect timeout, independent of the per-request timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest response body excerpt carried in an error message
const MAX_ERROR_BODY: usize = 512;

/// Creates a configured HTTP client with timeout.
pub(crate) fn create_http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Attach basic auth when a username is configured
pub(crate) fn with_auth(request: RequestBuilder, config: &ConnectionConfig) -> RequestBuilder {
    match config.username.as_deref() {
        Some(username) => request.basic_auth(username, config.password.as_deref()),
        None => request,
    }
}

/// Send a request, turning transport failures into `BackendUnavailable`
pub(crate) async fn send(backend: &str, request: RequestBuilder) -> Result<Response> {
    request.send().await.map_err(|e| {
        BridgeError::BackendUnavailable(format!("{backend} request failed: {e}"))
    })
}

/// Pass successful responses through; classify the rest
pub(crate) async fn check_status(backend: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(status_error(backend, status, &body))
}

pub(crate) fn status_error(backend: &str, status: StatusCode, body: &str) -> BridgeError {
    let excerpt: String = body.chars().take(MAX_ERROR_BODY).collect();
    let message = format!("{backend} returned HTTP {}: {excerpt}", status.as_u16());

    if status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || status.is_server_error()
    {
        BridgeError::BackendUnavailable(message)
    } else {
        BridgeError::Query(message)
    }
}

/// Decode a JSON body, reporting garbage as a `Query` error
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    backend: &str,
    response: Response,
) -> Result<T> {
    let bytes = response.bytes().await.map_err(|e| {
        BridgeError::BackendUnavailable(format!("{backend} response interrupted: {e}"))
    })?;

    serde_json::from_slice(&bytes)
        .map_err(|e| BridgeError::Query(format!("Malformed {backend} response: {e}")))
}

/// The configured URI, or a connection failure naming the missing setting
pub(crate) fn require_uri<'a>(backend: &str, config: &'a ConnectionConfig) -> Result<&'a str> {
    config
        .uri
        .as_deref()
        .map(str::trim)
        .filter(|uri| !uri.is_empty())
        .ok_or_else(|| {
            BridgeError::BackendUnavailable(format!("{backend} connection URI is not configured"))
        })
}

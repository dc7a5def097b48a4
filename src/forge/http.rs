//! forge::http
//!
//! HTTP plumbing shared by the forge clients.
//!
//! Responses are read as bytes and decoded with `serde_json` directly, so a
//! malformed body surfaces as `ForgeError::Format` rather than as a
//! transport failure.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::traits::ForgeError;

/// User-Agent header value for API requests.
pub const USER_AGENT_VALUE: &str = concat!("gitforge-rofi/", env!("CARGO_PKG_VERSION"));

/// Longest error body excerpt carried into an error message.
const MAX_ERROR_EXCERPT: usize = 200;

/// Build the HTTP client shared by all forges.
///
/// Every request gets `timeout` as its deadline.
pub fn build_client(timeout: Duration) -> Result<Client, ForgeError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

    Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .map_err(|e| ForgeError::transport("failed to build HTTP client", e))
}

/// Check the status of `response` and decode its JSON body.
///
/// `what` names the request in error messages.
pub async fn read_json<T: DeserializeOwned>(
    response: Response,
    what: &str,
) -> Result<T, ForgeError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| ForgeError::transport(format!("failed to read {} response body", what), e))?;

    if !status.is_success() {
        return Err(api_error(status, &body));
    }

    serde_json::from_slice(&body)
        .map_err(|e| ForgeError::format(format!("failed to parse {} response", what), e))
}

/// Map an error status and body to `ForgeError::Api`.
///
/// GitHub and GitLab both put a human-readable `message` in error bodies;
/// GitLab OAuth failures use `error` instead.
pub fn api_error(status: StatusCode, body: &[u8]) -> ForgeError {
    let message = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            let field = value.get("message").or_else(|| value.get("error"))?;
            Some(match field.as_str() {
                Some(s) => s.to_string(),
                None => field.to_string(),
            })
        })
        .unwrap_or_else(|| {
            let text = String::from_utf8_lossy(body);
            let text = text.trim();
            if text.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            } else {
                text.chars().take(MAX_ERROR_EXCERPT).collect()
            }
        });

    ForgeError::Api {
        status: status.as_u16(),
        message,
    }
}

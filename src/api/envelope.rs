//! Coercion of raw HTTP outcomes into [`ApiResponse`].
//!
//! Whatever comes back (an empty body, a non-JSON body, an envelope with fields
//! missing, or no response at all) ends up as a well-formed envelope.

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::models::ApiResponse;
use crate::utils::{body_preview, status_codes};

pub const EMPTY_RESPONSE_MESSAGE: &str = "Empty response";
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON response";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error";

#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    code: Option<i32>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Value,
}

/// Builds the envelope for a response that arrived with `status` and `body`.
///
/// The body's `code` and `message` win over the HTTP status. A `data` that
/// does not fit `T` is dropped, keeping the server's code.
pub fn normalize<T: DeserializeOwned>(status: StatusCode, body: &str) -> ApiResponse<T> {
    let http_code = i32::from(status.as_u16());

    if body.trim().is_empty() {
        let message = status.canonical_reason().unwrap_or(EMPTY_RESPONSE_MESSAGE);
        return ApiResponse::failure(http_code, message);
    }

    let raw = match serde_json::from_str::<Value>(body) {
        Ok(value @ Value::Object(_)) => serde_json::from_value::<RawEnvelope>(value),
        Ok(_) => return invalid_json(http_code, "body is not an object", body),
        Err(err) => return invalid_json(http_code, err, body),
    };
    let raw = match raw {
        Ok(raw) => raw,
        Err(err) => return invalid_json(http_code, err, body),
    };

    let code = raw.code.unwrap_or(http_code);
    let message = raw.message.unwrap_or_default();
    if raw.data.is_null() {
        return ApiResponse {
            code,
            message,
            data: None,
        };
    }

    match serde_json::from_value::<T>(raw.data) {
        Ok(data) => ApiResponse {
            code,
            message,
            data: Some(data),
        },
        Err(err) => {
            tracing::warn!(
                code,
                "Response data does not match the expected shape: {}; body: {}",
                err,
                body_preview(body)
            );
            if code == status_codes::OK {
                ApiResponse::failure(code, INVALID_JSON_MESSAGE)
            } else {
                ApiResponse::failure(code, message)
            }
        }
    }
}

fn invalid_json<T>(http_code: i32, err: impl std::fmt::Display, body: &str) -> ApiResponse<T> {
    tracing::warn!(
        status = http_code,
        "Failed to parse response body: {}; body: {}",
        err,
        body_preview(body)
    );
    ApiResponse::failure(http_code, INVALID_JSON_MESSAGE)
}

/// Envelope for a request that never produced a readable response.
pub fn transport_failure<T>(err: &reqwest::Error) -> ApiResponse<T> {
    let message = err.to_string();
    if message.trim().is_empty() {
        ApiResponse::failure(status_codes::INTERNAL_ERROR, NETWORK_ERROR_MESSAGE)
    } else {
        ApiResponse::failure(status_codes::INTERNAL_ERROR, message)
    }
}

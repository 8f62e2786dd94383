// Shared envelope and paging structures

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::utils::status_codes;

/// Uniform envelope every backend response is coerced into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Authoritative outcome; 200 means success
    pub code: i32,
    pub message: String,
    /// Present only on success, but callers must still check `code`
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: status_codes::OK,
            message: "success".to_string(),
            data: Some(data),
        }
    }

    pub fn failure(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == status_codes::OK && self.data.is_some()
    }

    /// Splits the envelope into data or error. A 200 without data counts as
    /// an error.
    pub fn into_result(self) -> Result<T, ApiError> {
        match self.data {
            Some(data) if self.code == status_codes::OK => Ok(data),
            _ => Err(ApiError {
                code: self.code,
                message: self.message,
            }),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            code: self.code,
            message: self.message,
            data: self.data.map(f),
        }
    }
}

/// Spring-style page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub content: Vec<T>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<bool>,
}

/// Body of mutation endpoints that only report a status string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

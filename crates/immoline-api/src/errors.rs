// SPDX-License-Identifier: Apache-2.0

use immoline_model::FieldErrors;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ApiErrorCode {
    InvalidQueryParameter,
    InvalidId,
    ValidationFailed,
    PropertyNotFound,
    StoreUnavailable,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
}

impl ApiError {
    #[must_use]
    pub fn invalid_param(name: &str, value: &str) -> Self {
        Self {
            code: ApiErrorCode::InvalidQueryParameter,
            message: format!("invalid query parameter: {name}"),
            details: json!({"parameter": name, "value": value}),
        }
    }

    #[must_use]
    pub fn invalid_id(raw: &str) -> Self {
        Self {
            code: ApiErrorCode::InvalidId,
            message: "invalid property id".to_string(),
            details: json!({"id": raw}),
        }
    }

    #[must_use]
    pub fn validation_failed(field_errors: &FieldErrors) -> Self {
        Self {
            code: ApiErrorCode::ValidationFailed,
            message: "validation failed".to_string(),
            details: json!({"fieldErrors": field_errors}),
        }
    }

    #[must_use]
    pub fn not_found(id: i64) -> Self {
        Self {
            code: ApiErrorCode::PropertyNotFound,
            message: "property not found".to_string(),
            details: json!({"id": id}),
        }
    }

    /// Store-level failures stay opaque on the wire; the cause is logged
    /// server-side.
    #[must_use]
    pub fn store_unavailable() -> Self {
        Self {
            code: ApiErrorCode::StoreUnavailable,
            message: "store unavailable".to_string(),
            details: json!({}),
        }
    }

    #[must_use]
    pub fn internal(message: &str) -> Self {
        Self {
            code: ApiErrorCode::Internal,
            message: message.to_string(),
            details: json!({}),
        }
    }
}

#[must_use]
pub fn map_error_status(code: ApiErrorCode) -> u16 {
    match code {
        ApiErrorCode::InvalidQueryParameter
        | ApiErrorCode::InvalidId
        | ApiErrorCode::ValidationFailed => 400,
        ApiErrorCode::PropertyNotFound => 404,
        ApiErrorCode::StoreUnavailable => 503,
        _ => 500,
    }
}

// SPDX-License-Identifier: Apache-2.0

use immoline_model::{FieldErrors, Property};
use immoline_query::Pagination;
use serde::{Deserialize, Serialize};

/// `GET /` list envelope: the page of records plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEnvelope {
    pub success: bool,
    pub data: Vec<Property>,
    pub pagination: Pagination,
}

impl ListEnvelope {
    #[must_use]
    pub fn new(data: Vec<Property>, pagination: Pagination) -> Self {
        Self {
            success: true,
            data,
            pagination,
        }
    }
}

/// Single-record envelope, with an optional human-readable message on
/// mutations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEnvelope {
    pub success: bool,
    pub data: Property,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ItemEnvelope {
    #[must_use]
    pub fn new(data: Property) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    #[must_use]
    pub fn with_message(data: Property, message: &str) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.to_string()),
        }
    }
}

/// Confirmation envelope for operations that return no record (delete).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    pub success: bool,
    pub message: String,
}

impl MessageEnvelope {
    #[must_use]
    pub fn new(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}

/// Failure envelope: `success` is always false, `error` is the message, and
/// validation failures attach the field → message map under `details`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<FieldErrors>,
}

impl ErrorEnvelope {
    #[must_use]
    pub fn new(error: &str) -> Self {
        Self {
            success: false,
            error: error.to_string(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(error: &str, details: FieldErrors) -> Self {
        Self {
            success: false,
            error: error.to_string(),
            details: Some(details),
        }
    }
}

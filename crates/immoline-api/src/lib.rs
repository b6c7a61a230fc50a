// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

//! Boundary shaping for the property API: typed parse-and-validate of query
//! parameters, the uniform response envelope, and the error code → HTTP
//! status mapping. No business logic lives here.

mod envelope;
mod errors;
mod params;

pub use envelope::{ErrorEnvelope, ItemEnvelope, ListEnvelope, MessageEnvelope};
pub use errors::{map_error_status, ApiError, ApiErrorCode};
pub use params::{parse_id, parse_list_params, parse_list_params_with_limit, ListPropertiesParams};

pub const CRATE_NAME: &str = "immoline-api";

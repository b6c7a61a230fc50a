// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

//! Consuming-side plumbing for the property API: a trait seam over the HTTP
//! surface, a reqwest implementation, and the state store a UI binds to.

mod http_api;
mod state;

pub use http_api::{ClientError, HttpPropertyApi, PropertyApi};
pub use state::PropertyStoreState;

pub const CRATE_NAME: &str = "immoline-client";

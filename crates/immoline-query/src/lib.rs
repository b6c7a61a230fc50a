// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

//! Translates a sparse filter set plus a page window into a parameterized
//! list query and its matching count query against the properties table.

mod filter;
mod pagination;
mod sql;

pub use filter::{PageWindow, PropertyFilter, DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT};
pub use pagination::Pagination;
pub use sql::{build_count_sql, build_list_sql, decode_property_row, escape_like, SELECT_COLUMNS};

pub const CRATE_NAME: &str = "immoline-query";

// SPDX-License-Identifier: Apache-2.0

use crate::errors::ApiError;
use immoline_model::{PropertyStatus, PropertyType};
use immoline_query::{PageWindow, PropertyFilter, DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct ListPropertiesParams {
    pub filter: PropertyFilter,
    pub window: PageWindow,
}

fn parse_f64(query: &BTreeMap<String, String>, name: &str) -> Result<Option<f64>, ApiError> {
    let Some(raw) = query.get(name) else {
        return Ok(None);
    };
    let value = raw
        .parse::<f64>()
        .map_err(|_| ApiError::invalid_param(name, raw))?;
    if !value.is_finite() || value < 0.0 {
        return Err(ApiError::invalid_param(name, raw));
    }
    Ok(Some(value))
}

fn parse_i64(query: &BTreeMap<String, String>, name: &str) -> Result<Option<i64>, ApiError> {
    let Some(raw) = query.get(name) else {
        return Ok(None);
    };
    let value = raw
        .parse::<i64>()
        .map_err(|_| ApiError::invalid_param(name, raw))?;
    if value < 0 {
        return Err(ApiError::invalid_param(name, raw));
    }
    Ok(Some(value))
}

fn parse_positive_u32(
    query: &BTreeMap<String, String>,
    name: &str,
    default: u32,
    max: u32,
) -> Result<u32, ApiError> {
    let Some(raw) = query.get(name) else {
        return Ok(default);
    };
    let value = raw
        .parse::<u32>()
        .map_err(|_| ApiError::invalid_param(name, raw))?;
    if value == 0 || value > max {
        return Err(ApiError::invalid_param(name, raw));
    }
    Ok(value)
}

/// Typed parse-and-validate of the list query string. Malformed or
/// out-of-range values are rejected rather than silently coerced; absent
/// parameters impose no constraint.
pub fn parse_list_params(
    query: &BTreeMap<String, String>,
) -> Result<ListPropertiesParams, ApiError> {
    parse_list_params_with_limit(query, DEFAULT_LIMIT, MAX_LIMIT)
}

pub fn parse_list_params_with_limit(
    query: &BTreeMap<String, String>,
    default_limit: u32,
    max_limit: u32,
) -> Result<ListPropertiesParams, ApiError> {
    let property_type = query
        .get("type")
        .map(|raw| PropertyType::parse(raw).map_err(|_| ApiError::invalid_param("type", raw)))
        .transpose()?;
    let status = query
        .get("status")
        .map(|raw| PropertyStatus::parse(raw).map_err(|_| ApiError::invalid_param("status", raw)))
        .transpose()?;

    let filter = PropertyFilter {
        city: query.get("city").cloned().filter(|c| !c.is_empty()),
        min_price: parse_f64(query, "minPrice")?,
        max_price: parse_f64(query, "maxPrice")?,
        property_type,
        status,
        min_rooms: parse_i64(query, "minRooms")?,
        min_surface: parse_f64(query, "minSurface")?,
    };

    let window = PageWindow {
        page: parse_positive_u32(query, "page", DEFAULT_PAGE, u32::MAX)?,
        limit: parse_positive_u32(query, "limit", default_limit, max_limit)?,
    };

    Ok(ListPropertiesParams { filter, window })
}

/// Parses a path id the way the original contract does: digits only.
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::invalid_id(raw));
    }
    raw.parse::<i64>().map_err(|_| ApiError::invalid_id(raw))
}

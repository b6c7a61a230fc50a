// SPDX-License-Identifier: Apache-2.0

//! Field-level and cross-field validation rules.
//!
//! Rules never fail fast: every applicable violation is collected into one
//! map keyed by wire field name, so a caller sees the full set in a single
//! round trip. An empty map means the input is valid.

use crate::property::{
    PropertyDraft, PropertyPatch, PropertyStatus, PropertyType, ADDRESS_MAX_LEN, ADDRESS_MIN_LEN,
    CITY_MAX_LEN, CITY_MIN_LEN, DESCRIPTION_MAX_LEN, DESCRIPTION_MIN_LEN, PRICE_MIN, SURFACE_MIN,
    TITLE_MAX_LEN, TITLE_MIN_LEN,
};
use std::collections::BTreeMap;
use url::Url;

pub type FieldErrors = BTreeMap<String, String>;

#[must_use]
pub fn has_errors(errors: &FieldErrors) -> bool {
    !errors.is_empty()
}

fn check_text_len(value: &str, name: &str, min: usize, max: usize) -> Option<String> {
    let len = value.chars().count();
    if len < min {
        return Some(format!("{name} must contain at least {min} characters"));
    }
    if len > max {
        return Some(format!("{name} must contain at most {max} characters"));
    }
    None
}

fn check_title(value: &str) -> Option<String> {
    check_text_len(value, "title", TITLE_MIN_LEN, TITLE_MAX_LEN)
}

fn check_description(value: &str) -> Option<String> {
    check_text_len(value, "description", DESCRIPTION_MIN_LEN, DESCRIPTION_MAX_LEN)
}

fn check_city(value: &str) -> Option<String> {
    check_text_len(value, "city", CITY_MIN_LEN, CITY_MAX_LEN)
}

fn check_address(value: &str) -> Option<String> {
    check_text_len(value, "address", ADDRESS_MIN_LEN, ADDRESS_MAX_LEN)
}

fn check_price(value: f64) -> Option<String> {
    if !value.is_finite() || value < PRICE_MIN {
        return Some(format!("price must be at least {PRICE_MIN}"));
    }
    None
}

fn check_surface(value: f64) -> Option<String> {
    if !value.is_finite() || value < SURFACE_MIN {
        return Some(format!("surface must be at least {SURFACE_MIN}"));
    }
    None
}

fn check_rooms(value: i64) -> Option<String> {
    if value < 1 {
        return Some("rooms must be a positive integer".to_string());
    }
    None
}

fn check_bedrooms(value: i64) -> Option<String> {
    if value < 0 {
        return Some("bedrooms must not be negative".to_string());
    }
    None
}

fn check_bathrooms(value: i64) -> Option<String> {
    if value < 1 {
        return Some("bathrooms must be a positive integer".to_string());
    }
    None
}

fn check_type(value: &str) -> Option<String> {
    if PropertyType::parse(value).is_err() {
        return Some(format!("type must be one of: {}", domain_list_types()));
    }
    None
}

fn check_status(value: &str) -> Option<String> {
    if PropertyStatus::parse(value).is_err() {
        return Some(format!("status must be one of: {}", domain_list_statuses()));
    }
    None
}

// Optional field: absent or empty is valid, anything else must parse as a URL.
fn check_image_url(value: Option<&str>) -> Option<String> {
    let raw = value?.trim();
    if raw.is_empty() {
        return None;
    }
    if Url::parse(raw).is_err() {
        return Some("imageUrl must be a valid URL".to_string());
    }
    None
}

// Cross-field rule: a home cannot have more bedrooms than rooms.
fn check_bedrooms_vs_rooms(bedrooms: i64, rooms: i64) -> Option<String> {
    if bedrooms > rooms {
        return Some("bedrooms cannot exceed rooms".to_string());
    }
    None
}

fn domain_list_types() -> String {
    PropertyType::ALL
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn domain_list_statuses() -> String {
    PropertyStatus::ALL
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn insert(errors: &mut FieldErrors, field: &str, violation: Option<String>) {
    if let Some(message) = violation {
        errors.insert(field.to_string(), message);
    }
}

/// Validates a full creation payload. All fields are required, so every rule
/// runs; the cross-field rule fires only when bedrooms alone is in range.
#[must_use]
pub fn validate_draft(draft: &PropertyDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    insert(&mut errors, "title", check_title(&draft.title));
    insert(&mut errors, "description", check_description(&draft.description));
    insert(&mut errors, "city", check_city(&draft.city));
    insert(&mut errors, "address", check_address(&draft.address));
    insert(&mut errors, "price", check_price(draft.price));
    insert(&mut errors, "surface", check_surface(draft.surface));
    insert(&mut errors, "rooms", check_rooms(draft.rooms));
    insert(&mut errors, "bedrooms", check_bedrooms(draft.bedrooms));
    insert(&mut errors, "bathrooms", check_bathrooms(draft.bathrooms));
    insert(&mut errors, "type", check_type(&draft.property_type));
    insert(&mut errors, "status", check_status(&draft.status));
    insert(&mut errors, "imageUrl", check_image_url(draft.image_url.as_deref()));
    if !errors.contains_key("bedrooms") {
        insert(
            &mut errors,
            "bedrooms",
            check_bedrooms_vs_rooms(draft.bedrooms, draft.rooms),
        );
    }
    errors
}

/// Validates a partial update: only supplied fields are checked. The
/// cross-field rule fires here only when the patch carries both rooms and
/// bedrooms; a one-sided patch is re-checked against the stored record by
/// the store before it applies.
#[must_use]
pub fn validate_patch(patch: &PropertyPatch) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if let Some(title) = &patch.title {
        insert(&mut errors, "title", check_title(title));
    }
    if let Some(description) = &patch.description {
        insert(&mut errors, "description", check_description(description));
    }
    if let Some(city) = &patch.city {
        insert(&mut errors, "city", check_city(city));
    }
    if let Some(address) = &patch.address {
        insert(&mut errors, "address", check_address(address));
    }
    if let Some(price) = patch.price {
        insert(&mut errors, "price", check_price(price));
    }
    if let Some(surface) = patch.surface {
        insert(&mut errors, "surface", check_surface(surface));
    }
    if let Some(rooms) = patch.rooms {
        insert(&mut errors, "rooms", check_rooms(rooms));
    }
    if let Some(bedrooms) = patch.bedrooms {
        insert(&mut errors, "bedrooms", check_bedrooms(bedrooms));
    }
    if let Some(bathrooms) = patch.bathrooms {
        insert(&mut errors, "bathrooms", check_bathrooms(bathrooms));
    }
    if let Some(property_type) = &patch.property_type {
        insert(&mut errors, "type", check_type(property_type));
    }
    if let Some(status) = &patch.status {
        insert(&mut errors, "status", check_status(status));
    }
    insert(&mut errors, "imageUrl", check_image_url(patch.image_url.as_deref()));
    if let (Some(bedrooms), Some(rooms)) = (patch.bedrooms, patch.rooms) {
        if !errors.contains_key("bedrooms") {
            insert(
                &mut errors,
                "bedrooms",
                check_bedrooms_vs_rooms(bedrooms, rooms),
            );
        }
    }
    errors
}

// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

//! Immoline model SSOT: the property record shape, its enumerated domains,
//! and the validation rule set shared by the server boundary and the client.

mod property;
mod validate;

pub use property::{
    parse_property_status, parse_property_type, DomainParseError, Property, PropertyDraft,
    PropertyPatch, PropertyStatus, PropertyType, ADDRESS_MAX_LEN, ADDRESS_MIN_LEN, CITY_MAX_LEN,
    CITY_MIN_LEN, DESCRIPTION_MAX_LEN, DESCRIPTION_MIN_LEN, PRICE_MIN, SURFACE_MIN, TITLE_MAX_LEN,
    TITLE_MIN_LEN,
};
pub use validate::{has_errors, validate_draft, validate_patch, FieldErrors};

pub const CRATE_NAME: &str = "immoline-model";

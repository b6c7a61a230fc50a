// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const TITLE_MIN_LEN: usize = 3;
pub const TITLE_MAX_LEN: usize = 200;
pub const DESCRIPTION_MIN_LEN: usize = 10;
pub const DESCRIPTION_MAX_LEN: usize = 2000;
pub const CITY_MIN_LEN: usize = 2;
pub const CITY_MAX_LEN: usize = 100;
pub const ADDRESS_MIN_LEN: usize = 5;
pub const ADDRESS_MAX_LEN: usize = 255;
pub const PRICE_MIN: f64 = 1000.0;
pub const SURFACE_MIN: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DomainParseError {
    UnknownType(String),
    UnknownStatus(String),
}

impl Display for DomainParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownType(raw) => write!(f, "unknown property type: {raw}"),
            Self::UnknownStatus(raw) => write!(f, "unknown property status: {raw}"),
        }
    }
}

impl std::error::Error for DomainParseError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Appartement,
    Maison,
    Studio,
    Loft,
    Villa,
}

impl PropertyType {
    pub const ALL: [Self; 5] = [
        Self::Appartement,
        Self::Maison,
        Self::Studio,
        Self::Loft,
        Self::Villa,
    ];

    pub fn parse(input: &str) -> Result<Self, DomainParseError> {
        match input {
            "appartement" => Ok(Self::Appartement),
            "maison" => Ok(Self::Maison),
            "studio" => Ok(Self::Studio),
            "loft" => Ok(Self::Loft),
            "villa" => Ok(Self::Villa),
            other => Err(DomainParseError::UnknownType(other.to_string())),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Appartement => "appartement",
            Self::Maison => "maison",
            Self::Studio => "studio",
            Self::Loft => "loft",
            Self::Villa => "villa",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    Disponible,
    Vendu,
    Loue,
    Reserve,
}

impl PropertyStatus {
    pub const ALL: [Self; 4] = [Self::Disponible, Self::Vendu, Self::Loue, Self::Reserve];

    pub fn parse(input: &str) -> Result<Self, DomainParseError> {
        match input {
            "disponible" => Ok(Self::Disponible),
            "vendu" => Ok(Self::Vendu),
            "loue" => Ok(Self::Loue),
            "reserve" => Ok(Self::Reserve),
            other => Err(DomainParseError::UnknownStatus(other.to_string())),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disponible => "disponible",
            Self::Vendu => "vendu",
            Self::Loue => "loue",
            Self::Reserve => "reserve",
        }
    }
}

impl Default for PropertyStatus {
    fn default() -> Self {
        Self::Disponible
    }
}

pub fn parse_property_type(input: &str) -> Result<PropertyType, DomainParseError> {
    PropertyType::parse(input)
}

pub fn parse_property_status(input: &str) -> Result<PropertyStatus, DomainParseError> {
    PropertyStatus::parse(input)
}

/// A persisted property record. The id and both timestamps are assigned by
/// the store; everything else comes from a validated draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub city: String,
    pub address: String,
    pub price: f64,
    pub surface: f64,
    pub rooms: i64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub status: PropertyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation payload. `type` and `status` stay raw strings here so that domain
/// membership is reported through the aggregated field errors instead of a
/// deserialization failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PropertyDraft {
    pub title: String,
    pub description: String,
    pub city: String,
    pub address: String,
    pub price: f64,
    pub surface: f64,
    pub rooms: i64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    #[serde(rename = "type")]
    pub property_type: String,
    #[serde(default = "default_status_str")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

fn default_status_str() -> String {
    PropertyStatus::Disponible.as_str().to_string()
}

/// Partial update payload: only supplied fields change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct PropertyPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rooms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<i64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl PropertyPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.city.is_none()
            && self.address.is_none()
            && self.price.is_none()
            && self.surface.is_none()
            && self.rooms.is_none()
            && self.bedrooms.is_none()
            && self.bathrooms.is_none()
            && self.property_type.is_none()
            && self.status.is_none()
            && self.image_url.is_none()
    }
}

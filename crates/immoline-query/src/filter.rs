// SPDX-License-Identifier: Apache-2.0

use immoline_model::{PropertyStatus, PropertyType};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// The optional predicate fields narrowing a list query. Absent fields
/// impose no constraint; supplied fields are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFilter {
    /// Substring match, not exact equality.
    pub city: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    #[serde(rename = "type")]
    pub property_type: Option<PropertyType>,
    pub status: Option<PropertyStatus>,
    pub min_rooms: Option<i64>,
    pub min_surface: Option<f64>,
}

impl PropertyFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.city.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.property_type.is_none()
            && self.status.is_none()
            && self.min_rooms.is_none()
            && self.min_surface.is_none()
    }
}

/// A validated result window. Both fields are 1-based positives; the API
/// boundary rejects anything else before a window is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageWindow {
    #[must_use]
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

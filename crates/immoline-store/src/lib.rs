// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

//! Persists and retrieves property records. Filtering and pagination are
//! delegated to `immoline-query`, input correctness to `immoline-model`;
//! this crate owns the connection, the schema, and the merge semantics of
//! partial updates.

use chrono::{SecondsFormat, Utc};
use immoline_model::{
    validate_draft, validate_patch, FieldErrors, Property, PropertyDraft, PropertyPatch,
};
use immoline_query::{
    build_count_sql, build_list_sql, decode_property_row, PageWindow, Pagination, PropertyFilter,
    SELECT_COLUMNS,
};
use rusqlite::{params_from_iter, Connection};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error};

pub const CRATE_NAME: &str = "immoline-store";

const SCHEMA_DDL: &str = "\
CREATE TABLE IF NOT EXISTS properties (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    city TEXT NOT NULL,
    address TEXT NOT NULL,
    price REAL NOT NULL,
    surface REAL NOT NULL,
    rooms INTEGER NOT NULL,
    bedrooms INTEGER NOT NULL,
    bathrooms INTEGER NOT NULL,
    type TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'disponible',
    image_url TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_properties_city ON properties(city);
CREATE INDEX IF NOT EXISTS idx_properties_price ON properties(price);
CREATE INDEX IF NOT EXISTS idx_properties_type ON properties(type);
CREATE INDEX IF NOT EXISTS idx_properties_status ON properties(status);
";

#[derive(Debug, Error)]
pub enum StoreError {
    /// One or more rules reported violations; the full set is attached.
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("property not found")]
    NotFound,
    /// Persistence or connectivity failure. The message stays internal; the
    /// boundary surfaces it as an opaque failure.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::QueryReturnedNoRows => Self::NotFound,
            other => Self::Unavailable(other.to_string()),
        }
    }
}

/// One listing page plus the metadata describing the whole filtered set.
#[derive(Debug, Clone)]
pub struct PropertyPage {
    pub properties: Vec<Property>,
    pub pagination: Pagination,
}

/// CRUD store over a single SQLite connection. The connection is guarded by
/// an async mutex; concurrency beyond that is last-writer-wins, as the
/// underlying database provides.
#[derive(Debug, Clone)]
pub struct PropertyStore {
    conn: Arc<Mutex<Connection>>,
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl PropertyStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA_DDL)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Validates and persists a creation payload, assigning the id and both
    /// timestamps, then returns the stored record as read back.
    pub async fn create(&self, draft: &PropertyDraft) -> Result<Property, StoreError> {
        let errors = validate_draft(draft);
        if !errors.is_empty() {
            return Err(StoreError::Validation(errors));
        }

        let now = now_rfc3339();
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO properties (title, description, city, address, price, surface, \
             rooms, bedrooms, bathrooms, type, status, image_url, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            rusqlite::params![
                draft.title,
                draft.description,
                draft.city,
                draft.address,
                draft.price,
                draft.surface,
                draft.rooms,
                draft.bedrooms,
                draft.bathrooms,
                draft.property_type,
                draft.status,
                draft.image_url,
                now,
                now,
            ],
        )
        .map_err(log_store_failure)?;

        let id = conn.last_insert_rowid();
        debug!(id, city = %draft.city, "property created");
        Self::fetch_by_id(&conn, id)
    }

    /// Returns the record or NotFound; no side effects.
    pub async fn find_by_id(&self, id: i64) -> Result<Property, StoreError> {
        let conn = self.conn.lock().await;
        Self::fetch_by_id(&conn, id)
    }

    /// Runs the count query first so `total` reflects the filtered set, then
    /// the windowed list ordered by creation time descending.
    pub async fn find_all(
        &self,
        filter: &PropertyFilter,
        window: &PageWindow,
    ) -> Result<PropertyPage, StoreError> {
        let conn = self.conn.lock().await;

        let (count_sql, count_params) = build_count_sql(filter);
        let total: u64 = conn
            .query_row(&count_sql, params_from_iter(count_params.iter()), |row| {
                row.get::<_, i64>(0)
            })
            .map_err(log_store_failure)?
            .try_into()
            .unwrap_or(0);

        let (list_sql, list_params) = build_list_sql(filter, window);
        let mut stmt = conn.prepare(&list_sql).map_err(log_store_failure)?;
        let properties = stmt
            .query_map(params_from_iter(list_params.iter()), decode_property_row)
            .map_err(log_store_failure)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(log_store_failure)?;

        Ok(PropertyPage {
            properties,
            pagination: Pagination::compute(window.page, window.limit, total),
        })
    }

    /// Applies only the supplied fields to an existing record, re-checking
    /// the cross-field rule against the merged result, and refreshes
    /// `updated_at`. An empty patch returns the current record untouched.
    pub async fn update(&self, id: i64, patch: &PropertyPatch) -> Result<Property, StoreError> {
        let errors = validate_patch(patch);
        if !errors.is_empty() {
            return Err(StoreError::Validation(errors));
        }

        let conn = self.conn.lock().await;
        let current = Self::fetch_by_id(&conn, id)?;

        if patch.is_empty() {
            return Ok(current);
        }

        // The boundary rule only fires when a patch carries both sides;
        // one-sided patches are checked against the stored values here.
        let merged_bedrooms = patch.bedrooms.unwrap_or(current.bedrooms);
        let merged_rooms = patch.rooms.unwrap_or(current.rooms);
        if merged_bedrooms > merged_rooms {
            let mut errors = FieldErrors::new();
            errors.insert(
                "bedrooms".to_string(),
                "bedrooms cannot exceed rooms".to_string(),
            );
            return Err(StoreError::Validation(errors));
        }

        let mut assignments: Vec<String> = Vec::new();
        let mut values: Vec<rusqlite::types::Value> = Vec::new();
        let mut push = |column: &str, value: rusqlite::types::Value| {
            assignments.push(format!("{column} = ?"));
            values.push(value);
        };

        if let Some(title) = &patch.title {
            push("title", title.clone().into());
        }
        if let Some(description) = &patch.description {
            push("description", description.clone().into());
        }
        if let Some(city) = &patch.city {
            push("city", city.clone().into());
        }
        if let Some(address) = &patch.address {
            push("address", address.clone().into());
        }
        if let Some(price) = patch.price {
            push("price", price.into());
        }
        if let Some(surface) = patch.surface {
            push("surface", surface.into());
        }
        if let Some(rooms) = patch.rooms {
            push("rooms", rooms.into());
        }
        if let Some(bedrooms) = patch.bedrooms {
            push("bedrooms", bedrooms.into());
        }
        if let Some(bathrooms) = patch.bathrooms {
            push("bathrooms", bathrooms.into());
        }
        if let Some(property_type) = &patch.property_type {
            push("type", property_type.clone().into());
        }
        if let Some(status) = &patch.status {
            push("status", status.clone().into());
        }
        if let Some(image_url) = &patch.image_url {
            push("image_url", image_url.clone().into());
        }
        push("updated_at", now_rfc3339().into());

        values.push(id.into());
        let sql = format!(
            "UPDATE properties SET {} WHERE id = ?",
            assignments.join(", ")
        );
        conn.execute(&sql, params_from_iter(values.iter()))
            .map_err(log_store_failure)?;

        debug!(id, "property updated");
        Self::fetch_by_id(&conn, id)
    }

    /// Removes an existing record. Deleting a nonexistent id reports
    /// NotFound rather than succeeding silently.
    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let affected = conn
            .execute("DELETE FROM properties WHERE id = ?", [id])
            .map_err(log_store_failure)?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        debug!(id, "property deleted");
        Ok(())
    }

    fn fetch_by_id(conn: &Connection, id: i64) -> Result<Property, StoreError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM properties WHERE id = ?");
        conn.query_row(&sql, [id], decode_property_row)
            .map_err(StoreError::from)
    }
}

fn log_store_failure(err: rusqlite::Error) -> StoreError {
    error!(error = %err, "store operation failed");
    StoreError::Unavailable(err.to_string())
}

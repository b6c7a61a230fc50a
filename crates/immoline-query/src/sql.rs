// SPDX-License-Identifier: Apache-2.0

use crate::filter::{PageWindow, PropertyFilter};
use chrono::{DateTime, Utc};
use immoline_model::{Property, PropertyStatus, PropertyType};
use rusqlite::types::{Type, Value};
use rusqlite::Row;

pub const SELECT_COLUMNS: &str = "id, title, description, city, address, price, surface, \
     rooms, bedrooms, bathrooms, type, status, image_url, created_at, updated_at";

/// Escapes LIKE metacharacters so a city filter matches literally.
#[must_use]
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '!' | '%' | '_' => {
                out.push('!');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

fn build_where(filter: &PropertyFilter) -> (Vec<String>, Vec<Value>) {
    let mut where_parts: Vec<String> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    if let Some(city) = &filter.city {
        where_parts.push("city LIKE ? ESCAPE '!'".to_string());
        params.push(Value::Text(format!("%{}%", escape_like(city))));
    }
    if let Some(min_price) = filter.min_price {
        where_parts.push("price >= ?".to_string());
        params.push(Value::Real(min_price));
    }
    if let Some(max_price) = filter.max_price {
        where_parts.push("price <= ?".to_string());
        params.push(Value::Real(max_price));
    }
    if let Some(property_type) = filter.property_type {
        where_parts.push("type = ?".to_string());
        params.push(Value::Text(property_type.as_str().to_string()));
    }
    if let Some(status) = filter.status {
        where_parts.push("status = ?".to_string());
        params.push(Value::Text(status.as_str().to_string()));
    }
    if let Some(min_rooms) = filter.min_rooms {
        where_parts.push("rooms >= ?".to_string());
        params.push(Value::Integer(min_rooms));
    }
    if let Some(min_surface) = filter.min_surface {
        where_parts.push("surface >= ?".to_string());
        params.push(Value::Real(min_surface));
    }

    (where_parts, params)
}

/// Builds the windowed list query: ANDed filter predicates, newest first
/// (id descending breaks creation-time ties), LIMIT/OFFSET window.
#[must_use]
pub fn build_list_sql(filter: &PropertyFilter, window: &PageWindow) -> (String, Vec<Value>) {
    let (where_parts, mut params) = build_where(filter);

    let mut sql = format!("SELECT {SELECT_COLUMNS} FROM properties");
    if !where_parts.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&where_parts.join(" AND "));
    }
    sql.push_str(" ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?");
    params.push(Value::Integer(i64::from(window.limit)));
    params.push(Value::Integer(window.offset()));

    (sql, params)
}

/// Builds the count query over the same predicate set, so `total` reflects
/// the filtered set before the window is applied.
#[must_use]
pub fn build_count_sql(filter: &PropertyFilter) -> (String, Vec<Value>) {
    let (where_parts, params) = build_where(filter);

    let mut sql = "SELECT COUNT(*) FROM properties".to_string();
    if !where_parts.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&where_parts.join(" AND "));
    }

    (sql, params)
}

fn text_column_error(idx: usize, err: impl std::error::Error + Send + Sync + 'static) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn decode_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| text_column_error(idx, e))
}

/// Decodes one row of [`SELECT_COLUMNS`] into a [`Property`].
pub fn decode_property_row(row: &Row<'_>) -> rusqlite::Result<Property> {
    let raw_type: String = row.get(10)?;
    let raw_status: String = row.get(11)?;
    Ok(Property {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        city: row.get(3)?,
        address: row.get(4)?,
        price: row.get(5)?,
        surface: row.get(6)?,
        rooms: row.get(7)?,
        bedrooms: row.get(8)?,
        bathrooms: row.get(9)?,
        property_type: PropertyType::parse(&raw_type).map_err(|e| text_column_error(10, e))?,
        status: PropertyStatus::parse(&raw_status).map_err(|e| text_column_error(11, e))?,
        image_url: row.get(12)?,
        created_at: decode_timestamp(row, 13)?,
        updated_at: decode_timestamp(row, 14)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param_texts(params: &[Value]) -> Vec<String> {
        params
            .iter()
            .map(|v| match v {
                Value::Text(s) => s.clone(),
                Value::Integer(i) => i.to_string(),
                Value::Real(r) => r.to_string(),
                other => format!("{other:?}"),
            })
            .collect()
    }

    #[test]
    fn unfiltered_list_has_no_where_clause() {
        let (sql, params) = build_list_sql(&PropertyFilter::default(), &PageWindow::default());
        assert!(!sql.contains("WHERE"));
        assert!(sql.ends_with("ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"));
        assert_eq!(params, vec![Value::Integer(10), Value::Integer(0)]);
    }

    #[test]
    fn every_filter_contributes_one_anded_predicate() {
        let filter = PropertyFilter {
            city: Some("Lyon".to_string()),
            min_price: Some(1000.0),
            max_price: Some(300_000.0),
            property_type: Some(immoline_model::PropertyType::Loft),
            status: Some(immoline_model::PropertyStatus::Disponible),
            min_rooms: Some(2),
            min_surface: Some(30.0),
        };
        let (sql, params) = build_list_sql(&filter, &PageWindow::default());
        assert!(sql.contains("city LIKE ? ESCAPE '!'"));
        assert!(sql.contains("price >= ?"));
        assert!(sql.contains("price <= ?"));
        assert!(sql.contains("type = ?"));
        assert!(sql.contains("status = ?"));
        assert!(sql.contains("rooms >= ?"));
        assert!(sql.contains("surface >= ?"));
        assert_eq!(sql.matches(" AND ").count(), 6);
        // 7 filter params + limit + offset
        assert_eq!(params.len(), 9);
        assert_eq!(param_texts(&params)[0], "%Lyon%");
    }

    #[test]
    fn city_filter_is_substring_with_escaped_metacharacters() {
        let filter = PropertyFilter {
            city: Some("Lyon_2%".to_string()),
            ..PropertyFilter::default()
        };
        let (_, params) = build_list_sql(&filter, &PageWindow::default());
        assert_eq!(param_texts(&params)[0], "%Lyon!_2!%%");
    }

    #[test]
    fn count_sql_shares_the_predicate_set_without_a_window() {
        let filter = PropertyFilter {
            status: Some(immoline_model::PropertyStatus::Vendu),
            min_rooms: Some(3),
            ..PropertyFilter::default()
        };
        let (count_sql, count_params) = build_count_sql(&filter);
        let (list_sql, list_params) = build_list_sql(&filter, &PageWindow { page: 4, limit: 25 });

        assert!(count_sql.starts_with("SELECT COUNT(*) FROM properties WHERE "));
        assert!(!count_sql.contains("LIMIT"));
        assert_eq!(count_params.len() + 2, list_params.len());
        assert_eq!(
            list_params[list_params.len() - 2..],
            [Value::Integer(25), Value::Integer(75)]
        );
        let list_where = list_sql
            .split(" WHERE ")
            .nth(1)
            .and_then(|rest| rest.split(" ORDER BY ").next())
            .expect("where clause");
        let count_where = count_sql.split(" WHERE ").nth(1).expect("where clause");
        assert_eq!(list_where, count_where);
    }

    #[test]
    fn escape_like_handles_the_escape_character_itself() {
        assert_eq!(escape_like("a!b"), "a!!b");
        assert_eq!(escape_like("plain"), "plain");
    }
}

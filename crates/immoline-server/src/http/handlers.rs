// SPDX-License-Identifier: Apache-2.0

use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use immoline_api::{
    map_error_status, parse_id, parse_list_params_with_limit, ApiError, ErrorEnvelope,
    ItemEnvelope, ListEnvelope, MessageEnvelope,
};
use immoline_model::{PropertyDraft, PropertyPatch};
use immoline_store::StoreError;
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{error, info};

fn api_error_response(err: &ApiError) -> Response {
    let status = StatusCode::from_u16(map_error_status(err.code))
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorEnvelope::new(&err.message))).into_response()
}

fn store_error_response(route: &str, err: StoreError) -> Response {
    match err {
        StoreError::Validation(errors) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorEnvelope::with_details("validation failed", errors)),
        )
            .into_response(),
        StoreError::NotFound => (
            StatusCode::NOT_FOUND,
            Json(ErrorEnvelope::new("property not found")),
        )
            .into_response(),
        StoreError::Unavailable(cause) => {
            // surfaced opaque; the cause stays in the logs
            error!(route, error = %cause, "store unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorEnvelope::new("store unavailable")),
            )
                .into_response()
        }
    }
}

fn body_rejection_response(rejection: &JsonRejection) -> Response {
    (
        rejection.status(),
        Json(ErrorEnvelope::new("invalid request body")),
    )
        .into_response()
}

/// Liveness probe; bypasses the data path entirely.
pub(crate) async fn health_handler() -> Response {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
    .into_response()
}

pub(crate) async fn list_properties_handler(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    let parsed =
        match parse_list_params_with_limit(&params, state.api.default_limit, state.api.max_limit) {
            Ok(parsed) => parsed,
            Err(err) => return api_error_response(&err),
        };

    match state.store.find_all(&parsed.filter, &parsed.window).await {
        Ok(page) => {
            info!(
                route = "/api/properties",
                total = page.pagination.total,
                returned = page.properties.len(),
                "list properties"
            );
            Json(ListEnvelope::new(page.properties, page.pagination)).into_response()
        }
        Err(err) => store_error_response("/api/properties", err),
    }
}

pub(crate) async fn get_property_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Response {
    let id = match parse_id(&raw_id) {
        Ok(id) => id,
        Err(err) => return api_error_response(&err),
    };

    match state.store.find_by_id(id).await {
        Ok(property) => Json(ItemEnvelope::new(property)).into_response(),
        Err(err) => store_error_response("/api/properties/:id", err),
    }
}

pub(crate) async fn create_property_handler(
    State(state): State<AppState>,
    payload: Result<Json<PropertyDraft>, JsonRejection>,
) -> Response {
    let Json(draft) = match payload {
        Ok(json) => json,
        Err(rejection) => return body_rejection_response(&rejection),
    };

    match state.store.create(&draft).await {
        Ok(property) => {
            info!(id = property.id, "property created");
            (
                StatusCode::CREATED,
                Json(ItemEnvelope::with_message(property, "property created")),
            )
                .into_response()
        }
        Err(err) => store_error_response("/api/properties", err),
    }
}

pub(crate) async fn update_property_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<PropertyPatch>, JsonRejection>,
) -> Response {
    let id = match parse_id(&raw_id) {
        Ok(id) => id,
        Err(err) => return api_error_response(&err),
    };
    let Json(patch) = match payload {
        Ok(json) => json,
        Err(rejection) => return body_rejection_response(&rejection),
    };

    match state.store.update(id, &patch).await {
        Ok(property) => {
            info!(id, "property updated");
            Json(ItemEnvelope::with_message(property, "property updated")).into_response()
        }
        Err(err) => store_error_response("/api/properties/:id", err),
    }
}

pub(crate) async fn delete_property_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Response {
    let id = match parse_id(&raw_id) {
        Ok(id) => id,
        Err(err) => return api_error_response(&err),
    };

    match state.store.delete(id).await {
        Ok(()) => {
            info!(id, "property deleted");
            Json(MessageEnvelope::new("property deleted")).into_response()
        }
        Err(err) => store_error_response("/api/properties/:id", err),
    }
}

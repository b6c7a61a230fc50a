// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

//! Axum wiring for the property API: application state, router, and the
//! hand-rolled CORS layer. Handlers live in [`http::handlers`] and contain
//! no business logic beyond status-code mapping.

use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Request, State};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::{from_fn_with_state, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use immoline_store::PropertyStore;
use std::sync::Arc;

pub mod http;

pub const CRATE_NAME: &str = "immoline-server";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub cors_allowed_origins: Vec<String>,
    pub default_limit: u32,
    pub max_limit: u32,
    pub max_body_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors_allowed_origins: vec!["http://localhost:5173".to_string()],
            default_limit: immoline_query::DEFAULT_LIMIT,
            max_limit: immoline_query::MAX_LIMIT,
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Explicit dependency injection: the store handle is passed in, never read
/// from a global.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PropertyStore>,
    pub api: Arc<ApiConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<PropertyStore>) -> Self {
        Self::with_config(store, ApiConfig::default())
    }

    #[must_use]
    pub fn with_config(store: Arc<PropertyStore>, api: ApiConfig) -> Self {
        Self {
            store,
            api: Arc::new(api),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(http::handlers::health_handler))
        .route(
            "/api/properties",
            get(http::handlers::list_properties_handler)
                .post(http::handlers::create_property_handler),
        )
        .route(
            "/api/properties/:id",
            get(http::handlers::get_property_handler)
                .put(http::handlers::update_property_handler)
                .delete(http::handlers::delete_property_handler),
        )
        .layer(from_fn_with_state(state.clone(), cors_middleware))
        .layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .with_state(state)
}

fn allowed_origin(state: &AppState, req: &Request<Body>) -> Option<HeaderValue> {
    let origin = req.headers().get("origin")?.to_str().ok()?;
    if state
        .api
        .cors_allowed_origins
        .iter()
        .any(|allowed| allowed == origin)
    {
        HeaderValue::from_str(origin).ok()
    } else {
        None
    }
}

async fn cors_middleware(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
    let origin = allowed_origin(&state, &req);

    if req.method() == Method::OPTIONS {
        let mut resp = StatusCode::NO_CONTENT.into_response();
        if let Some(origin_value) = origin {
            resp.headers_mut()
                .insert("access-control-allow-origin", origin_value);
            resp.headers_mut().insert(
                "access-control-allow-methods",
                HeaderValue::from_static("GET,POST,PUT,DELETE,OPTIONS"),
            );
            resp.headers_mut().insert(
                "access-control-allow-headers",
                HeaderValue::from_static("content-type,accept"),
            );
        }
        return resp;
    }

    let mut resp = next.run(req).await;
    if let Some(origin_value) = origin {
        resp.headers_mut()
            .insert("access-control-allow-origin", origin_value);
    }
    resp
}

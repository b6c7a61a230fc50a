// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use immoline_server::{build_router, ApiConfig, AppState};
use immoline_store::PropertyStore;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(default)
}

fn env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_origin_list(name: &str, default: &str) -> Vec<String> {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind = env::var("IMMOLINE_BIND").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env_u16("IMMOLINE_PORT", 3001);
    let db_path = PathBuf::from(
        env::var("IMMOLINE_DB_PATH").unwrap_or_else(|_| "immoline.db".to_string()),
    );

    let api = ApiConfig {
        cors_allowed_origins: env_origin_list("IMMOLINE_CORS_ORIGINS", "http://localhost:5173"),
        default_limit: env_u32("IMMOLINE_DEFAULT_LIMIT", 10),
        max_limit: env_u32("IMMOLINE_MAX_LIMIT", 100),
        max_body_bytes: env_usize("IMMOLINE_MAX_BODY_BYTES", 64 * 1024),
    };

    let store = match PropertyStore::open(&db_path) {
        Ok(store) => Arc::new(store),
        Err(err) => {
            error!(path = %db_path.display(), error = %err, "failed to open property store");
            std::process::exit(1);
        }
    };

    let state = AppState::with_config(store, api);
    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(addr = %addr, error = %err, "failed to bind");
            std::process::exit(1);
        }
    };

    info!(addr = %addr, db = %db_path.display(), "immoline server listening");
    if let Err(err) = axum::serve(listener, app).await {
        error!(error = %err, "server terminated");
        std::process::exit(1);
    }
}

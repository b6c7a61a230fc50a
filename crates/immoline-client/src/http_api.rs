// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use immoline_api::{ErrorEnvelope, ItemEnvelope, ListEnvelope, MessageEnvelope};
use immoline_model::{FieldErrors, Property, PropertyDraft, PropertyPatch};
use immoline_query::PropertyFilter;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a failure envelope; the message is the
    /// server's `error` field.
    #[error("{message}")]
    Api { status: u16, message: String },
    /// Rejected locally by the shared rule set before any request was sent.
    #[error("invalid input")]
    Invalid(FieldErrors),
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// The HTTP surface of the property API, behind a trait so state and UI
/// code can be exercised against a fake.
#[async_trait]
pub trait PropertyApi: Send + Sync {
    async fn list(
        &self,
        filter: &PropertyFilter,
        page: u32,
        limit: u32,
    ) -> Result<ListEnvelope, ClientError>;
    async fn get(&self, id: i64) -> Result<Property, ClientError>;
    async fn create(&self, draft: &PropertyDraft) -> Result<Property, ClientError>;
    async fn update(&self, id: i64, patch: &PropertyPatch) -> Result<Property, ClientError>;
    async fn delete(&self, id: i64) -> Result<(), ClientError>;
}

/// reqwest implementation against a running immoline server.
pub struct HttpPropertyApi {
    base_url: String,
    http: reqwest::Client,
}

impl HttpPropertyApi {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/api/properties", self.base_url)
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/api/properties/{id}", self.base_url)
    }

    async fn failure(resp: reqwest::Response) -> ClientError {
        let status = resp.status().as_u16();
        let message = match resp.json::<ErrorEnvelope>().await {
            Ok(envelope) => envelope.error,
            Err(_) => "request failed".to_string(),
        };
        ClientError::Api { status, message }
    }
}

fn query_pairs(filter: &PropertyFilter, page: u32, limit: u32) -> Vec<(&'static str, String)> {
    let mut pairs: Vec<(&'static str, String)> = Vec::new();
    if let Some(city) = &filter.city {
        pairs.push(("city", city.clone()));
    }
    if let Some(min_price) = filter.min_price {
        pairs.push(("minPrice", min_price.to_string()));
    }
    if let Some(max_price) = filter.max_price {
        pairs.push(("maxPrice", max_price.to_string()));
    }
    if let Some(property_type) = filter.property_type {
        pairs.push(("type", property_type.as_str().to_string()));
    }
    if let Some(status) = filter.status {
        pairs.push(("status", status.as_str().to_string()));
    }
    if let Some(min_rooms) = filter.min_rooms {
        pairs.push(("minRooms", min_rooms.to_string()));
    }
    if let Some(min_surface) = filter.min_surface {
        pairs.push(("minSurface", min_surface.to_string()));
    }
    pairs.push(("page", page.to_string()));
    pairs.push(("limit", limit.to_string()));
    pairs
}

#[async_trait]
impl PropertyApi for HttpPropertyApi {
    async fn list(
        &self,
        filter: &PropertyFilter,
        page: u32,
        limit: u32,
    ) -> Result<ListEnvelope, ClientError> {
        debug!(page, limit, "list properties");
        let resp = self
            .http
            .get(self.collection_url())
            .query(&query_pairs(filter, page, limit))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::failure(resp).await);
        }
        Ok(resp.json::<ListEnvelope>().await?)
    }

    async fn get(&self, id: i64) -> Result<Property, ClientError> {
        let resp = self.http.get(self.item_url(id)).send().await?;
        if !resp.status().is_success() {
            return Err(Self::failure(resp).await);
        }
        Ok(resp.json::<ItemEnvelope>().await?.data)
    }

    async fn create(&self, draft: &PropertyDraft) -> Result<Property, ClientError> {
        let resp = self
            .http
            .post(self.collection_url())
            .json(draft)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::failure(resp).await);
        }
        Ok(resp.json::<ItemEnvelope>().await?.data)
    }

    async fn update(&self, id: i64, patch: &PropertyPatch) -> Result<Property, ClientError> {
        let resp = self
            .http
            .put(self.item_url(id))
            .json(patch)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::failure(resp).await);
        }
        Ok(resp.json::<ItemEnvelope>().await?.data)
    }

    async fn delete(&self, id: i64) -> Result<(), ClientError> {
        let resp = self.http.delete(self.item_url(id)).send().await?;
        if !resp.status().is_success() {
            return Err(Self::failure(resp).await);
        }
        resp.json::<MessageEnvelope>().await?;
        Ok(())
    }
}

// SPDX-License-Identifier: Apache-2.0

use crate::http_api::{ClientError, PropertyApi};
use immoline_model::{validate_draft, validate_patch, Property, PropertyDraft, PropertyPatch};
use immoline_query::{Pagination, PropertyFilter, DEFAULT_LIMIT, DEFAULT_PAGE};
use std::sync::Arc;
use tracing::warn;

/// Listing state a UI binds to. Holds the current page of records, the
/// active filters, and the loading/error flags, and refetches whenever
/// filters or the page change.
///
/// The API is injected so the state can be driven against a fake in tests.
pub struct PropertyStoreState {
    api: Arc<dyn PropertyApi>,
    properties: Vec<Property>,
    current: Option<Property>,
    filters: PropertyFilter,
    pagination: Pagination,
    limit: u32,
    loading: bool,
    error: Option<String>,
}

impl PropertyStoreState {
    #[must_use]
    pub fn new(api: Arc<dyn PropertyApi>) -> Self {
        Self::with_limit(api, DEFAULT_LIMIT)
    }

    /// Same as [`new`](Self::new) with a caller-chosen page size, for UIs
    /// whose grid does not fit the default.
    #[must_use]
    pub fn with_limit(api: Arc<dyn PropertyApi>, limit: u32) -> Self {
        Self {
            api,
            properties: Vec::new(),
            current: None,
            filters: PropertyFilter::default(),
            pagination: Pagination::compute(DEFAULT_PAGE, limit, 0),
            limit,
            loading: false,
            error: None,
        }
    }

    #[must_use]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    #[must_use]
    pub fn current(&self) -> Option<&Property> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn filters(&self) -> &PropertyFilter {
        &self.filters
    }

    #[must_use]
    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Fetches the current page with the current filters, replacing the
    /// held records. On failure the previous records are kept and the
    /// error flag is set.
    pub async fn fetch_properties(&mut self) {
        self.loading = true;
        self.error = None;
        let result = self
            .api
            .list(&self.filters, self.pagination.page, self.limit)
            .await;
        self.loading = false;
        match result {
            Ok(envelope) => {
                self.properties = envelope.data;
                self.pagination = envelope.pagination;
            }
            Err(err) => {
                warn!(error = %err, "list fetch failed");
                self.error = Some(err.to_string());
            }
        }
    }

    pub async fn fetch_property(&mut self, id: i64) {
        self.loading = true;
        self.error = None;
        let result = self.api.get(id).await;
        self.loading = false;
        match result {
            Ok(property) => self.current = Some(property),
            Err(err) => {
                self.current = None;
                self.error = Some(err.to_string());
            }
        }
    }

    /// Replaces the filter set, rewinds to the first page, and refetches.
    pub async fn set_filters(&mut self, filters: PropertyFilter) {
        self.filters = filters;
        self.pagination.page = DEFAULT_PAGE;
        self.fetch_properties().await;
    }

    pub async fn clear_filters(&mut self) {
        self.set_filters(PropertyFilter::default()).await;
    }

    pub async fn set_page(&mut self, page: u32) {
        self.pagination.page = page;
        self.fetch_properties().await;
    }

    /// Validates locally with the same rule set the server applies, then
    /// submits. A rejected draft never reaches the wire. The list is
    /// refetched on success so the new record lands in its sorted place.
    pub async fn submit_create(&mut self, draft: &PropertyDraft) -> Result<Property, ClientError> {
        let errors = validate_draft(draft);
        if !errors.is_empty() {
            return Err(ClientError::Invalid(errors));
        }
        let created = self.api.create(draft).await?;
        self.fetch_properties().await;
        Ok(created)
    }

    pub async fn submit_update(
        &mut self,
        id: i64,
        patch: &PropertyPatch,
    ) -> Result<Property, ClientError> {
        let errors = validate_patch(patch);
        if !errors.is_empty() {
            return Err(ClientError::Invalid(errors));
        }
        let updated = self.api.update(id, patch).await?;
        if self.current.as_ref().is_some_and(|p| p.id == id) {
            self.current = Some(updated.clone());
        }
        self.fetch_properties().await;
        Ok(updated)
    }

    pub async fn submit_delete(&mut self, id: i64) -> Result<(), ClientError> {
        self.api.delete(id).await?;
        if self.current.as_ref().is_some_and(|p| p.id == id) {
            self.current = None;
        }
        self.fetch_properties().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use immoline_api::ListEnvelope;
    use immoline_model::{PropertyStatus, PropertyType};
    use std::sync::Mutex;

    fn property(id: i64) -> Property {
        Property {
            id,
            title: format!("Bien {id}"),
            description: "Un bel espace lumineux".to_string(),
            city: "Lyon".to_string(),
            address: "5 rue Victor Hugo".to_string(),
            price: 250_000.0,
            surface: 45.0,
            rooms: 2,
            bedrooms: 1,
            bathrooms: 1,
            property_type: PropertyType::Loft,
            status: PropertyStatus::Disponible,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn draft(title: &str) -> PropertyDraft {
        PropertyDraft {
            title: title.to_string(),
            description: "Un bel espace lumineux".to_string(),
            city: "Lyon".to_string(),
            address: "5 rue Victor Hugo".to_string(),
            price: 250_000.0,
            surface: 45.0,
            rooms: 2,
            bedrooms: 1,
            bathrooms: 1,
            property_type: "loft".to_string(),
            status: "disponible".to_string(),
            image_url: None,
        }
    }

    #[derive(Default)]
    struct FakeApi {
        list_calls: Mutex<Vec<(PropertyFilter, u32, u32)>>,
        create_calls: Mutex<u32>,
        fail_list: bool,
    }

    #[async_trait]
    impl PropertyApi for FakeApi {
        async fn list(
            &self,
            filter: &PropertyFilter,
            page: u32,
            limit: u32,
        ) -> Result<ListEnvelope, ClientError> {
            self.list_calls
                .lock()
                .expect("lock")
                .push((filter.clone(), page, limit));
            if self.fail_list {
                return Err(ClientError::Api {
                    status: 503,
                    message: "store unavailable".to_string(),
                });
            }
            Ok(ListEnvelope::new(
                vec![property(1), property(2)],
                Pagination::compute(page, limit, 2),
            ))
        }

        async fn get(&self, id: i64) -> Result<Property, ClientError> {
            if id == 999 {
                return Err(ClientError::Api {
                    status: 404,
                    message: "property not found".to_string(),
                });
            }
            Ok(property(id))
        }

        async fn create(&self, _draft: &PropertyDraft) -> Result<Property, ClientError> {
            *self.create_calls.lock().expect("lock") += 1;
            Ok(property(3))
        }

        async fn update(&self, id: i64, _patch: &PropertyPatch) -> Result<Property, ClientError> {
            Ok(property(id))
        }

        async fn delete(&self, _id: i64) -> Result<(), ClientError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn fetch_replaces_records_and_pagination() {
        let api = Arc::new(FakeApi::default());
        let mut state = PropertyStoreState::new(api.clone());
        state.fetch_properties().await;
        assert_eq!(state.properties().len(), 2);
        assert_eq!(state.pagination().total, 2);
        assert!(!state.is_loading());
        assert!(state.error().is_none());
    }

    #[tokio::test]
    async fn changing_filters_rewinds_to_first_page() {
        let api = Arc::new(FakeApi::default());
        let mut state = PropertyStoreState::new(api.clone());
        state.set_page(3).await;
        state
            .set_filters(PropertyFilter {
                city: Some("Lyon".to_string()),
                ..PropertyFilter::default()
            })
            .await;
        let calls = api.list_calls.lock().expect("lock");
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1, 3);
        assert_eq!(calls[1].1, 1, "filter change must rewind to page 1");
        assert_eq!(calls[1].0.city.as_deref(), Some("Lyon"));
    }

    #[tokio::test]
    async fn failed_fetch_sets_error_and_keeps_records() {
        let failing = Arc::new(FakeApi {
            fail_list: true,
            ..FakeApi::default()
        });
        let mut state = PropertyStoreState::new(failing);
        state.properties = vec![property(1)];
        state.fetch_properties().await;
        assert_eq!(state.error(), Some("store unavailable"));
        assert_eq!(state.properties().len(), 1);
        assert!(!state.is_loading());
        state.clear_error();
        assert!(state.error().is_none());
    }

    #[tokio::test]
    async fn fetch_property_miss_clears_current() {
        let api = Arc::new(FakeApi::default());
        let mut state = PropertyStoreState::new(api);
        state.fetch_property(1).await;
        assert_eq!(state.current().map(|p| p.id), Some(1));
        state.fetch_property(999).await;
        assert!(state.current().is_none());
        assert_eq!(state.error(), Some("property not found"));
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_the_api() {
        let api = Arc::new(FakeApi::default());
        let mut state = PropertyStoreState::new(api.clone());
        let mut bad = draft("X");
        bad.bedrooms = 4;
        let err = state.submit_create(&bad).await.expect_err("rejected");
        match err {
            ClientError::Invalid(errors) => {
                assert!(errors.contains_key("title"));
                assert!(errors.contains_key("bedrooms"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(*api.create_calls.lock().expect("lock"), 0);
    }

    #[tokio::test]
    async fn successful_create_refetches_the_list() {
        let api = Arc::new(FakeApi::default());
        let mut state = PropertyStoreState::new(api.clone());
        let created = state.submit_create(&draft("Loft clair")).await.expect("created");
        assert_eq!(created.id, 3);
        assert_eq!(*api.create_calls.lock().expect("lock"), 1);
        assert_eq!(api.list_calls.lock().expect("lock").len(), 1);
    }

    #[tokio::test]
    async fn delete_of_current_record_clears_it() {
        let api = Arc::new(FakeApi::default());
        let mut state = PropertyStoreState::new(api);
        state.fetch_property(5).await;
        state.submit_delete(5).await.expect("deleted");
        assert!(state.current().is_none());
    }
}

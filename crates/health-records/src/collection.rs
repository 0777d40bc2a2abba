//! Paged, refreshable view over one record kind.

use crate::{PageRequest, RecordKind, RecordsClient, RecordsResult, DEFAULT_PER_PAGE};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// The current page of a record kind plus the last error seen.
///
/// Mutations clear the error, run, and reload the current page on success.
/// A failed mutation records its message and is returned to the caller; a
/// failed reload only records its message.
pub struct RecordCollection<K: RecordKind> {
    client: Arc<RecordsClient>,
    page: u32,
    per_page: u32,
    items: Vec<K::Record>,
    total_count: u64,
    total_pages: u32,
    error: Option<String>,
    _kind: PhantomData<K>,
}

impl<K: RecordKind> RecordCollection<K> {
    pub fn new(client: Arc<RecordsClient>) -> Self {
        Self::with_page_size(client, DEFAULT_PER_PAGE)
    }

    pub fn with_page_size(client: Arc<RecordsClient>, per_page: u32) -> Self {
        Self {
            client,
            page: 1,
            per_page: per_page.max(1),
            items: Vec::new(),
            total_count: 0,
            total_pages: 0,
            error: None,
            _kind: PhantomData,
        }
    }

    pub fn items(&self) -> &[K::Record] {
        &self.items
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Select a page. Takes effect on the next [`refresh`](Self::refresh).
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Reload the current page. On failure the previous items are kept.
    pub async fn refresh(&mut self) -> RecordsResult<()> {
        self.error = None;
        let request = PageRequest::new(self.page, self.per_page);
        match self.client.list::<K>(request).await {
            Ok(page) => {
                self.items = page.items;
                self.total_count = page.total_count;
                self.total_pages = page.total_pages;
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    pub async fn create(&mut self, input: &K::Create) -> RecordsResult<()> {
        self.error = None;
        let result = self.client.create::<K>(input).await;
        self.after_mutation(result).await
    }

    pub async fn update(&mut self, id: i64, input: &K::Update) -> RecordsResult<()> {
        self.error = None;
        let result = self.client.update::<K>(id, input).await;
        self.after_mutation(result).await
    }

    pub async fn delete(&mut self, id: i64) -> RecordsResult<()> {
        self.error = None;
        let result = self.client.delete::<K>(id).await;
        self.after_mutation(result).await
    }

    async fn after_mutation(&mut self, result: RecordsResult<()>) -> RecordsResult<()> {
        if let Err(e) = result {
            self.error = Some(e.user_message());
            return Err(e);
        }
        if let Err(e) = self.refresh().await {
            debug!(kind = K::PLURAL, error = %e, "Reload after mutation failed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixture, Fixture};
    use crate::{TreatmentInput, Treatments};
    use serde_json::json;
    use session_client::Method;

    const LIST: &str = "/api/user/7/treatments";

    fn page_body(ids: &[i64], total: u64) -> serde_json::Value {
        json!({
            "treatments": ids
                .iter()
                .map(|id| json!({ "treatment_id": id, "treatment_name": format!("T{id}") }))
                .collect::<Vec<_>>(),
            "total_num_of_treatments": total,
            "total_pages": 2,
            "current_page": 1
        })
    }

    fn input() -> TreatmentInput {
        TreatmentInput {
            treatment_name: "Physio".to_string(),
            scheduled_on: None,
            notes: String::new(),
            is_completed: false,
        }
    }

    #[tokio::test]
    async fn test_refresh_loads_current_page() {
        let Fixture { transport, records } = fixture();
        transport.respond_json(Method::GET, LIST, 200, page_body(&[1, 2], 3));

        let mut collection = RecordCollection::<Treatments>::with_page_size(Arc::new(records), 2);
        collection.refresh().await.unwrap();

        assert_eq!(collection.items().len(), 2);
        assert_eq!(collection.total_count(), 3);
        assert_eq!(collection.total_pages(), 2);
        assert_eq!(collection.error(), None);
        assert!(transport.requests()[0].path.ends_with("?page=1&per_page=2"));
    }

    #[tokio::test]
    async fn test_set_page_applies_on_refresh() {
        let Fixture { transport, records } = fixture();
        transport.respond_json(Method::GET, LIST, 200, page_body(&[3], 3));

        let mut collection = RecordCollection::<Treatments>::with_page_size(Arc::new(records), 2);
        collection.set_page(2);
        collection.refresh().await.unwrap();

        assert_eq!(collection.page(), 2);
        assert!(transport.requests()[0].path.contains("page=2"));
    }

    #[tokio::test]
    async fn test_refresh_failure_records_error_and_keeps_items() {
        let Fixture { transport, records } = fixture();
        transport.respond_json(Method::GET, LIST, 200, page_body(&[1], 1));
        transport.respond_json(Method::GET, LIST, 500, json!({ "error": "db down" }));

        let mut collection = RecordCollection::<Treatments>::new(Arc::new(records));
        collection.refresh().await.unwrap();
        assert!(collection.refresh().await.is_err());

        assert_eq!(collection.error(), Some("db down"));
        assert_eq!(collection.items().len(), 1);
    }

    #[tokio::test]
    async fn test_create_reloads_after_success() {
        let Fixture { transport, records } = fixture();
        transport.respond_json(Method::POST, LIST, 201, json!({ "message": "created" }));
        transport.respond_json(Method::GET, LIST, 200, page_body(&[1], 1));

        let mut collection = RecordCollection::<Treatments>::new(Arc::new(records));
        collection.create(&input()).await.unwrap();

        assert_eq!(collection.items().len(), 1);
        let methods: Vec<Method> = transport.requests().into_iter().map(|r| r.method).collect();
        assert_eq!(methods, vec![Method::POST, Method::GET]);
    }

    #[tokio::test]
    async fn test_failed_mutation_records_message_and_skips_reload() {
        let Fixture { transport, records } = fixture();
        transport.respond_json(
            Method::DELETE,
            "/api/user/7/treatments/4",
            404,
            json!({ "error": "Treatment not found" }),
        );

        let mut collection = RecordCollection::<Treatments>::new(Arc::new(records));
        let result = collection.delete(4).await;

        assert!(result.is_err());
        assert_eq!(collection.error(), Some("Treatment not found"));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_mutation_succeeds_even_if_reload_fails() {
        let Fixture { transport, records } = fixture();
        transport.respond_json(Method::PATCH, "/api/user/7/treatments/1", 200, json!({}));
        transport.respond_json(Method::GET, LIST, 503, json!({}));

        let mut collection = RecordCollection::<Treatments>::new(Arc::new(records));
        collection
            .update(1, &crate::TreatmentUpdate::default())
            .await
            .unwrap();

        assert_eq!(collection.error(), Some("Failed to fetch treatments"));
    }
}

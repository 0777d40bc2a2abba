//! Page requests and the paged list envelope.

use crate::{RecordsError, RecordsResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Records requested per page unless configured otherwise.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// 1-based page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    /// Zero values are raised to 1.
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    pub(crate) fn query(&self) -> [(&'static str, String); 2] {
        [
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ]
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PER_PAGE)
    }
}

/// One page of records plus the server's totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub total_pages: u32,
    pub current_page: u32,
}

impl<T: DeserializeOwned> Page<T> {
    /// Read a list envelope. Missing totals count as 0, a missing current
    /// page as the requested one, a missing or null list as empty.
    pub(crate) fn from_envelope(
        body: &Value,
        list_key: &'static str,
        total_key: &'static str,
        requested: PageRequest,
    ) -> RecordsResult<Self> {
        let items = match body.get(list_key) {
            None | Some(Value::Null) => Vec::new(),
            Some(list) => serde_json::from_value(list.clone()).map_err(RecordsError::Json)?,
        };

        Ok(Self {
            items,
            total_count: body.get(total_key).and_then(Value::as_u64).unwrap_or(0),
            total_pages: read_u32(body, "total_pages").unwrap_or(0),
            current_page: read_u32(body, "current_page").unwrap_or(requested.page),
        })
    }
}

fn read_u32(body: &Value, key: &str) -> Option<u32> {
    body.get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_request_clamps_to_one() {
        assert_eq!(PageRequest::new(0, 0), PageRequest { page: 1, per_page: 1 });
        assert_eq!(PageRequest::default().per_page, DEFAULT_PER_PAGE);
    }

    #[test]
    fn test_envelope_with_totals() {
        let body = json!({
            "items": [1, 2],
            "total_items": 12,
            "total_pages": 6,
            "current_page": 2
        });

        let page: Page<u8> =
            Page::from_envelope(&body, "items", "total_items", PageRequest::new(2, 2)).unwrap();

        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.total_count, 12);
        assert_eq!(page.total_pages, 6);
        assert_eq!(page.current_page, 2);
    }

    #[test]
    fn test_envelope_defaults() {
        let body = json!({ "items": null });

        let page: Page<u8> =
            Page::from_envelope(&body, "items", "total_items", PageRequest::new(3, 20)).unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.current_page, 3);
    }

    #[test]
    fn test_envelope_rejects_wrong_item_shape() {
        let body = json!({ "items": ["x"] });
        let result: RecordsResult<Page<u8>> =
            Page::from_envelope(&body, "items", "total_items", PageRequest::default());
        assert!(matches!(result, Err(RecordsError::Json(_))));
    }
}

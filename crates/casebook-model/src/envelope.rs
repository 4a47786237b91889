//! Wire envelope returned by the backing API.
//!
//! Every endpoint answers with the same outer shape:
//!
//! ```text
//! { "success": true,  "data": [...], "pagination": { "page": 1, ... } }
//! { "success": true,  "data": { ...entity... } }
//! { "success": false, "error": "Title is required" }
//! ```
//!
//! `data` stays untyped until a resource asks for it through
//! [`Envelope::into_page`] or [`Envelope::into_entity`], which reject any
//! response that does not match the expected entity shape.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ModelError, Result};

/// Outer response shape shared by list and mutation endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Whether the backend accepted the request.
    pub success: bool,

    /// Entity or entity list, depending on the endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Backend error message when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Pagination metadata for list endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Pagination metadata for a list response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-based page number.
    pub page: u32,
    /// Items per page.
    pub limit: u32,
    /// Total matching items across all pages.
    pub total: u64,
    /// Number of pages at this limit.
    pub total_pages: u32,
    /// Whether a later page exists.
    pub has_more: bool,
}

impl Pagination {
    /// Adjust `total` after a local insert or removal.
    ///
    /// `total_pages` and `has_more` are recomputed from the new total so a
    /// view's pager stays consistent until the next read replaces it.
    pub fn adjust_total(&mut self, delta: i64) {
        self.total = self.total.saturating_add_signed(delta);
        if self.limit > 0 {
            let pages = self.total.div_ceil(u64::from(self.limit));
            self.total_pages = u32::try_from(pages).unwrap_or(u32::MAX);
            self.has_more = self.page < self.total_pages;
        }
    }
}

/// A typed page of entities.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<E> {
    /// Entities in server order.
    pub items: Vec<E>,
    /// Pagination metadata, if the backend sent any.
    pub pagination: Option<Pagination>,
}

impl Envelope {
    /// Build a successful envelope around `data`.
    #[must_use]
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            ..Default::default()
        }
    }

    /// Build a successful list envelope.
    #[must_use]
    pub fn list(data: Value, pagination: Pagination) -> Self {
        Self {
            success: true,
            data: Some(data),
            pagination: Some(pagination),
            error: None,
        }
    }

    /// Build a rejected envelope.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            ..Default::default()
        }
    }

    /// Parse a list response into typed entities.
    ///
    /// # Errors
    ///
    /// Fails when the backend rejected the request, when `data` is missing,
    /// or when any element does not match `E`.
    pub fn into_page<E: DeserializeOwned>(self, resource: &'static str) -> Result<Page<E>> {
        let pagination = self.pagination;
        let data = self.into_data(resource)?;
        let items = serde_json::from_value(data)
            .map_err(|source| ModelError::Malformed { resource, source })?;
        Ok(Page { items, pagination })
    }

    /// Parse a single-entity response.
    ///
    /// # Errors
    ///
    /// Same rules as [`Envelope::into_page`].
    pub fn into_entity<E: DeserializeOwned>(self, resource: &'static str) -> Result<E> {
        let data = self.into_data(resource)?;
        serde_json::from_value(data).map_err(|source| ModelError::Malformed { resource, source })
    }

    /// Check an acknowledgement that carries no entity (e.g. delete).
    ///
    /// # Errors
    ///
    /// Fails only when the backend rejected the request.
    pub fn into_ack(self) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(self.rejection())
        }
    }

    fn into_data(self, resource: &'static str) -> Result<Value> {
        if !self.success {
            return Err(self.rejection());
        }
        match self.data {
            Some(Value::Null) | None => Err(ModelError::MissingData { resource }),
            Some(data) => Ok(data),
        }
    }

    fn rejection(&self) -> ModelError {
        ModelError::Rejected {
            message: self
                .error
                .clone()
                .unwrap_or_else(|| "request was not accepted".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: String,
    }

    #[test]
    fn test_parses_camel_case_pagination() {
        let raw = json!({
            "success": true,
            "data": [{"id": "a"}],
            "pagination": {"page": 2, "limit": 10, "total": 11, "totalPages": 2, "hasMore": false}
        });
        let envelope: Envelope = serde_json::from_value(raw).unwrap();
        let page: Page<Row> = envelope.into_page("rows").unwrap();

        assert_eq!(page.items, vec![Row { id: "a".into() }]);
        let pagination = page.pagination.unwrap();
        assert_eq!(pagination.total_pages, 2);
        assert!(!pagination.has_more);
    }

    #[test]
    fn test_rejects_unsuccessful_envelope() {
        let err = Envelope::rejected("Title is required")
            .into_entity::<Row>("rows")
            .unwrap_err();
        assert!(matches!(err, ModelError::Rejected { ref message } if message == "Title is required"));
    }

    #[test]
    fn test_rejects_missing_data() {
        let envelope = Envelope {
            success: true,
            data: Some(Value::Null),
            ..Default::default()
        };
        assert!(matches!(
            envelope.into_page::<Row>("rows"),
            Err(ModelError::MissingData { resource: "rows" })
        ));
    }

    #[test]
    fn test_rejects_wrong_shape() {
        let envelope = Envelope::ok(json!({"id": 7}));
        assert!(matches!(
            envelope.into_entity::<Row>("rows"),
            Err(ModelError::Malformed { .. })
        ));

        let envelope = Envelope::ok(json!({"id": "a"}));
        assert!(envelope.into_page::<Row>("rows").is_err());
    }

    #[test]
    fn test_adjust_total_recomputes_pages() {
        let mut pagination = Pagination {
            page: 1,
            limit: 10,
            total: 10,
            total_pages: 1,
            has_more: false,
        };
        pagination.adjust_total(1);
        assert_eq!(pagination.total, 11);
        assert_eq!(pagination.total_pages, 2);
        assert!(pagination.has_more);

        pagination.adjust_total(-20);
        assert_eq!(pagination.total, 0);
        assert_eq!(pagination.total_pages, 0);
        assert!(!pagination.has_more);
    }
}

//! The transport boundary.
//!
//! The synchronization layer never talks HTTP itself. It builds a [`Request`]
//! and hands it to a [`Transport`], which must:
//!
//! - resolve to `Err(SyncError::Cancelled)` once the request's `signal` fires
//! - normalize every other failure into a [`SyncError`] kind
//! - otherwise return the backend's [`Envelope`] untouched

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use casebook_model::Envelope;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

/// HTTP verb of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Upper-case verb name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request handed to the transport.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP verb.
    pub method: Method,
    /// Collection path relative to the API base, e.g. `/api/tasks`.
    pub path: String,
    /// Entity id addressed under `path`, sent as one encoded path segment.
    pub item: Option<String>,
    /// Query-string pairs.
    pub query: Vec<(&'static str, String)>,
    /// JSON body for writes.
    pub body: Option<Value>,
    /// Abort signal. Only reads carry one; writes are never cancelled.
    pub signal: Option<CancellationToken>,
}

impl Request {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            item: None,
            query: Vec::new(),
            body: None,
            signal: None,
        }
    }

    /// `GET path`.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// `POST path` with a JSON body.
    #[must_use]
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            body: Some(body),
            ..Self::new(Method::Post, path)
        }
    }

    /// `PUT path` with a JSON body.
    #[must_use]
    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self {
            body: Some(body),
            ..Self::new(Method::Put, path)
        }
    }

    /// `DELETE path`.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Address one entity of the collection.
    #[must_use]
    pub fn with_item(mut self, id: impl Into<String>) -> Self {
        self.item = Some(id.into());
        self
    }

    /// Unencoded `path/item` for logs and matching.
    #[must_use]
    pub fn target(&self) -> String {
        match &self.item {
            Some(id) => format!("{}/{id}", self.path),
            None => self.path.clone(),
        }
    }

    /// Throttling key: verb plus collection, shared by every item in it.
    #[must_use]
    pub fn rate_key(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    /// Attach query-string pairs.
    #[must_use]
    pub fn with_query(mut self, query: Vec<(&'static str, String)>) -> Self {
        self.query = query;
        self
    }

    /// Attach an abort signal.
    #[must_use]
    pub fn with_signal(mut self, signal: CancellationToken) -> Self {
        self.signal = Some(signal);
        self
    }

    /// First value for `key` in the query string.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the abort signal has already fired.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.signal
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

/// Sends requests to the backing API.
///
/// `send` is called synchronously at dispatch time; the returned future owns
/// everything it needs so it can be spawned onto the runtime.
pub trait Transport: Send + Sync + 'static {
    /// Issue `request` and resolve to the backend envelope.
    fn send(&self, request: Request) -> impl Future<Output = Result<Envelope>> + Send + 'static;
}

impl<T: Transport> Transport for Arc<T> {
    fn send(&self, request: Request) -> impl Future<Output = Result<Envelope>> + Send + 'static {
        (**self).send(request)
    }
}

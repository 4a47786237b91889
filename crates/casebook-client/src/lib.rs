//! HTTP transport for the Casebook synchronization layer.
//!
//! [`HttpTransport`] implements [`casebook_sync::Transport`] on top of an
//! async `reqwest` client:
//!
//! - paths are joined onto the configured base URL and filter criteria
//!   become the query string
//! - a read's abort signal drops the in-flight HTTP request and resolves
//!   with [`SyncError::Cancelled`](casebook_sync::SyncError::Cancelled)
//! - statuses and transport failures are classified into [`ClientError`]
//!   and then normalized into the sync layer's error kinds
//! - an optional caller-owned [`RateLimiter`] throttles requests before
//!   they leave the process
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use casebook_client::{ClientConfig, HttpTransport, RateLimitConfig, RateLimiter};
//! use casebook_model::{TaskFilters, Tasks};
//! use casebook_sync::{QueryStore, SyncConfig};
//!
//! # async fn run() -> casebook_client::Result<()> {
//! let limiter = Arc::new(RateLimiter::new(RateLimitConfig::default()));
//! let transport = HttpTransport::new(&ClientConfig::with_base_url("https://casebook.example.org"))?
//!     .with_rate_limiter(limiter);
//! let store = QueryStore::<Tasks, _>::mount(transport, &SyncConfig::default(), TaskFilters::default());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod rate_limit;

pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use error::{ClientError, Result};
pub use http::HttpTransport;
pub use rate_limit::{RateLimitConfig, RateLimiter};

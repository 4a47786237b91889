//! Request synchronization for Casebook list views.
//!
//! A list view mounts a [`QueryStore`] for one resource and renders its
//! [`QueryState`]. The store keeps the rendered list consistent with the
//! latest user intent while requests overlap:
//!
//! - **Reads** are generation-gated. Each dispatch cancels the previous read,
//!   and only the most recently dispatched read may write state.
//! - **Search edits** are debounced through one timer per store; any other
//!   filter change dispatches immediately and cancels the pending timer.
//! - **Mutations** never take part in read cancellation. Creates dedup by id,
//!   updates replace in place, deletes remove optimistically.
//! - **Teardown** cancels the in-flight read exactly once and suppresses every
//!   later state write.
//!
//! The HTTP layer is abstracted behind [`Transport`]; `casebook-client`
//! provides the reqwest implementation.
//!
//! # Example
//!
//! ```ignore
//! use casebook_model::{TaskFilter, TaskFilters, TaskStatus, Tasks};
//! use casebook_sync::{QueryStore, SyncConfig};
//!
//! let store = QueryStore::<Tasks, _>::mount(transport, &SyncConfig::default(), TaskFilters::default());
//! store.set_filter(TaskFilter::Search("rent".into()));
//! store.set_filter(TaskFilter::Status(Some(TaskStatus::Todo)));
//! let mut rx = store.subscribe();
//! rx.changed().await?;
//! ```

pub mod config;
pub mod coordinator;
pub mod debounce;
pub mod error;
pub mod mutation;
pub mod state;
pub mod store;
pub mod transport;

pub use config::{DEFAULT_DEBOUNCE_MS, SyncConfig};
pub use coordinator::{CancellationHandle, FetchCoordinator, Generation, Ticket, Verdict};
pub use debounce::{Arm, DebounceScheduler, TimerPoll};
pub use error::{Result, SyncError};
pub use mutation::MutationDispatcher;
pub use state::QueryState;
pub use store::QueryStore;
pub use transport::{Method, Request, Transport};

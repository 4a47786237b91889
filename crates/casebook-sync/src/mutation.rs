//! Writes against a list resource.
//!
//! Mutations live outside the read cancellation lifecycle. Each one is
//! issued to the transport immediately, then awaited on its own spawned task,
//! so neither a newer read, a teardown, nor the caller dropping its future
//! can abort a write that is already on the wire. Results are applied in
//! arrival order with no generation check.

use std::future::Future;
use std::sync::Arc;

use casebook_model::{Entity, Resource};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, SyncError};
use crate::store::Shared;
use crate::transport::{Request, Transport};

/// Performs create/update/delete (and single-entity lookups) for one store.
///
/// Obtained from [`QueryStore::mutations`](crate::QueryStore::mutations).
/// Holding a dispatcher does not keep the store mounted.
pub struct MutationDispatcher<R: Resource, T: Transport> {
    shared: Arc<Shared<R, T>>,
}

impl<R: Resource, T: Transport> Clone for MutationDispatcher<R, T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<R: Resource, T: Transport> MutationDispatcher<R, T> {
    pub(crate) fn new(shared: Arc<Shared<R, T>>) -> Self {
        Self { shared }
    }

    /// Create an entity; on success prepend it, dropping any duplicate id.
    ///
    /// # Errors
    ///
    /// Returns the normalized error, which is also surfaced on the store.
    pub async fn create(&self, payload: R::Create) -> Result<R::Entity> {
        let body = encode(&payload)?;
        let call = self.shared.transport.send(Request::post(R::PATH, body));
        let shared = Arc::clone(&self.shared);

        detach(async move {
            let outcome = call
                .await
                .and_then(|envelope| envelope.into_entity::<R::Entity>(R::NAME).map_err(SyncError::from));
            match &outcome {
                Ok(entity) => {
                    let entity = entity.clone();
                    shared.write(|state| {
                        let is_new = state.prepend_unique(entity);
                        debug!(resource = R::NAME, is_new, "applied create");
                    });
                }
                Err(error) => shared.surface_error(error.clone()),
            }
            outcome
        })
        .await
    }

    /// Update an entity; on success replace it in place.
    ///
    /// Concurrent updates to the same id are all sent; whichever response
    /// resolves last is what the list shows.
    ///
    /// # Errors
    ///
    /// Returns the normalized error, which is also surfaced on the store.
    pub async fn update(&self, id: &str, patch: R::Patch) -> Result<R::Entity> {
        let body = encode(&patch)?;
        let call = self
            .shared
            .transport
            .send(Request::put(R::PATH, body).with_item(id));
        let shared = Arc::clone(&self.shared);

        detach(async move {
            let outcome = call
                .await
                .and_then(|envelope| envelope.into_entity::<R::Entity>(R::NAME).map_err(SyncError::from));
            match &outcome {
                Ok(entity) => {
                    let entity = entity.clone();
                    shared.write(|state| {
                        let id = entity.id().to_string();
                        if !state.replace(entity) {
                            debug!(resource = R::NAME, %id, "updated entity no longer listed");
                        }
                    });
                }
                Err(error) => shared.surface_error(error.clone()),
            }
            outcome
        })
        .await
    }

    /// Delete an entity.
    ///
    /// The id leaves the list before the request is sent. If the backend
    /// then fails the delete, the entity stays removed locally and the error
    /// is surfaced.
    ///
    /// # Errors
    ///
    /// Returns the normalized error.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.shared.write(|state| {
            if state.remove(id).is_none() {
                debug!(resource = R::NAME, id, "deleting an id that is not listed");
            }
        });

        let call = self.shared.transport.send(Request::delete(R::PATH).with_item(id));
        let shared = Arc::clone(&self.shared);
        let id = id.to_string();

        detach(async move {
            let outcome = call.await.and_then(|envelope| envelope.into_ack().map_err(SyncError::from));
            if let Err(error) = &outcome {
                warn!(resource = R::NAME, %id, "delete failed after optimistic removal");
                shared.surface_error(error.clone());
            }
            outcome
        })
        .await
    }

    /// Fetch one entity and refresh its cached copy in place.
    ///
    /// Not generation-gated: a detail lookup never competes with list reads.
    ///
    /// # Errors
    ///
    /// Returns the normalized error (typically [`SyncError::NotFound`]); the
    /// error is surfaced and the cached copy, if any, is kept.
    pub async fn fetch_one(&self, id: &str) -> Result<R::Entity> {
        let call = self.shared.transport.send(Request::get(R::PATH).with_item(id));
        let shared = Arc::clone(&self.shared);

        detach(async move {
            let outcome = call
                .await
                .and_then(|envelope| envelope.into_entity::<R::Entity>(R::NAME).map_err(SyncError::from));
            match &outcome {
                Ok(entity) => {
                    let entity = entity.clone();
                    shared.write(|state| {
                        state.replace(entity);
                    });
                }
                Err(error) => shared.surface_error(error.clone()),
            }
            outcome
        })
        .await
    }
}

fn encode<P: serde::Serialize>(payload: &P) -> Result<Value> {
    Ok(serde_json::to_value(payload)?)
}

/// Run `work` on its own task so dropping the caller does not abort it.
async fn detach<F, O>(work: F) -> Result<O>
where
    F: Future<Output = Result<O>> + Send + 'static,
    O: Send + 'static,
{
    tokio::spawn(work)
        .await
        .map_err(|e| SyncError::Network(format!("mutation task failed: {e}")))?
}

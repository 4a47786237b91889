//! The entity and resource traits.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::criteria::Criteria;

/// A row in a list view, identified by a backend-assigned id.
pub trait Entity: Clone + fmt::Debug + DeserializeOwned + Send + Sync + 'static {
    /// Stable identifier used for dedup, replace and remove.
    fn id(&self) -> &str;
}

/// A list-backed resource exposed by the backing API.
///
/// Ties together the entity type, its filter criteria, the create/patch
/// payloads, and the collection path. The request-synchronization layer is
/// generic over this trait, so one implementation serves every view.
pub trait Resource: Send + Sync + 'static {
    /// Row type.
    type Entity: Entity;
    /// Filter criteria for list reads.
    type Criteria: Criteria;
    /// Body of a create request.
    type Create: Serialize + fmt::Debug + Send + Sync + 'static;
    /// Body of an update request.
    type Patch: Serialize + fmt::Debug + Send + Sync + 'static;

    /// Short name for logs and error messages.
    const NAME: &'static str;

    /// Collection path, e.g. `/api/tasks`.
    ///
    /// A single entity lives one path segment below it; the transport
    /// encodes the id so it can never leave the collection.
    const PATH: &'static str;
}

//! Observable state of one list resource.

use casebook_model::{Entity, Page, Pagination};

use crate::error::SyncError;

/// The tuple a view renders: items, loading flag, error banner, pager.
///
/// `items` is the list snapshot: the last confirmed result of a non-stale
/// read, plus any mutation reconciliation since. `error` is independent of
/// `items`; a view may show cached rows under a fresh error.
#[derive(Debug, Clone)]
pub struct QueryState<E> {
    /// Entities in display order, unique by id.
    pub items: Vec<E>,
    /// Whether the current generation's read is still outstanding.
    pub loading: bool,
    /// Last surfaced failure.
    pub error: Option<SyncError>,
    /// Pager metadata from the last applied read.
    pub pagination: Option<Pagination>,
}

impl<E> Default for QueryState<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            pagination: None,
        }
    }
}

impl<E: Entity> QueryState<E> {
    /// Whether the backend reported a later page.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.pagination.is_some_and(|p| p.has_more)
    }

    /// Look up a cached entity.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&E> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Whether `id` is in the snapshot.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Replace the snapshot with a freshly read page.
    pub(crate) fn apply_page(&mut self, page: Page<E>) {
        self.items = page.items;
        self.pagination = page.pagination;
        self.loading = false;
        self.error = None;
    }

    /// Put a created entity at the front, dropping any copy a concurrent read
    /// already brought in. Returns `true` if the id was new to the snapshot.
    pub(crate) fn prepend_unique(&mut self, entity: E) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != entity.id());
        let is_new = self.items.len() == before;
        self.items.insert(0, entity);
        if is_new && let Some(pagination) = self.pagination.as_mut() {
            pagination.adjust_total(1);
        }
        is_new
    }

    /// Swap in an updated entity at its current position.
    ///
    /// Returns `false` if the id is no longer in the snapshot; the entity is
    /// not inserted in that case.
    pub(crate) fn replace(&mut self, entity: E) -> bool {
        match self.items.iter_mut().find(|item| item.id() == entity.id()) {
            Some(slot) => {
                *slot = entity;
                true
            }
            None => false,
        }
    }

    /// Remove an entity by id, returning it if it was present.
    pub(crate) fn remove(&mut self, id: &str) -> Option<E> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        let removed = self.items.remove(index);
        if let Some(pagination) = self.pagination.as_mut() {
            pagination.adjust_total(-1);
        }
        Some(removed)
    }
}

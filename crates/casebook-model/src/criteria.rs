//! Filter criteria shared by every list resource.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default page size requested by list views.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upper bound the backing API accepts for `limit`.
pub const MAX_PAGE_SIZE: u32 = 100;

/// How a change to a criteria field is scheduled.
///
/// Free-text search is debounced; everything else (status, category, page)
/// dispatches immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldClass {
    /// Collapsed into one delayed dispatch per debounce window.
    Debounced,
    /// Dispatched synchronously.
    Immediate,
}

impl FieldClass {
    /// Combine the classes of several field changes in one partial update.
    ///
    /// Any immediate change makes the whole update immediate.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        self.max(other)
    }
}

/// Filter criteria for one list resource.
///
/// Values are compared with `PartialEq` to decide whether a new dispatch is
/// warranted, so implementations must compare every field that reaches the
/// query string.
pub trait Criteria: Clone + fmt::Debug + PartialEq + Default + Send + Sync + 'static {
    /// A single-field edit, e.g. "set search to `abc`" or "go to page 3".
    type Update: fmt::Debug + Send + 'static;

    /// Apply one field edit.
    ///
    /// Returns the class of the edited field, or `None` when the edit left
    /// the criteria unchanged.
    fn apply(&mut self, update: Self::Update) -> Option<FieldClass>;

    /// Query-string pairs for the list request.
    fn query_pairs(&self) -> Vec<(&'static str, String)>;
}

/// Page/limit cursor embedded in every resource's criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageCursor {
    /// 1-based page number.
    pub page: u32,
    /// Items per page.
    pub limit: u32,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageCursor {
    /// Move to `page` (clamped to 1). Returns `true` if the page changed.
    pub fn go_to(&mut self, page: u32) -> bool {
        let page = page.max(1);
        replace_if_changed(&mut self.page, page)
    }

    /// Change the page size (clamped to `1..=MAX_PAGE_SIZE`) and return to
    /// the first page. Returns `true` if anything changed.
    pub fn set_limit(&mut self, limit: u32) -> bool {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let changed = replace_if_changed(&mut self.limit, limit);
        if changed {
            self.page = 1;
        }
        changed
    }

    /// Return to the first page after a predicate change.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Append `page` and `limit` to a query.
    pub fn push_pairs(&self, pairs: &mut Vec<(&'static str, String)>) {
        pairs.push(("page", self.page.to_string()));
        pairs.push(("limit", self.limit.to_string()));
    }
}

/// Assign `value` to `slot`, reporting whether it differed.
///
/// Used by criteria implementations so that a no-op edit never triggers a
/// dispatch.
pub fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

/// Apply a predicate-field edit: on change, reset the cursor and report `class`.
pub fn apply_predicate<T: PartialEq>(
    slot: &mut T,
    value: T,
    cursor: &mut PageCursor,
    class: FieldClass,
) -> Option<FieldClass> {
    if replace_if_changed(slot, value) {
        cursor.reset();
        Some(class)
    } else {
        None
    }
}

/// Apply a search edit. The text is stored trimmed, so edits that only add
/// or remove surrounding whitespace are not a change.
pub fn apply_search(slot: &mut String, text: &str, cursor: &mut PageCursor) -> Option<FieldClass> {
    apply_predicate(slot, text.trim().to_string(), cursor, FieldClass::Debounced)
}

/// Push `search` when the trimmed text is non-empty.
pub fn push_search(pairs: &mut Vec<(&'static str, String)>, search: &str) {
    let search = search.trim();
    if !search.is_empty() {
        pairs.push(("search", search.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_immediate() {
        assert_eq!(
            FieldClass::Debounced.merge(FieldClass::Immediate),
            FieldClass::Immediate
        );
        assert_eq!(
            FieldClass::Debounced.merge(FieldClass::Debounced),
            FieldClass::Debounced
        );
    }

    #[test]
    fn test_cursor_clamps() {
        let mut cursor = PageCursor::default();
        assert!(!cursor.go_to(0));
        assert_eq!(cursor.page, 1);

        assert!(cursor.go_to(4));
        assert!(cursor.set_limit(500));
        assert_eq!(cursor.limit, MAX_PAGE_SIZE);
        assert_eq!(cursor.page, 1);
    }

    #[test]
    fn test_apply_predicate_resets_page() {
        let mut cursor = PageCursor::default();
        cursor.go_to(3);
        let mut status = None::<u8>;

        assert_eq!(
            apply_predicate(&mut status, Some(1), &mut cursor, FieldClass::Immediate),
            Some(FieldClass::Immediate)
        );
        assert_eq!(cursor.page, 1);

        cursor.go_to(2);
        assert_eq!(
            apply_predicate(&mut status, Some(1), &mut cursor, FieldClass::Immediate),
            None
        );
        assert_eq!(cursor.page, 2);
    }

    #[test]
    fn test_whitespace_only_search_edit_is_no_change() {
        let mut cursor = PageCursor::default();
        let mut search = String::new();

        assert_eq!(
            apply_search(&mut search, "rent", &mut cursor),
            Some(FieldClass::Debounced)
        );
        assert_eq!(apply_search(&mut search, "rent ", &mut cursor), None);
        assert_eq!(apply_search(&mut search, "  rent", &mut cursor), None);
        assert_eq!(search, "rent");

        assert_eq!(apply_search(&mut search, "   ", &mut cursor), Some(FieldClass::Debounced));
        assert!(search.is_empty());
    }

    #[test]
    fn test_push_search_skips_blank() {
        let mut pairs = Vec::new();
        push_search(&mut pairs, "   ");
        assert!(pairs.is_empty());

        push_search(&mut pairs, " smith ");
        assert_eq!(pairs, vec![("search", "smith".to_string())]);
    }
}

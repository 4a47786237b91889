//! Ledger entries behind the financial dashboard (`/api/financial-entries`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::criteria::{Criteria, FieldClass, PageCursor, apply_predicate, apply_search, push_search};
use crate::resource::{Entity, Resource};

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Income,
    Expense,
}

impl EntryType {
    /// Wire value used in query strings.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

/// One income or expense line. Amounts are integer cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialEntry {
    pub id: String,
    pub label: String,
    pub entry_type: EntryType,
    pub amount_cents: i64,
    #[serde(default)]
    pub category: Option<String>,
    /// Reporting period, e.g. `2026-Q3`.
    pub period: String,
    #[serde(default)]
    pub booked_on: Option<NaiveDate>,
}

impl FinancialEntry {
    /// Amount with income positive and expenses negative.
    #[must_use]
    pub fn signed_cents(&self) -> i64 {
        match self.entry_type {
            EntryType::Income => self.amount_cents,
            EntryType::Expense => -self.amount_cents,
        }
    }
}

impl Entity for FinancialEntry {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinancialFilters {
    pub search: String,
    pub entry_type: Option<EntryType>,
    pub category: Option<String>,
    pub period: Option<String>,
    pub cursor: PageCursor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinancialFilter {
    Search(String),
    EntryType(Option<EntryType>),
    Category(Option<String>),
    Period(Option<String>),
    Page(u32),
    Limit(u32),
}

impl Criteria for FinancialFilters {
    type Update = FinancialFilter;

    fn apply(&mut self, update: FinancialFilter) -> Option<FieldClass> {
        let cursor = &mut self.cursor;
        match update {
            FinancialFilter::Search(text) => {
                apply_search(&mut self.search, &text, cursor)
            }
            FinancialFilter::EntryType(kind) => {
                apply_predicate(&mut self.entry_type, kind, cursor, FieldClass::Immediate)
            }
            FinancialFilter::Category(category) => {
                apply_predicate(&mut self.category, category, cursor, FieldClass::Immediate)
            }
            FinancialFilter::Period(period) => {
                apply_predicate(&mut self.period, period, cursor, FieldClass::Immediate)
            }
            FinancialFilter::Page(page) => cursor.go_to(page).then_some(FieldClass::Immediate),
            FinancialFilter::Limit(limit) => {
                cursor.set_limit(limit).then_some(FieldClass::Immediate)
            }
        }
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_search(&mut pairs, &self.search);
        if let Some(kind) = self.entry_type {
            pairs.push(("type", kind.as_str().to_string()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(period) = &self.period {
            pairs.push(("period", period.clone()));
        }
        self.cursor.push_pairs(&mut pairs);
        pairs
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFinancialEntry {
    pub label: String,
    pub entry_type: EntryType,
    pub amount_cents: i64,
    pub period: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booked_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialEntryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// The financial-entry list resource.
#[derive(Debug, Clone, Copy)]
pub struct FinancialEntries;

impl Resource for FinancialEntries {
    type Entity = FinancialEntry;
    type Criteria = FinancialFilters;
    type Create = NewFinancialEntry;
    type Patch = FinancialEntryPatch;

    const NAME: &'static str = "financial-entries";
    const PATH: &'static str = "/api/financial-entries";
}

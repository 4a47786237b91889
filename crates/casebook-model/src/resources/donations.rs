//! Donation intake (`/api/donations`).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::criteria::{Criteria, FieldClass, PageCursor, apply_predicate, apply_search, push_search};
use crate::resource::{Entity, Resource};

/// What was donated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationKind {
    Cash,
    InKind,
    Pledge,
}

impl DonationKind {
    /// Wire value used in query strings.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::InKind => "in_kind",
            Self::Pledge => "pledge",
        }
    }
}

/// A recorded donation. Amounts are integer cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: String,
    pub donor_name: String,
    pub kind: DonationKind,
    pub amount_cents: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub campaign: Option<String>,
    #[serde(default)]
    pub received_on: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Entity for Donation {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Filter criteria for the donations ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DonationFilters {
    pub search: String,
    pub kind: Option<DonationKind>,
    pub campaign: Option<String>,
    pub cursor: PageCursor,
}

/// One edit to [`DonationFilters`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DonationFilter {
    Search(String),
    Kind(Option<DonationKind>),
    Campaign(Option<String>),
    Page(u32),
    Limit(u32),
}

impl Criteria for DonationFilters {
    type Update = DonationFilter;

    fn apply(&mut self, update: DonationFilter) -> Option<FieldClass> {
        let cursor = &mut self.cursor;
        match update {
            DonationFilter::Search(text) => {
                apply_search(&mut self.search, &text, cursor)
            }
            DonationFilter::Kind(kind) => {
                apply_predicate(&mut self.kind, kind, cursor, FieldClass::Immediate)
            }
            DonationFilter::Campaign(campaign) => {
                apply_predicate(&mut self.campaign, campaign, cursor, FieldClass::Immediate)
            }
            DonationFilter::Page(page) => cursor.go_to(page).then_some(FieldClass::Immediate),
            DonationFilter::Limit(limit) => {
                cursor.set_limit(limit).then_some(FieldClass::Immediate)
            }
        }
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_search(&mut pairs, &self.search);
        if let Some(kind) = self.kind {
            pairs.push(("kind", kind.as_str().to_string()));
        }
        if let Some(campaign) = &self.campaign {
            pairs.push(("campaign", campaign.clone()));
        }
        self.cursor.push_pairs(&mut pairs);
        pairs
    }
}

/// Body of `POST /api/donations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDonation {
    pub donor_name: String,
    pub kind: DonationKind,
    pub amount_cents: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `PUT /api/donations/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The donations list resource.
#[derive(Debug, Clone, Copy)]
pub struct Donations;

impl Resource for Donations {
    type Entity = Donation;
    type Criteria = DonationFilters;
    type Create = NewDonation;
    type Patch = DonationPatch;

    const NAME: &'static str = "donations";
    const PATH: &'static str = "/api/donations";
}

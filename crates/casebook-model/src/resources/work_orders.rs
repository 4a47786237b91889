//! Facilities work orders (`/api/work-orders`).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::criteria::{Criteria, FieldClass, PageCursor, apply_predicate, apply_search, push_search};
use crate::resource::{Entity, Resource};
use crate::resources::tasks::TaskPriority;

/// Lifecycle of a work order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderStatus {
    Open,
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl WorkOrderStatus {
    /// Wire value used in query strings.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    pub id: String,
    pub title: String,
    pub status: WorkOrderStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub assigned_team: Option<String>,
    #[serde(default)]
    pub scheduled_for: Option<NaiveDate>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for WorkOrder {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkOrderFilters {
    pub search: String,
    pub status: Option<WorkOrderStatus>,
    pub priority: Option<TaskPriority>,
    pub site: Option<String>,
    pub cursor: PageCursor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkOrderFilter {
    Search(String),
    Status(Option<WorkOrderStatus>),
    Priority(Option<TaskPriority>),
    Site(Option<String>),
    Page(u32),
    Limit(u32),
}

impl Criteria for WorkOrderFilters {
    type Update = WorkOrderFilter;

    fn apply(&mut self, update: WorkOrderFilter) -> Option<FieldClass> {
        let cursor = &mut self.cursor;
        match update {
            WorkOrderFilter::Search(text) => {
                apply_search(&mut self.search, &text, cursor)
            }
            WorkOrderFilter::Status(status) => {
                apply_predicate(&mut self.status, status, cursor, FieldClass::Immediate)
            }
            WorkOrderFilter::Priority(priority) => {
                apply_predicate(&mut self.priority, priority, cursor, FieldClass::Immediate)
            }
            WorkOrderFilter::Site(site) => {
                apply_predicate(&mut self.site, site, cursor, FieldClass::Immediate)
            }
            WorkOrderFilter::Page(page) => cursor.go_to(page).then_some(FieldClass::Immediate),
            WorkOrderFilter::Limit(limit) => {
                cursor.set_limit(limit).then_some(FieldClass::Immediate)
            }
        }
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_search(&mut pairs, &self.search);
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(priority) = self.priority {
            pairs.push(("priority", priority.as_str().to_string()));
        }
        if let Some(site) = &self.site {
            pairs.push(("site", site.clone()));
        }
        self.cursor.push_pairs(&mut pairs);
        pairs
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkOrder {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WorkOrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<NaiveDate>,
}

/// The work-order list resource.
#[derive(Debug, Clone, Copy)]
pub struct WorkOrders;

impl Resource for WorkOrders {
    type Entity = WorkOrder;
    type Criteria = WorkOrderFilters;
    type Create = NewWorkOrder;
    type Patch = WorkOrderPatch;

    const NAME: &'static str = "work-orders";
    const PATH: &'static str = "/api/work-orders";
}

//! Staff tasks (`/api/tasks`).

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::criteria::{Criteria, FieldClass, PageCursor, apply_predicate, apply_search, push_search};
use crate::resource::{Entity, Resource};

/// Workflow state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started.
    Todo,
    /// Being worked on.
    InProgress,
    /// Finished.
    Done,
}

impl TaskStatus {
    /// Wire value used in query strings.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Can wait.
    Low,
    /// Normal.
    #[default]
    Medium,
    /// Needs attention first.
    High,
}

impl TaskPriority {
    /// Wire value used in query strings.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A staff task, optionally tied to a household.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub assignee_id: Option<String>,
    #[serde(default)]
    pub household_id: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Task {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Filter criteria for the task board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilters {
    pub search: String,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub category: Option<String>,
    pub assignee_id: Option<String>,
    pub cursor: PageCursor,
}

/// One edit to [`TaskFilters`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskFilter {
    Search(String),
    Status(Option<TaskStatus>),
    Priority(Option<TaskPriority>),
    Category(Option<String>),
    Assignee(Option<String>),
    Page(u32),
    Limit(u32),
}

impl Criteria for TaskFilters {
    type Update = TaskFilter;

    fn apply(&mut self, update: TaskFilter) -> Option<FieldClass> {
        let cursor = &mut self.cursor;
        match update {
            TaskFilter::Search(text) => {
                apply_search(&mut self.search, &text, cursor)
            }
            TaskFilter::Status(status) => {
                apply_predicate(&mut self.status, status, cursor, FieldClass::Immediate)
            }
            TaskFilter::Priority(priority) => {
                apply_predicate(&mut self.priority, priority, cursor, FieldClass::Immediate)
            }
            TaskFilter::Category(category) => {
                apply_predicate(&mut self.category, category, cursor, FieldClass::Immediate)
            }
            TaskFilter::Assignee(assignee) => {
                apply_predicate(&mut self.assignee_id, assignee, cursor, FieldClass::Immediate)
            }
            TaskFilter::Page(page) => cursor.go_to(page).then_some(FieldClass::Immediate),
            TaskFilter::Limit(limit) => cursor.set_limit(limit).then_some(FieldClass::Immediate),
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
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(assignee) = &self.assignee_id {
            pairs.push(("assigneeId", assignee.clone()));
        }
        self.cursor.push_pairs(&mut pairs);
        pairs
    }
}

/// Body of `POST /api/tasks`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub household_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl NewTask {
    /// A task with just a title; everything else uses backend defaults.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Body of `PUT /api/tasks/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// The task list resource.
#[derive(Debug, Clone, Copy)]
pub struct Tasks;

impl Resource for Tasks {
    type Entity = Task;
    type Criteria = TaskFilters;
    type Create = NewTask;
    type Patch = TaskPatch;

    const NAME: &'static str = "tasks";
    const PATH: &'static str = "/api/tasks";
}

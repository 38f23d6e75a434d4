//! Domain types for the todo list.
//!
//! # Design
//! `TodoItem` is the stored record. Writes go through two narrower shapes:
//! `NewTodo` (validated input for an insert) and `TodoChanges` (a partial
//! update where `None` leaves a field alone). `TodoForm` is the raw,
//! untrusted form submission; only the service turns it into the others.

use std::fmt;

use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Format used for due dates on the wire and in storage.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single stored todo entry.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TodoItem {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub is_resolved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TodoItem {
    /// True when the item is still open and its due date lies before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_resolved && self.due_date.is_some_and(|due| due < today)
    }
}

impl fmt::Display for TodoItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// A validated item ready to be inserted. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
}

/// Partial update applied by `TodoStore::update`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    /// `Some(None)` clears the due date.
    pub due_date: Option<Option<NaiveDate>>,
    pub is_resolved: Option<bool>,
}

impl TodoChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.is_resolved.is_none()
    }

    pub(crate) fn apply(self, item: &mut TodoItem) {
        if let Some(title) = self.title {
            item.title = title;
        }
        if let Some(description) = self.description {
            item.description = description;
        }
        if let Some(due_date) = self.due_date {
            item.due_date = due_date;
        }
        if let Some(is_resolved) = self.is_resolved {
            item.is_resolved = is_resolved;
        }
    }
}

/// Raw create/edit form submission. Every field may be missing or blank.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoForm {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
}

impl TodoForm {
    pub fn new(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date.format(DATE_FORMAT).to_string());
        self
    }

    /// Pre-fills an edit form from a stored record.
    pub fn from_item(item: &TodoItem) -> Self {
        Self {
            title: Some(item.title.clone()),
            description: Some(item.description.clone()),
            due_date: item.due_date.map(|d| d.format(DATE_FORMAT).to_string()),
        }
    }
}

/// Current time at the precision both stores can round-trip.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Next `updated_at` for a mutation: the current time, but never at or before
/// the previous stamp.
pub(crate) fn next_update_stamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = now();
    if now > previous {
        now
    } else {
        previous + chrono::Duration::microseconds(1)
    }
}

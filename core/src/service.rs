//! Validation and normalization in front of a `TodoStore`.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{Result, ValidationErrors};
use crate::store::TodoStore;
use crate::types::{NewTodo, TodoChanges, TodoForm, TodoItem, DATE_FORMAT};

pub const TITLE_MAX_CHARS: usize = 200;

const REQUIRED: &str = "This field is required.";
const INVALID_DATE: &str = "Enter a valid date.";

/// Entry point for every todo operation. Clones share the same store.
#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
}

impl TodoService {
    pub fn new(store: impl TodoStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub async fn list(&self) -> Result<Vec<TodoItem>> {
        self.store.list_all().await
    }

    pub async fn get(&self, id: i64) -> Result<TodoItem> {
        self.store.get(id).await
    }

    pub async fn create(&self, form: &TodoForm) -> Result<TodoItem> {
        let new = validate(form)?;
        let item = self.store.insert(new).await?;
        info!(id = item.id, "created todo");
        Ok(item)
    }

    /// Replaces title, description and due date. Resolution state is untouched.
    pub async fn update(&self, id: i64, form: &TodoForm) -> Result<TodoItem> {
        self.store.get(id).await?;
        let new = validate(form)?;
        let changes = TodoChanges {
            title: Some(new.title),
            description: Some(new.description),
            due_date: Some(new.due_date),
            is_resolved: None,
        };
        let item = self.store.update(id, changes).await?;
        info!(id, "updated todo");
        Ok(item)
    }

    pub async fn toggle_resolved(&self, id: i64) -> Result<TodoItem> {
        let item = self.store.toggle_resolved(id).await?;
        info!(id, is_resolved = item.is_resolved, "toggled todo");
        Ok(item)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.store.delete(id).await?;
        info!(id, "deleted todo");
        Ok(())
    }
}

/// Turns raw form input into a `NewTodo`, collecting every field error first.
pub fn validate(form: &TodoForm) -> Result<NewTodo> {
    let mut errors = ValidationErrors::new();

    let title = non_blank(form.title.as_deref()).unwrap_or_default();
    if title.is_empty() {
        errors.add("title", REQUIRED);
    } else if title.chars().count() > TITLE_MAX_CHARS {
        errors.add(
            "title",
            format!(
                "Ensure this value has at most {TITLE_MAX_CHARS} characters (it has {}).",
                title.chars().count()
            ),
        );
    }

    let due_date = match non_blank(form.due_date.as_deref()) {
        None => None,
        Some(raw) => match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                errors.add("due_date", INVALID_DATE);
                None
            }
        },
    };

    if !errors.is_empty() {
        debug!(%errors, "rejected todo form");
    }
    errors.into_result()?;

    Ok(NewTodo {
        title: title.to_string(),
        description: non_blank(form.description.as_deref())
            .unwrap_or_default()
            .to_string(),
        due_date,
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

//! Error types for the todo store and service.
//!
//! # Design
//! `NotFound` and `Validation` are the two outcomes callers are expected to
//! handle: the first becomes a 404, the second re-renders a form. The storage
//! variants are terminal and only ever logged.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TodoError>;

#[derive(Debug, Error)]
pub enum TodoError {
    /// No record with this id exists (or it has been deleted).
    #[error("todo {0} not found")]
    NotFound(i64),

    #[error("invalid input: {0}")]
    Validation(ValidationErrors),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be decoded into a `TodoItem`.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Field name to error messages, in field-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// `Ok(())` when nothing was recorded, otherwise a `TodoError::Validation`.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(TodoError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_errors_are_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn errors_collect_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "This field is required.");
        errors.add("due_date", "Enter a valid date.");
        errors.add("title", "second");

        assert_eq!(errors.get("title").len(), 2);
        assert_eq!(errors.get("description"), &[] as &[String]);
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["due_date", "title"]);

        let err = errors.into_result().unwrap_err();
        assert!(matches!(err, TodoError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "invalid input: due_date: Enter a valid date.; title: This field is required.; title: second"
        );
    }

    #[test]
    fn not_found_display() {
        assert_eq!(TodoError::NotFound(9999).to_string(), "todo 9999 not found");
    }

    #[test]
    fn validation_errors_serialize_as_a_map() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "This field is required.");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["title"][0], "This field is required.");
    }
}

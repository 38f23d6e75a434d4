//! Persistence for todo items.
//!
//! # Design
//! `TodoStore` is the id → `TodoItem` mapping. Backends own id assignment and
//! timestamps; callers only ever hand in validated data. Every method touches
//! exactly one record, so a backend needs nothing beyond single-statement
//! atomicity.
//!
//! Both backends list newest-first (by `created_at`, then by `id`) and never
//! reissue the id of a deleted record.

mod memory;
mod sqlite;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{NewTodo, TodoChanges, TodoItem};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Assigns an id, stamps `created_at == updated_at`, and persists.
    async fn insert(&self, new: NewTodo) -> Result<TodoItem>;

    async fn get(&self, id: i64) -> Result<TodoItem>;

    async fn list_all(&self) -> Result<Vec<TodoItem>>;

    /// Applies `changes` and refreshes `updated_at`, even when `changes` is empty.
    async fn update(&self, id: i64, changes: TodoChanges) -> Result<TodoItem>;

    /// Flips `is_resolved` in a single write and refreshes `updated_at`.
    async fn toggle_resolved(&self, id: i64) -> Result<TodoItem>;

    async fn delete(&self, id: i64) -> Result<()>;
}

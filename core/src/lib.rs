//! Storage and validation core for the todo list.
//!
//! # Overview
//! A `TodoStore` maps ids to `TodoItem` records; `MemoryStore` keeps them in
//! process, `SqliteStore` on disk. `TodoService` sits in front of a store,
//! turning raw `TodoForm` input into validated writes. Nothing here knows
//! about HTTP.
//!
//! # Design
//! - The only failures callers act on are `TodoError::NotFound` and
//!   `TodoError::Validation`; everything else is a storage fault.
//! - Each operation touches one record, so backends rely on single-statement
//!   (or single-transaction) atomicity and no extra locking.

pub mod error;
pub mod service;
pub mod store;
pub mod types;

pub use error::{Result, TodoError, ValidationErrors};
pub use service::TodoService;
pub use store::{MemoryStore, SqliteStore, TodoStore};
pub use types::{NewTodo, TodoChanges, TodoForm, TodoItem};

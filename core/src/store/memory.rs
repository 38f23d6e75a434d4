use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::TodoStore;
use crate::error::{Result, TodoError};
use crate::types::{self, NewTodo, TodoChanges, TodoItem};

/// In-process store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Table>,
}

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, TodoItem>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn insert(&self, new: NewTodo) -> Result<TodoItem> {
        let mut table = self.inner.write().await;
        table.last_id += 1;
        let stamp = types::now();
        let item = TodoItem {
            id: table.last_id,
            title: new.title,
            description: new.description,
            due_date: new.due_date,
            is_resolved: false,
            created_at: stamp,
            updated_at: stamp,
        };
        table.rows.insert(item.id, item.clone());
        Ok(item)
    }

    async fn get(&self, id: i64) -> Result<TodoItem> {
        let table = self.inner.read().await;
        table.rows.get(&id).cloned().ok_or(TodoError::NotFound(id))
    }

    async fn list_all(&self) -> Result<Vec<TodoItem>> {
        let table = self.inner.read().await;
        let mut items: Vec<TodoItem> = table.rows.values().cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(items)
    }

    async fn update(&self, id: i64, changes: TodoChanges) -> Result<TodoItem> {
        let mut table = self.inner.write().await;
        let item = table.rows.get_mut(&id).ok_or(TodoError::NotFound(id))?;
        changes.apply(item);
        item.updated_at = types::next_update_stamp(item.updated_at);
        Ok(item.clone())
    }

    async fn toggle_resolved(&self, id: i64) -> Result<TodoItem> {
        let mut table = self.inner.write().await;
        let item = table.rows.get_mut(&id).ok_or(TodoError::NotFound(id))?;
        item.is_resolved = !item.is_resolved;
        item.updated_at = types::next_update_stamp(item.updated_at);
        Ok(item.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut table = self.inner.write().await;
        table
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(TodoError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_todo(title: &str) -> NewTodo {
        NewTodo {
            title: title.to_string(),
            description: String::new(),
            due_date: None,
        }
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = MemoryStore::new();
        let first = store.insert(new_todo("first")).await.unwrap();
        store.delete(first.id).await.unwrap();
        let second = store.insert(new_todo("second")).await.unwrap();
        assert!(second.id > first.id);
        assert!(matches!(
            store.get(first.id).await,
            Err(TodoError::NotFound(id)) if id == first.id
        ));
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = MemoryStore::new();
        let a = store.insert(new_todo("a")).await.unwrap();
        let b = store.insert(new_todo("b")).await.unwrap();
        let ids: Vec<i64> = store.list_all().await.unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }
}

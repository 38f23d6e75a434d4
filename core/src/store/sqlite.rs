use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use super::TodoStore;
use crate::error::{Result, TodoError};
use crate::types::{self, NewTodo, TodoChanges, TodoItem, DATE_FORMAT};

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS todo_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL CHECK (length(title) > 0),
    description TEXT NOT NULL DEFAULT '',
    due_date TEXT,
    is_resolved INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
)";

const COLUMNS: &str = "id, title, description, due_date, is_resolved, created_at, updated_at";

const MAX_CONNECTIONS: u32 = 5;

/// Durable store backed by a SQLite database.
///
/// Timestamps are stored as microseconds since the epoch and due dates as
/// `YYYY-MM-DD` text.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if needed) the database file at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                TodoError::Storage(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;
        Self::with_pool(pool).await
    }

    /// Connects using a `sqlite:` URL. In-memory databases get a single,
    /// never-recycled connection so every query sees the same data.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(MAX_CONNECTIONS)
        }
        .connect_with(options)
        .await?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::query(SCHEMA).execute(&pool).await?;
        debug!("sqlite schema ready");
        Ok(Self { pool })
    }
}

#[async_trait]
impl TodoStore for SqliteStore {
    async fn insert(&self, new: NewTodo) -> Result<TodoItem> {
        let stamp = types::now();
        let result = sqlx::query(
            "INSERT INTO todo_items (title, description, due_date, is_resolved, created_at, updated_at) \
             VALUES (?, ?, ?, 0, ?, ?)",
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.due_date.map(format_date))
        .bind(stamp.timestamp_micros())
        .bind(stamp.timestamp_micros())
        .execute(&self.pool)
        .await?;

        Ok(TodoItem {
            id: result.last_insert_rowid(),
            title: new.title,
            description: new.description,
            due_date: new.due_date,
            is_resolved: false,
            created_at: stamp,
            updated_at: stamp,
        })
    }

    async fn get(&self, id: i64) -> Result<TodoItem> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM todo_items WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(TodoError::NotFound(id))?;
        decode_row(&row)
    }

    async fn list_all(&self) -> Result<Vec<TodoItem>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM todo_items ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(decode_row).collect()
    }

    async fn update(&self, id: i64, changes: TodoChanges) -> Result<TodoItem> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM todo_items WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(TodoError::NotFound(id))?;
        let mut item = decode_row(&row)?;
        changes.apply(&mut item);
        item.updated_at = types::next_update_stamp(item.updated_at);

        sqlx::query(
            "UPDATE todo_items \
             SET title = ?, description = ?, due_date = ?, is_resolved = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&item.title)
        .bind(&item.description)
        .bind(item.due_date.map(format_date))
        .bind(item.is_resolved)
        .bind(item.updated_at.timestamp_micros())
        .bind(id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(item)
    }

    async fn toggle_resolved(&self, id: i64) -> Result<TodoItem> {
        let row = sqlx::query(&format!(
            "UPDATE todo_items \
             SET is_resolved = NOT is_resolved, updated_at = MAX(?, updated_at + 1) \
             WHERE id = ? RETURNING {COLUMNS}"
        ))
        .bind(types::now().timestamp_micros())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(TodoError::NotFound(id))?;
        decode_row(&row)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM todo_items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(TodoError::NotFound(id));
        }
        Ok(())
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn decode_row(row: &SqliteRow) -> Result<TodoItem> {
    let id: i64 = row.try_get("id")?;
    let due_date = row
        .try_get::<Option<String>, _>("due_date")?
        .map(|raw| {
            NaiveDate::parse_from_str(&raw, DATE_FORMAT)
                .map_err(|e| TodoError::Storage(format!("todo {id}: bad due_date {raw:?}: {e}")))
        })
        .transpose()?;
    Ok(TodoItem {
        id,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        due_date,
        is_resolved: row.try_get("is_resolved")?,
        created_at: decode_micros(id, row.try_get("created_at")?)?,
        updated_at: decode_micros(id, row.try_get("updated_at")?)?,
    })
}

fn decode_micros(id: i64, micros: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| TodoError::Storage(format!("todo {id}: timestamp out of range: {micros}")))
}

use clap::Parser;
use todo_core::{MemoryStore, SqliteStore, TodoService};

/// Value of `--database` that selects the non-persistent store.
pub const IN_MEMORY: &str = ":memory:";

#[derive(Parser, Debug, Clone)]
#[command(name = "todo-server")]
#[command(about = "Single-user TODO list served as HTML pages")]
pub struct Config {
    #[arg(long, env = "TODO_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "TODO_PORT", default_value_t = 3000)]
    pub port: u16,

    /// SQLite database file, or `:memory:` to keep items in process only.
    #[arg(long, env = "TODO_DATABASE", default_value = "todos.db")]
    pub database: String,
}

impl Config {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub async fn open_service(&self) -> todo_core::Result<TodoService> {
        if self.database == IN_MEMORY {
            return Ok(TodoService::new(MemoryStore::new()));
        }
        Ok(TodoService::new(SqliteStore::open(&self.database).await?))
    }
}

//! Behavior every `TodoStore` backend must share, checked through
//! `TodoService` against both the in-memory and the SQLite store.

use chrono::{Duration, Local, NaiveDate};
use todo_core::{MemoryStore, SqliteStore, TodoError, TodoForm, TodoService};

fn in_a_week() -> NaiveDate {
    Local::now().date_naive() + Duration::days(7)
}

async fn backends() -> Vec<(&'static str, TodoService, Option<tempfile::TempDir>)> {
    let dir = tempfile::tempdir().unwrap();
    let sqlite = SqliteStore::open(dir.path().join("todos.db")).await.unwrap();
    vec![
        ("memory", TodoService::new(MemoryStore::new()), None),
        ("sqlite", TodoService::new(sqlite), Some(dir)),
    ]
}

#[tokio::test]
async fn create_then_get_returns_the_input() {
    for (name, svc, _dir) in backends().await {
        let form = TodoForm::new("Test Todo")
            .with_description("Test Description")
            .with_due_date(in_a_week());
        let created = svc.create(&form).await.unwrap();
        let fetched = svc.get(created.id).await.unwrap();

        assert_eq!(fetched.title, "Test Todo", "{name}");
        assert_eq!(fetched.description, "Test Description", "{name}");
        assert_eq!(fetched.due_date, Some(in_a_week()), "{name}");
        assert!(!fetched.is_resolved, "{name}");
        assert_eq!(fetched.created_at, fetched.updated_at, "{name}");
        assert_eq!(fetched, created, "{name}");
    }
}

#[tokio::test]
async fn minimal_create_uses_defaults() {
    for (name, svc, _dir) in backends().await {
        let created = svc.create(&TodoForm::new("Minimal Todo")).await.unwrap();
        let fetched = svc.get(created.id).await.unwrap();
        assert_eq!(fetched.description, "", "{name}");
        assert_eq!(fetched.due_date, None, "{name}");
        assert!(!fetched.is_resolved, "{name}");
    }
}

#[tokio::test]
async fn edit_changes_fields_and_bumps_updated_at() {
    for (name, svc, _dir) in backends().await {
        let created = svc
            .create(&TodoForm::new("Test Todo").with_due_date(in_a_week()))
            .await
            .unwrap();
        let form = TodoForm::new("Updated Todo").with_description("Updated Description");
        svc.update(created.id, &form).await.unwrap();

        let fetched = svc.get(created.id).await.unwrap();
        assert_eq!(fetched.id, created.id, "{name}");
        assert_eq!(fetched.title, "Updated Todo", "{name}");
        assert_eq!(fetched.description, "Updated Description", "{name}");
        assert_eq!(fetched.due_date, None, "{name}");
        assert_eq!(fetched.created_at, created.created_at, "{name}");
        assert!(fetched.updated_at > fetched.created_at, "{name}");
    }
}

#[tokio::test]
async fn toggle_is_an_involution() {
    for (name, svc, _dir) in backends().await {
        let id = svc.create(&TodoForm::new("Test Todo")).await.unwrap().id;

        svc.toggle_resolved(id).await.unwrap();
        assert!(svc.get(id).await.unwrap().is_resolved, "{name}");

        svc.toggle_resolved(id).await.unwrap();
        let fetched = svc.get(id).await.unwrap();
        assert!(!fetched.is_resolved, "{name}");
        assert!(fetched.updated_at > fetched.created_at, "{name}");
    }
}

#[tokio::test]
async fn deleted_ids_never_resolve_again() {
    for (name, svc, _dir) in backends().await {
        let first = svc.create(&TodoForm::new("first")).await.unwrap();
        svc.delete(first.id).await.unwrap();
        let second = svc.create(&TodoForm::new("second")).await.unwrap();

        assert_ne!(second.id, first.id, "{name}");
        assert!(
            matches!(svc.get(first.id).await, Err(TodoError::NotFound(id)) if id == first.id),
            "{name}"
        );
        assert!(
            matches!(svc.delete(first.id).await, Err(TodoError::NotFound(_))),
            "{name}"
        );
    }
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    for (name, svc, _dir) in backends().await {
        assert!(
            matches!(svc.get(9999).await, Err(TodoError::NotFound(9999))),
            "{name}"
        );
        assert!(
            matches!(
                svc.update(9999, &TodoForm::new("x")).await,
                Err(TodoError::NotFound(9999))
            ),
            "{name}"
        );
        assert!(
            matches!(svc.toggle_resolved(9999).await, Err(TodoError::NotFound(9999))),
            "{name}"
        );
    }
}

#[tokio::test]
async fn list_is_newest_first() {
    for (name, svc, _dir) in backends().await {
        assert!(svc.list().await.unwrap().is_empty(), "{name}");

        let older = svc.create(&TodoForm::new("older")).await.unwrap();
        let newer = svc.create(&TodoForm::new("newer")).await.unwrap();
        let titles: Vec<String> = svc
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["newer", "older"], "{name}");

        // Editing does not move an item: ordering is by creation time.
        svc.update(older.id, &TodoForm::new("older, edited")).await.unwrap();
        let first = svc.list().await.unwrap().remove(0);
        assert_eq!(first.id, newer.id, "{name}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_toggles_are_not_lost() {
    for (name, svc, _dir) in backends().await {
        let id = svc.create(&TodoForm::new("Contended")).await.unwrap().id;

        let handles: Vec<_> = (0..9)
            .map(|_| {
                let svc = svc.clone();
                tokio::spawn(async move { svc.toggle_resolved(id).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // An odd number of flips from unresolved ends resolved.
        assert!(svc.get(id).await.unwrap().is_resolved, "{name}");
    }
}

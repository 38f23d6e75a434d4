//! HTML rendering for the todo pages.
//!
//! # Design
//! Templates are compiled into the binary with `include_str!` and parsed once
//! into a single `Tera` instance. Handlers never build template contexts
//! themselves; each page has a method here that takes domain values and
//! returns the finished body. Templates only see the flat view structs below,
//! so a missing optional value renders as an empty string rather than failing.

use chrono::NaiveDate;
use serde::Serialize;
use tera::{Context, Tera};
use todo_core::{TodoForm, TodoItem, ValidationErrors};

const TEMPLATES: [(&str, &str); 5] = [
    ("base.html", include_str!("../templates/base.html")),
    ("home.html", include_str!("../templates/home.html")),
    ("todo_form.html", include_str!("../templates/todo_form.html")),
    (
        "todo_confirm_delete.html",
        include_str!("../templates/todo_confirm_delete.html"),
    ),
    ("not_found.html", include_str!("../templates/not_found.html")),
];

pub struct Views {
    tera: Tera,
}

#[derive(Serialize)]
struct TodoView<'a> {
    #[serde(flatten)]
    item: &'a TodoItem,
    is_overdue: bool,
}

#[derive(Serialize)]
struct FormView<'a> {
    title: &'a str,
    description: &'a str,
    due_date: &'a str,
}

impl<'a> From<&'a TodoForm> for FormView<'a> {
    fn from(form: &'a TodoForm) -> Self {
        Self {
            title: form.title.as_deref().unwrap_or_default(),
            description: form.description.as_deref().unwrap_or_default(),
            due_date: form.due_date.as_deref().unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
struct ErrorsView<'a> {
    title: &'a [String],
    due_date: &'a [String],
}

impl<'a> From<&'a ValidationErrors> for ErrorsView<'a> {
    fn from(errors: &'a ValidationErrors) -> Self {
        Self {
            title: errors.get("title"),
            due_date: errors.get("due_date"),
        }
    }
}

impl Views {
    pub fn new() -> tera::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        Ok(Self { tera })
    }

    /// The list page. `today` decides which items are flagged overdue.
    pub fn home(&self, items: &[TodoItem], today: NaiveDate) -> tera::Result<String> {
        let todos: Vec<TodoView<'_>> = items
            .iter()
            .map(|item| TodoView {
                item,
                is_overdue: item.is_overdue(today),
            })
            .collect();
        let mut context = Context::new();
        context.insert("todos", &todos);
        self.tera.render("home.html", &context)
    }

    pub fn create_form(&self, form: &TodoForm, errors: &ValidationErrors) -> tera::Result<String> {
        self.form("Create New TODO", "/create/", form, errors)
    }

    pub fn edit_form(
        &self,
        id: i64,
        form: &TodoForm,
        errors: &ValidationErrors,
    ) -> tera::Result<String> {
        self.form("Edit TODO", &format!("/edit/{id}/"), form, errors)
    }

    fn form(
        &self,
        heading: &str,
        action: &str,
        form: &TodoForm,
        errors: &ValidationErrors,
    ) -> tera::Result<String> {
        let mut context = Context::new();
        context.insert("heading", heading);
        context.insert("action", action);
        context.insert("form", &FormView::from(form));
        context.insert("errors", &ErrorsView::from(errors));
        self.tera.render("todo_form.html", &context)
    }

    pub fn confirm_delete(&self, item: &TodoItem) -> tera::Result<String> {
        let mut context = Context::new();
        context.insert("todo", item);
        self.tera.render("todo_confirm_delete.html", &context)
    }

    pub fn not_found(&self, message: &str) -> tera::Result<String> {
        let mut context = Context::new();
        context.insert("message", message);
        self.tera.render("not_found.html", &context)
    }
}

//! HTML front end for the todo list.
//!
//! # Design
//! Every route does at most one service call and then either renders a page
//! or redirects back to the list. Mutations always answer `302 Found` with
//! `Location: /` so a browser refresh never resubmits a form. An unknown id
//! on any route becomes the rendered 404 page; invalid form input re-renders
//! the form with the submitted values and nothing is written.

pub mod config;
pub mod error;
pub mod logging;
pub mod views;

use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use chrono::Local;
use tokio::net::TcpListener;
use todo_core::{TodoError, TodoForm, TodoService, ValidationErrors};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::error::{ErrorPage, ServerError};
use crate::views::Views;

#[derive(Clone)]
pub struct AppState {
    pub service: TodoService,
    pub views: Arc<Views>,
}

impl AppState {
    pub fn new(service: TodoService) -> Result<Self, ServerError> {
        Ok(Self {
            service,
            views: Arc::new(Views::new()?),
        })
    }

    /// Turns a failure into the page the client sees. Only `NotFound` is
    /// shown as-is; everything else is logged and hidden behind a 500.
    fn fail(&self, err: impl Into<ServerError>) -> ErrorPage {
        match err.into() {
            ServerError::Todo(TodoError::NotFound(id)) => {
                debug!(id, "todo not found");
                self.not_found(&format!("No TODO with id {id} exists."))
            }
            ServerError::Todo(TodoError::Validation(errors)) => ErrorPage {
                status: StatusCode::BAD_REQUEST,
                body: format!("<h1>Bad Request</h1><p>{errors}</p>"),
            },
            other => {
                error!(error = %other, "request failed");
                ErrorPage::internal()
            }
        }
    }

    fn not_found(&self, message: &str) -> ErrorPage {
        match self.views.not_found(message) {
            Ok(body) => ErrorPage {
                status: StatusCode::NOT_FOUND,
                body,
            },
            Err(err) => {
                error!(error = %err, "cannot render 404 page");
                ErrorPage::internal()
            }
        }
    }
}

pub fn app(service: TodoService) -> Result<Router, ServerError> {
    let state = AppState::new(service)?;
    Ok(Router::new()
        .route("/", get(home))
        .route("/create/", get(create_form).post(create_todo))
        .route("/edit/{id}/", get(edit_form).post(edit_todo))
        .route("/delete/{id}/", get(confirm_delete).post(delete_todo))
        .route("/toggle/{id}/", post(toggle_resolved))
        .fallback(unknown_route)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Serves until Ctrl-C, then lets in-flight requests finish.
pub async fn run(listener: TcpListener, service: TodoService) -> Result<(), ServerError> {
    axum::serve(listener, app(service)?)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "cannot listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

fn redirect_home() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}

type PageResult = Result<Response, ErrorPage>;

async fn home(State(state): State<AppState>) -> PageResult {
    let items = state.service.list().await.map_err(|e| state.fail(e))?;
    let today = Local::now().date_naive();
    let body = state.views.home(&items, today).map_err(|e| state.fail(e))?;
    Ok(Html(body).into_response())
}

async fn create_form(State(state): State<AppState>) -> PageResult {
    let body = state
        .views
        .create_form(&TodoForm::default(), &ValidationErrors::new())
        .map_err(|e| state.fail(e))?;
    Ok(Html(body).into_response())
}

/// A missing or unreadable form body is treated as an empty form, so it
/// goes through validation (and the id lookup on edit) like any other input.
fn form_or_empty(form: Result<Form<TodoForm>, FormRejection>) -> TodoForm {
    match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            debug!(%rejection, "unreadable form body, using an empty form");
            TodoForm::default()
        }
    }
}

async fn create_todo(
    State(state): State<AppState>,
    form: Result<Form<TodoForm>, FormRejection>,
) -> PageResult {
    let form = form_or_empty(form);
    match state.service.create(&form).await {
        Ok(_) => Ok(redirect_home()),
        Err(TodoError::Validation(errors)) => {
            let body = state
                .views
                .create_form(&form, &errors)
                .map_err(|e| state.fail(e))?;
            Ok(Html(body).into_response())
        }
        Err(err) => Err(state.fail(err)),
    }
}

async fn edit_form(State(state): State<AppState>, Path(id): Path<i64>) -> PageResult {
    let item = state.service.get(id).await.map_err(|e| state.fail(e))?;
    let body = state
        .views
        .edit_form(id, &TodoForm::from_item(&item), &ValidationErrors::new())
        .map_err(|e| state.fail(e))?;
    Ok(Html(body).into_response())
}

async fn edit_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    form: Result<Form<TodoForm>, FormRejection>,
) -> PageResult {
    let form = form_or_empty(form);
    match state.service.update(id, &form).await {
        Ok(_) => Ok(redirect_home()),
        Err(TodoError::Validation(errors)) => {
            let body = state
                .views
                .edit_form(id, &form, &errors)
                .map_err(|e| state.fail(e))?;
            Ok(Html(body).into_response())
        }
        Err(err) => Err(state.fail(err)),
    }
}

async fn confirm_delete(State(state): State<AppState>, Path(id): Path<i64>) -> PageResult {
    let item = state.service.get(id).await.map_err(|e| state.fail(e))?;
    let body = state
        .views
        .confirm_delete(&item)
        .map_err(|e| state.fail(e))?;
    Ok(Html(body).into_response())
}

async fn delete_todo(State(state): State<AppState>, Path(id): Path<i64>) -> PageResult {
    state.service.delete(id).await.map_err(|e| state.fail(e))?;
    Ok(redirect_home())
}

async fn toggle_resolved(State(state): State<AppState>, Path(id): Path<i64>) -> PageResult {
    state
        .service
        .toggle_resolved(id)
        .await
        .map_err(|e| state.fail(e))?;
    Ok(redirect_home())
}

async fn unknown_route(State(state): State<AppState>) -> ErrorPage {
    state.not_found("This page does not exist.")
}

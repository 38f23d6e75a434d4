use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;
use todo_core::TodoError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Todo(#[from] TodoError),

    #[error("template error: {0}")]
    Render(#[from] tera::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A finished error response. Built by `AppState::fail`, which has the views
/// needed to render the 404 page.
#[derive(Debug)]
pub struct ErrorPage {
    pub status: StatusCode,
    pub body: String,
}

impl ErrorPage {
    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "<h1>Internal Server Error</h1>".to_string(),
        }
    }
}

impl IntoResponse for ErrorPage {
    fn into_response(self) -> Response {
        (self.status, Html(self.body)).into_response()
    }
}

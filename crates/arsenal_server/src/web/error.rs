//! Handler error type and its HTTP mapping.

use arsenal_core::RepoError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, warn};
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum AppError {
    /// The store failed; nothing was committed.
    Store(RepoError),
    /// The request body could not be decoded.
    BadRequest(String),
    Render(handlebars::RenderError),
    /// The blocking store task panicked or was cancelled.
    Task(tokio::task::JoinError),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "store error: {err}"),
            Self::BadRequest(message) => write!(f, "bad request: {message}"),
            Self::Render(err) => write!(f, "render error: {err}"),
            Self::Task(err) => write!(f, "store task failed: {err}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<RepoError> for AppError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

impl From<handlebars::RenderError> for AppError {
    fn from(value: handlebars::RenderError) -> Self {
        Self::Render(value)
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Task(value)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(message) => {
                warn!("event=http_request module=web status=rejected error={message}");
                (StatusCode::BAD_REQUEST, message).into_response()
            }
            other => {
                error!("event=http_request module=web status=error error={other}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::db::StoreError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    MissingFields(&'static str),
    #[error("Username already exists.")]
    DuplicateUsername,
    #[error("Invalid username or password.")]
    InvalidCredentials,
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    MalformedBody(String),
    #[error("store error: {0}")]
    Store(#[source] StoreError),
    #[error("hash error: {0}")]
    Hash(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate => AppError::DuplicateUsername,
            other => AppError::Store(other),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedBody(format!("Invalid request body: {}", rejection.body_text()))
    }
}

/// An `:id` segment that is not an integer cannot match any row.
pub fn path_id(id: Result<Path<i64>, PathRejection>, not_found: &'static str) -> AppResult<i64> {
    match id {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "unparseable id");
            Err(AppError::NotFound(not_found))
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingFields(_)
            | AppError::DuplicateUsername
            | AppError::InvalidCredentials
            | AppError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_) | AppError::Hash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing text. Server errors never expose their cause.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Store(_) => "Database error.".into(),
            AppError::Hash(_) => "Internal server error.".into(),
            other => other.to_string(),
        }
    }

    fn log_if_internal(&self) {
        if self.status().is_server_error() {
            error!(error = %self, "request failed");
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log_if_internal();
        let body = ErrorBody {
            error: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Error rendered in the `{success, message}` envelope used by `/api/register` and `/api/login`.
#[derive(Debug)]
pub struct AuthFailure(pub AppError);

impl<E: Into<AppError>> From<E> for AuthFailure {
    fn from(err: E) -> Self {
        AuthFailure(err.into())
    }
}

#[derive(Debug, Serialize)]
struct AuthFailureBody {
    success: bool,
    message: String,
}

impl IntoResponse for AuthFailure {
    fn into_response(self) -> Response {
        self.0.log_if_internal();
        let body = AuthFailureBody {
            success: false,
            message: self.0.public_message(),
        };
        (self.0.status(), Json(body)).into_response()
    }
}

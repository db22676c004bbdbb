use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::Debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    Unauthenticated,
    ServiceUnavailable,
}

#[derive(Debug, thiserror::Error)]
#[error("{message} (code {code})")]
pub struct Error {
    pub code: i32,
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    pub fn is_not_found_error(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    pub fn is_service_unavailable_error(&self) -> bool {
        self.kind == ErrorKind::ServiceUnavailable
    }
}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        database_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self.kind {
            ErrorKind::InvalidArgument => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        };

        let body = Json(json!({
            "code": self.code,
            "error": self.message,
        }));

        (status, body).into_response()
    }
}

pub fn invalid_input_error(message: impl Into<String>) -> Error {
    Error {
        code: 101,
        kind: ErrorKind::InvalidArgument,
        message: message.into(),
    }
}

pub fn place_not_found_error() -> Error {
    Error {
        code: 102,
        kind: ErrorKind::NotFound,
        message: "place not found".into(),
    }
}

// Also returned for favorites owned by another user.
pub fn favorite_not_found_error() -> Error {
    Error {
        code: 103,
        kind: ErrorKind::NotFound,
        message: "favorite not found".into(),
    }
}

pub fn unauthenticated_error() -> Error {
    Error {
        code: 104,
        kind: ErrorKind::Unauthenticated,
        message: "user not authenticated".into(),
    }
}

pub fn env_var_error(err: env::VarError) -> Error {
    Error {
        code: 1,
        kind: ErrorKind::InvalidArgument,
        message: format!("environment variable error: {}", err),
    }
}

pub fn database_error<T: Debug>(err: T) -> Error {
    tracing::warn!(error = ?err, "store call failed");

    Error {
        code: 2,
        kind: ErrorKind::ServiceUnavailable,
        message: "database error".into(),
    }
}

pub fn server_error<T: Debug>(err: T) -> Error {
    tracing::error!(error = ?err, "server failed");

    Error {
        code: 4,
        kind: ErrorKind::ServiceUnavailable,
        message: "server error".into(),
    }
}

pub fn store_unavailable_error() -> Error {
    Error {
        code: 3,
        kind: ErrorKind::ServiceUnavailable,
        message: "store unavailable".into(),
    }
}

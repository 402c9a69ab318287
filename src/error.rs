use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt;

/// Failure of a single upstream lookup (geocode or route).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LookupError {
    #[error("address not found: {0}")]
    AddressNotFound(String),

    #[error("no route found")]
    RouteNotFound,

    #[error("upstream error: {0}")]
    Upstream(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return LookupError::Upstream("request timed out".into());
        }

        LookupError::Upstream(err.to_string())
    }
}

#[derive(Debug)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl Error {
    pub fn is_client_error(&self) -> bool {
        self.code >= 100
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        config_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        internal_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            1..=99 => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("internal error: {}", self.message),
            ),
            _ => (StatusCode::BAD_REQUEST, self.message),
        };

        let body = Json(json!({
            "success": false,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub fn validation_error(message: impl Into<String>) -> Error {
    Error {
        code: 101,
        message: message.into(),
    }
}

pub fn batch_failed_error(message: impl Into<String>) -> Error {
    Error {
        code: 102,
        message: message.into(),
    }
}

pub fn internal_error<T: fmt::Display>(err: T) -> Error {
    Error {
        code: 1,
        message: err.to_string(),
    }
}

pub fn render_error<T: fmt::Display>(err: T) -> Error {
    Error {
        code: 2,
        message: format!("map rendering failed: {}", err),
    }
}

pub fn config_error<T: fmt::Display>(err: T) -> Error {
    Error {
        code: 3,
        message: format!("configuration error: {}", err),
    }
}

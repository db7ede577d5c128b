use axum::http::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

/// Failure of the console's own HTTP surface.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

/// Why a controller operation did not produce a success render.
#[derive(Debug, Error)]
pub enum OperationError {
    /// Input missing or malformed; no request was sent.
    #[error("{0}")]
    Validation(String),
    /// The backend answered with a non-2xx status and a JSON body.
    #[error("backend returned {status}")]
    Server { status: u16, body: Value },
    /// The request never completed or the body was not JSON.
    #[error("{0}")]
    Transport(String),
}

impl OperationError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    /// The JSON rendered into the result region.
    pub fn payload(&self) -> Value {
        match self {
            OperationError::Server { body, .. } => body.clone(),
            OperationError::Validation(message) | OperationError::Transport(message) => {
                json!({ "error": message })
            }
        }
    }
}

impl From<reqwest::Error> for OperationError {
    fn from(err: reqwest::Error) -> Self {
        Self::transport(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_render_their_body() {
        let err = OperationError::Server {
            status: 404,
            body: json!({ "error": "Template not found" }),
        };
        assert_eq!(err.payload(), json!({ "error": "Template not found" }));
    }

    #[test]
    fn local_errors_are_wrapped() {
        assert_eq!(
            OperationError::validation("Campaign ID is required.").payload(),
            json!({ "error": "Campaign ID is required." })
        );
        assert_eq!(
            OperationError::transport("connection refused").payload(),
            json!({ "error": "connection refused" })
        );
    }
}

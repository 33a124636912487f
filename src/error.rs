use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;

/// Errors returned to API callers.
///
/// `Client` covers malformed requests and mutations the provider refused
/// (400). `PayloadTooLarge` is an upload over the body limit (413).
/// `Server` covers provider and transport failures (500).
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    Client {
        message: String,
        result: Option<Value>,
    },
    #[error("{message}")]
    PayloadTooLarge { message: String },
    #[error("{message}")]
    Server { message: String, error: Value },
}

impl ApiError {
    pub fn client(message: impl Into<String>) -> Self {
        ApiError::Client {
            message: message.into(),
            result: None,
        }
    }

    pub fn client_with_result(message: impl Into<String>, result: Value) -> Self {
        ApiError::Client {
            message: message.into(),
            result: Some(result),
        }
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        ApiError::PayloadTooLarge {
            message: message.into(),
        }
    }

    pub fn server(message: impl Into<String>, error: Value) -> Self {
        ApiError::Server {
            message: message.into(),
            error,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Client { .. } => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Server { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Client {
                message,
                result: Some(result),
            } => json!({ "message": message, "result": result }),
            ApiError::Client {
                message,
                result: None,
            } => json!({ "message": message }),
            ApiError::PayloadTooLarge { message } => json!({ "message": message }),
            ApiError::Server { message, error } => json!({ "message": message, "error": error }),
        };
        (status, Json(body)).into_response()
    }
}

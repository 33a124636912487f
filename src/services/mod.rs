pub mod cloudinary_service;
#[cfg(test)]
pub mod mock;

pub use cloudinary_service::CloudinaryClient;

use crate::models::{ImageContext, ProviderResource};
use crate::utils::StagedFile;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while talking to the media provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Request Timeout after {0:?}")]
    Timeout(Duration),
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{message}")]
    Api { http_code: u16, message: String },
    #[error("staged file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unexpected provider response: {0}")]
    Decode(String),
    #[error("invalid provider base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("provider misconfigured: {0}")]
    Config(String),
}

impl ProviderError {
    /// Raw error object returned to API callers under `error`.
    pub fn to_json(&self) -> Value {
        match self {
            ProviderError::Api { http_code, message } => json!({
                "message": message,
                "http_code": http_code,
            }),
            ProviderError::Timeout(_) => json!({
                "message": self.to_string(),
                "http_code": 499,
                "name": "TimeoutError",
            }),
            _ => json!({ "message": self.to_string() }),
        }
    }
}

/// Remote media storage the HTTP handlers delegate to.
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Store a staged file in the provider's folder with context annotations.
    /// Returns the provider's upload result unchanged.
    async fn upload(&self, file: &StagedFile, context: &ImageContext)
        -> Result<Value, ProviderError>;

    /// Every image resource in the folder, with custom context.
    async fn list(&self) -> Result<Vec<ProviderResource>, ProviderError>;

    /// Delete one resource. Returns the provider's result payload, e.g.
    /// `{"result": "ok"}` or `{"result": "not found"}`.
    async fn destroy(&self, public_id: &str) -> Result<Value, ProviderError>;
}

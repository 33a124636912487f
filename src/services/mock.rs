use super::{MediaProvider, ProviderError};
use crate::models::{ImageContext, ProviderResource};
use crate::utils::StagedFile;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// What the mock saw for one upload call.
#[derive(Debug, Clone)]
pub struct UploadCall {
    pub file_name: String,
    pub path: PathBuf,
    pub content: Vec<u8>,
    pub context: ImageContext,
}

#[derive(Clone)]
pub struct MockProvider {
    upload_result: Value,
    resources: Vec<ProviderResource>,
    destroy_result: Value,
    failing: bool,
    uploads: Arc<Mutex<Vec<UploadCall>>>,
    destroyed: Arc<Mutex<Vec<String>>>,
    list_count: Arc<Mutex<usize>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            upload_result: json!({
                "public_id": "profiles_hiremate/mock",
                "secure_url": "https://res.cloudinary.com/mock/image/upload/mock.png",
            }),
            resources: Vec::new(),
            destroy_result: json!({ "result": "ok" }),
            failing: false,
            uploads: Arc::new(Mutex::new(Vec::new())),
            destroyed: Arc::new(Mutex::new(Vec::new())),
            list_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_upload_result(mut self, result: Value) -> Self {
        self.upload_result = result;
        self
    }

    pub fn with_resources(mut self, resources: Vec<Value>) -> Self {
        self.resources = resources
            .into_iter()
            .map(|r| serde_json::from_value(r).unwrap())
            .collect();
        self
    }

    pub fn with_destroy_result(mut self, result: Value) -> Self {
        self.destroy_result = result;
        self
    }

    /// Every call fails with a provider error.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn uploads(&self) -> Vec<UploadCall> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().unwrap().clone()
    }

    pub fn list_count(&self) -> usize {
        *self.list_count.lock().unwrap()
    }

    fn failure(&self) -> ProviderError {
        ProviderError::Api {
            http_code: 500,
            message: "mock provider failure".to_string(),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaProvider for MockProvider {
    async fn upload(
        &self,
        file: &StagedFile,
        context: &ImageContext,
    ) -> Result<Value, ProviderError> {
        let content = tokio::fs::read(file.path()).await?;
        self.uploads.lock().unwrap().push(UploadCall {
            file_name: file.file_name().to_string(),
            path: file.path().to_path_buf(),
            content,
            context: context.clone(),
        });

        if self.failing {
            return Err(self.failure());
        }
        Ok(self.upload_result.clone())
    }

    async fn list(&self) -> Result<Vec<ProviderResource>, ProviderError> {
        *self.list_count.lock().unwrap() += 1;
        if self.failing {
            return Err(self.failure());
        }
        Ok(self.resources.clone())
    }

    async fn destroy(&self, public_id: &str) -> Result<Value, ProviderError> {
        self.destroyed.lock().unwrap().push(public_id.to_string());
        if self.failing {
            return Err(self.failure());
        }
        Ok(self.destroy_result.clone())
    }
}

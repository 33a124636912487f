use crate::config::CloudinaryConfig;
use crate::models::{ImageContext, ProviderResource, ResourcePage};
use crate::services::{MediaProvider, ProviderError};
use crate::utils::StagedFile;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Response};
use serde_json::Value;
use sha1::{Digest, Sha1};
use std::collections::{BTreeMap, HashSet};
use tokio_util::io::ReaderStream;
use url::Url;

/// Parameters Cloudinary never includes in a request signature.
const UNSIGNED_PARAMS: [&str; 4] = ["file", "api_key", "resource_type", "cloud_name"];

/// Sign request parameters the way the Cloudinary upload API expects:
/// sorted `key=value` pairs joined by `&`, secret appended, SHA-1 hex.
pub fn api_sign_request(params: &[(&str, String)], api_secret: &str) -> String {
    let signed: BTreeMap<&str, &str> = params
        .iter()
        .filter(|(key, value)| !value.is_empty() && !UNSIGNED_PARAMS.contains(key))
        .map(|(key, value)| (*key, value.as_str()))
        .collect();

    let to_sign = signed
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Encode context pairs as `key=value|key=value`, escaping `=` and `|`.
pub fn encode_context(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| {
            let escaped = value.replace('=', "\\=").replace('|', "\\|");
            format!("{}={}", key, escaped)
        })
        .collect::<Vec<_>>()
        .join("|")
}

/// Cloudinary REST client scoped to one folder.
pub struct CloudinaryClient {
    config: CloudinaryConfig,
    base_url: Url,
    client: reqwest::Client,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig) -> Result<Self, ProviderError> {
        let base_url = Url::parse(&config.api_base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ProviderError::Config(format!(
                "api base url {} cannot carry a path",
                config.api_base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            config,
            base_url,
            client,
        })
    }

    pub fn folder(&self) -> &str {
        &self.config.folder
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::Config("api base url cannot carry a path".to_string()))?
            .pop_if_empty()
            .push(&self.config.cloud_name)
            .extend(segments);
        Ok(url)
    }

    /// Add `timestamp`, `signature` and `api_key` to a signed call.
    fn sign(&self, mut params: Vec<(&'static str, String)>) -> Vec<(&'static str, String)> {
        params.push(("timestamp", chrono::Utc::now().timestamp().to_string()));
        let signature = api_sign_request(&params, &self.config.api_secret);
        params.push(("signature", signature));
        params.push(("api_key", self.config.api_key.clone()));
        params
    }

    fn transport_error(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(self.config.timeout())
        } else {
            ProviderError::Http(err)
        }
    }

    async fn read_json(&self, response: Response) -> Result<Value, ProviderError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|body| {
                    body.pointer("/error/message")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or_else(|| {
                    if text.trim().is_empty() {
                        status
                            .canonical_reason()
                            .unwrap_or("Unknown provider error")
                            .to_string()
                    } else {
                        text.clone()
                    }
                });
            return Err(ProviderError::Api {
                http_code: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|e| ProviderError::Decode(e.to_string()))
    }

    async fn fetch_page(&self, cursor: Option<&str>) -> Result<ResourcePage, ProviderError> {
        let url = self.endpoint(&["resources", "image", "upload"])?;
        let mut query = vec![
            ("prefix", format!("{}/", self.config.folder)),
            ("context", "true".to_string()),
            ("max_results", self.config.page_size().to_string()),
        ];
        if let Some(cursor) = cursor {
            query.push(("next_cursor", cursor.to_string()));
        }

        let response = self
            .client
            .get(url)
            .basic_auth(&self.config.api_key, Some(&self.config.api_secret))
            .query(&query)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let body = self.read_json(response).await?;
        serde_json::from_value(body).map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

#[async_trait]
impl MediaProvider for CloudinaryClient {
    async fn upload(
        &self,
        file: &StagedFile,
        context: &ImageContext,
    ) -> Result<Value, ProviderError> {
        let url = self.endpoint(&["image", "upload"])?;
        let params = self.sign(vec![
            ("folder", self.config.folder.clone()),
            ("context", encode_context(&context.pairs())),
        ]);

        let staged = file.open().await?;
        let body = Body::wrap_stream(ReaderStream::new(staged));
        let mut part =
            Part::stream_with_length(body, file.len()).file_name(file.file_name().to_string());
        if let Some(content_type) = file.content_type() {
            part = part.mime_str(content_type)?;
        }

        let form = params
            .into_iter()
            .fold(Form::new(), |form, (key, value)| form.text(key, value))
            .part("file", part);

        tracing::debug!(
            "Uploading {} ({} bytes) to folder {}",
            file.file_name(),
            file.len(),
            self.config.folder
        );

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.read_json(response).await
    }

    async fn list(&self) -> Result<Vec<ProviderResource>, ProviderError> {
        let mut resources = Vec::new();
        let mut cursor: Option<String> = None;
        let mut seen_cursors = HashSet::new();

        loop {
            let page = self.fetch_page(cursor.as_deref()).await?;
            resources.extend(page.resources);

            match page.next_cursor {
                Some(next) if !next.is_empty() => {
                    // A cursor we already followed would page forever
                    if !seen_cursors.insert(next.clone()) {
                        return Err(ProviderError::Decode(format!(
                            "provider repeated pagination cursor {}",
                            next
                        )));
                    }
                    cursor = Some(next);
                }
                _ => break,
            }
        }

        tracing::debug!(
            "Fetched {} resources from folder {}",
            resources.len(),
            self.config.folder
        );
        Ok(resources)
    }

    async fn destroy(&self, public_id: &str) -> Result<Value, ProviderError> {
        let url = self.endpoint(&["image", "destroy"])?;
        let params = self.sign(vec![("public_id", public_id.to_string())]);

        let response = self
            .client
            .post(url)
            .form(&params)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.read_json(response).await
    }
}

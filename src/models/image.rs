use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use utoipa::ToSchema;

const DEFAULT_ALT: &str = "Uploaded wallpaper";
const DEFAULT_USER: &str = "Unknown User";

/// 上传时附加到图片上的上下文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageContext {
    /// 图片替代文本，来自 description
    pub alt: String,
    /// 上传用户，来自 username
    pub user: String,
}

impl ImageContext {
    /// Blank form values fall back to the defaults.
    pub fn from_form(username: Option<String>, description: Option<String>) -> Self {
        fn non_blank(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        Self {
            alt: non_blank(description).unwrap_or_else(|| DEFAULT_ALT.to_string()),
            user: non_blank(username).unwrap_or_else(|| DEFAULT_USER.to_string()),
        }
    }

    pub fn pairs(&self) -> [(&'static str, &str); 2] {
        [("alt", self.alt.as_str()), ("user", self.user.as_str())]
    }
}

/// Cloudinary resources 接口返回的单个资源
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderResource {
    pub public_id: String,
    pub secure_url: String,
    #[serde(default)]
    pub context: Option<ResourceContext>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceContext {
    #[serde(default)]
    pub custom: Option<BTreeMap<String, String>>,
}

/// Cloudinary resources 接口的一页结果
#[derive(Debug, Clone, Deserialize)]
pub struct ResourcePage {
    #[serde(default)]
    pub resources: Vec<ProviderResource>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// 图片列表条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ImageEntry {
    /// 图片的 HTTPS 地址
    pub url: String,
    /// 图片在 Cloudinary 中的标识
    pub public_id: String,
    /// 自定义上下文，未设置时为空对象
    pub context: BTreeMap<String, String>,
}

impl From<ProviderResource> for ImageEntry {
    fn from(resource: ProviderResource) -> Self {
        Self {
            url: resource.secure_url,
            public_id: resource.public_id,
            context: resource
                .context
                .and_then(|ctx| ctx.custom)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    /// Cloudinary 返回的原始上传结果
    #[schema(value_type = Object)]
    pub data: Value,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImageListResponse {
    pub message: String,
    pub data: Vec<ImageEntry>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// 上传表单，仅用于 OpenAPI 文档
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    pub username: Option<String>,
    pub description: Option<String>,
}

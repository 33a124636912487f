use config::{Config, ConfigError, Environment, File, Map};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Cloudinary caps a single resources page at 500 entries.
const MAX_PAGE_SIZE: u32 = 500;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub cloudinary: CloudinaryConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Folder every asset is stored under and listed from.
    pub folder: String,
    pub api_base_url: String,
    pub timeout_secs: u64,
    pub max_results: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    pub max_file_size_mb: usize,
    pub staging_dir: Option<PathBuf>,
}

// Keep the API secret out of the startup log.
impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("folder", &self.folder)
            .field("api_base_url", &self.api_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_results", &self.max_results)
            .finish()
    }
}

impl CloudinaryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn page_size(&self) -> u32 {
        self.max_results.clamp(1, MAX_PAGE_SIZE)
    }

    /// Names of the credentials that are not set.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.cloud_name.trim().is_empty() {
            missing.push("CLOUDINARY_CLOUD_NAME");
        }
        if self.api_key.trim().is_empty() {
            missing.push("CLOUDINARY_API_KEY");
        }
        if self.api_secret.trim().is_empty() {
            missing.push("CLOUDINARY_API_SECRET");
        }
        missing
    }
}

impl UploadConfig {
    pub fn body_limit_bytes(&self) -> usize {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.staging_dir.clone().unwrap_or_else(env::temp_dir)
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_env(env::vars().collect())
    }

    /// Build settings against an explicit set of environment variables.
    fn from_env(vars: Map<String, String>) -> Result<Self, ConfigError> {
        let run_mode = vars
            .get("RUN_MODE")
            .cloned()
            .unwrap_or_else(|| "development".into());
        let defaults = Settings::default();

        let s = Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("cloudinary.cloud_name", defaults.cloudinary.cloud_name)?
            .set_default("cloudinary.api_key", defaults.cloudinary.api_key)?
            .set_default("cloudinary.api_secret", defaults.cloudinary.api_secret)?
            .set_default("cloudinary.folder", defaults.cloudinary.folder)?
            .set_default("cloudinary.api_base_url", defaults.cloudinary.api_base_url)?
            .set_default("cloudinary.timeout_secs", defaults.cloudinary.timeout_secs as i64)?
            .set_default("cloudinary.max_results", i64::from(defaults.cloudinary.max_results))?
            .set_default("upload.max_file_size_mb", defaults.upload.max_file_size_mb as i64)?
            .add_source(File::with_name("config/default").required(false))
            // Per-environment file, e.g. config/production.toml
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(File::with_name("config/local").required(false))
            // Eg. `APP__SERVER__PORT=8080 ./target/media-gateway`
            .add_source(
                Environment::with_prefix("app")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars.clone())),
            )
            .set_override_option("cloudinary.cloud_name", vars.get("CLOUDINARY_CLOUD_NAME").cloned())?
            .set_override_option("cloudinary.api_key", vars.get("CLOUDINARY_API_KEY").cloned())?
            .set_override_option("cloudinary.api_secret", vars.get("CLOUDINARY_API_SECRET").cloned())?
            .build()?;

        s.try_deserialize()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            cloudinary: CloudinaryConfig {
                cloud_name: String::new(),
                api_key: String::new(),
                api_secret: String::new(),
                folder: "profiles_hiremate".to_string(),
                api_base_url: "https://api.cloudinary.com/v1_1".to_string(),
                timeout_secs: 30,
                max_results: 100,
            },
            upload: UploadConfig {
                max_file_size_mb: 10,
                staging_dir: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.bind_addr(), "0.0.0.0:3000");
        assert_eq!(settings.cloudinary.folder, "profiles_hiremate");
        assert_eq!(settings.cloudinary.timeout(), Duration::from_secs(30));
        assert_eq!(settings.upload.body_limit_bytes(), 10 * 1024 * 1024);
    }

    #[test]
    fn test_missing_credentials() {
        let mut cfg = Settings::default().cloudinary;
        assert_eq!(
            cfg.missing_credentials(),
            vec![
                "CLOUDINARY_CLOUD_NAME",
                "CLOUDINARY_API_KEY",
                "CLOUDINARY_API_SECRET"
            ]
        );

        cfg.cloud_name = "demo".to_string();
        cfg.api_key = "123".to_string();
        cfg.api_secret = "abc".to_string();
        assert!(cfg.missing_credentials().is_empty());
    }

    #[test]
    fn test_page_size_is_clamped() {
        let mut cfg = Settings::default().cloudinary;
        cfg.max_results = 0;
        assert_eq!(cfg.page_size(), 1);
        cfg.max_results = 10_000;
        assert_eq!(cfg.page_size(), 500);
    }

    fn vars(pairs: &[(&str, &str)]) -> Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_credentials_come_from_environment() {
        let settings = Settings::from_env(vars(&[
            ("CLOUDINARY_CLOUD_NAME", "demo"),
            ("CLOUDINARY_API_KEY", "real-key"),
            ("CLOUDINARY_API_SECRET", "real-secret"),
            ("APP__SERVER__PORT", "8080"),
        ]))
        .unwrap();

        assert_eq!(settings.cloudinary.cloud_name, "demo");
        assert_eq!(settings.cloudinary.api_key, "real-key");
        assert_eq!(settings.cloudinary.api_secret, "real-secret");
        assert_eq!(settings.server.port, 8080);
        assert!(settings.cloudinary.missing_credentials().is_empty());
    }

    #[test]
    fn test_invalid_override_is_an_error() {
        let result = Settings::from_env(vars(&[
            ("CLOUDINARY_API_KEY", "real-key"),
            ("APP__SERVER__PORT", "not-a-port"),
        ]));

        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let mut cfg = Settings::default().cloudinary;
        cfg.api_secret = "super-secret".to_string();
        let rendered = format!("{:?}", cfg);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}

use std::path::PathBuf;

use crate::photo::DEFAULT_MAX_UPLOAD_BYTES;

pub const DEFAULT_GATEWAY_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GATEWAY_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Where and how the poem generation gateway is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

/// Application configuration DTO (pure data, no logic)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding the key-value JSON files (path only, no existence check)
    pub data_dir: PathBuf,

    /// Directory receiving exported poems
    pub export_dir: PathBuf,

    pub gateway: GatewayConfig,

    /// Upload size limit; 0 means the file did not say
    pub max_upload_bytes: u64,
}

impl AppConfig {
    /// Create AppConfig from TOML value
    ///
    /// **Prohibited**: This method must NOT contain any validation or default
    /// value logic. Missing entries become empty values.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let str_at = |section: &str, key: &str| -> String {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };

        Ok(Self {
            data_dir: PathBuf::from(str_at("storage", "data_dir")),
            export_dir: PathBuf::from(str_at("export", "output_dir")),
            gateway: GatewayConfig {
                base_url: str_at("gateway", "base_url"),
                model: str_at("gateway", "model"),
                api_key_env: str_at("gateway", "api_key_env"),
            },
            max_upload_bytes: toml_value
                .get("upload")
                .and_then(|u| u.get("max_size_bytes"))
                .and_then(|v| v.as_integer())
                .unwrap_or(0)
                .max(0) as u64,
        })
    }

    /// Create AppConfig with system-default paths for production use
    ///
    /// The base directory is computed by the caller (e.g. with the `dirs` crate).
    pub fn with_system_defaults(data_dir: PathBuf) -> Self {
        Self {
            export_dir: data_dir.join("exports"),
            data_dir,
            gateway: GatewayConfig {
                base_url: DEFAULT_GATEWAY_BASE_URL.to_string(),
                model: DEFAULT_GATEWAY_MODEL.to_string(),
                api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            },
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Fill every empty fact with the value from `defaults`.
    pub fn or_defaults(self, defaults: AppConfig) -> Self {
        fn pick_path(value: PathBuf, fallback: PathBuf) -> PathBuf {
            if value.as_os_str().is_empty() {
                fallback
            } else {
                value
            }
        }
        fn pick_str(value: String, fallback: String) -> String {
            if value.is_empty() {
                fallback
            } else {
                value
            }
        }

        Self {
            data_dir: pick_path(self.data_dir, defaults.data_dir),
            export_dir: pick_path(self.export_dir, defaults.export_dir),
            gateway: GatewayConfig {
                base_url: pick_str(self.gateway.base_url, defaults.gateway.base_url),
                model: pick_str(self.gateway.model, defaults.gateway.model),
                api_key_env: pick_str(self.gateway.api_key_env, defaults.gateway.api_key_env),
            },
            max_upload_bytes: if self.max_upload_bytes == 0 {
                defaults.max_upload_bytes
            } else {
                self.max_upload_bytes
            },
        }
    }
}

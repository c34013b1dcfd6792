use crate::core::presenter::OutputStyle;
use crate::utils::error::{FinderError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://apis.cineplex.com/prod/cpx/theatrical/api/v1";
pub const API_KEY_ENV: &str = "CINEPLEX_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinderConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub subscription_key: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// 傳輸層逾時；未設定時沿用 reqwest 預設
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default = "default_directory_path")]
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub style: OutputStyle,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_directory_path() -> String {
    "theatres.json".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            subscription_key: String::new(),
            language: default_language(),
            timeout_seconds: None,
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, subscription_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            subscription_key: subscription_key.into(),
            ..Self::default()
        }
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            path: default_directory_path(),
        }
    }
}

impl FinderConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FinderError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FinderError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CINEPLEX_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FinderError::ConfigError {
            message: format!("placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 金鑰仍為空時，改用環境變數
    pub fn apply_env_fallback(&mut self) {
        if self.api.subscription_key.trim().is_empty() {
            if let Ok(key) = std::env::var(API_KEY_ENV) {
                tracing::debug!("Using subscription key from {}", API_KEY_ENV);
                self.api.subscription_key = key;
            }
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("api.base_url", &self.api.base_url)?;
        validation::validate_secret("api.subscription_key", &self.api.subscription_key)?;
        validation::validate_non_empty_string("api.language", &self.api.language)?;

        if let Some(timeout) = self.api.timeout_seconds {
            validation::validate_range("api.timeout_seconds", timeout, 1, 300)?;
        }

        validation::validate_path("directory.path", &self.directory.path)?;
        Ok(())
    }
}

impl Validate for FinderConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[api]
base_url = "https://api.example.com/v1"
subscription_key = "secret"
language = "fr"
timeout_seconds = 10

[directory]
path = "data/theatres.json"

[output]
style = "table"
"#;

        let config = FinderConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.api.base_url, "https://api.example.com/v1");
        assert_eq!(config.api.language, "fr");
        assert_eq!(config.api.timeout_seconds, Some(10));
        assert_eq!(config.directory.path, "data/theatres.json");
        assert_eq!(config.output.style, OutputStyle::Table);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_for_missing_sections() {
        let config = FinderConfig::from_toml_str("[api]\nsubscription_key = \"k\"\n").unwrap();

        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.language, "en");
        assert_eq!(config.api.timeout_seconds, None);
        assert_eq!(config.directory.path, "theatres.json");
        assert_eq!(config.output.style, OutputStyle::List);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SHOWTIME_TEST_KEY", "from-env");

        let toml_content = r#"
[api]
subscription_key = "${SHOWTIME_TEST_KEY}"
"#;

        let config = FinderConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api.subscription_key, "from-env");

        std::env::remove_var("SHOWTIME_TEST_KEY");
    }

    #[test]
    fn test_unsubstituted_placeholder_fails_validation() {
        let toml_content = r#"
[api]
subscription_key = "${SHOWTIME_TEST_KEY_THAT_IS_NEVER_SET}"
"#;

        let config = FinderConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(FinderError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_missing_key_fails_validation() {
        let config = FinderConfig::default();
        assert!(matches!(
            config.validate(),
            Err(FinderError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_invalid_style_is_rejected() {
        let result = FinderConfig::from_toml_str("[output]\nstyle = \"html\"\n");
        assert!(matches!(result, Err(FinderError::ConfigError { .. })));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[api]\nsubscription_key = \"file-key\"\n")
            .unwrap();

        let config = FinderConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.api.subscription_key, "file-key");
    }
}

use crate::domain::model::Role;
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

pub const DEFAULT_FEED_ENDPOINT: &str =
    "https://ogienurdiana.com/career/ecc694ce4e7f6e45a5a7912cde9fe131";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub feed: FeedConfig,
    pub search: SearchConfig,
    pub docs: DocsConfig,
    pub logging: LoggingConfig,
    pub users: Vec<SeedUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub endpoint: String,
    /// 未設定時沿用 HTTP client 預設值
    pub timeout_seconds: Option<u64>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_FEED_ENDPOINT.to_string(),
            timeout_seconds: None,
        }
    }
}

/// Feed column names used by the search endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub name_field: String,
    pub nim_field: String,
    pub ymd_field: String,
    pub presets: SearchPresets,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            name_field: "NAMA".to_string(),
            nim_field: "NIM".to_string(),
            ymd_field: "YMD".to_string(),
            presets: SearchPresets::default(),
        }
    }
}

/// Default targets of the fixed exact-search endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchPresets {
    pub name: String,
    pub nim: String,
    pub ymd: String,
}

impl Default for SearchPresets {
    fn default() -> Self {
        Self {
            name: "Turner Mia".to_string(),
            nim: "9352078461".to_string(),
            ymd: "20230405".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    pub spec_path: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            spec_path: "docs/openapi.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Account created at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedUser {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content)
            .map_err(|e| AppError::config("toml_parsing", format!("TOML parsing error: {}", e)))
    }

    /// 替換環境變數 (例如 ${ADMIN_PASSWORD})，找不到的保留原字串
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("feed.endpoint", &self.feed.endpoint)?;
        validation::validate_non_empty_string("server.host", &self.server.host)?;
        validation::validate_positive_number("server.port", self.server.port as usize, 1)?;

        if let Some(timeout) = self.feed.timeout_seconds {
            validation::validate_range("feed.timeout_seconds", timeout, 1, 600)?;
        }

        validation::validate_non_empty_string("search.name_field", &self.search.name_field)?;
        validation::validate_non_empty_string("search.nim_field", &self.search.nim_field)?;
        validation::validate_non_empty_string("search.ymd_field", &self.search.ymd_field)?;
        validation::validate_non_empty_string("docs.spec_path", &self.docs.spec_path)?;

        let mut emails = HashSet::new();
        for (index, user) in self.users.iter().enumerate() {
            let prefix = format!("users[{index}]");
            validation::validate_non_empty_string(&format!("{prefix}.name"), &user.name)?;
            validation::validate_email(&format!("{prefix}.email"), &user.email)?;
            validation::validate_password(&format!("{prefix}.password"), &user.password)?;

            if env_var_pattern().is_match(&user.password) {
                return Err(AppError::config(
                    format!("{prefix}.password"),
                    "environment variable placeholder was not resolved",
                ));
            }

            if !emails.insert(user.email.to_lowercase()) {
                return Err(AppError::config(
                    format!("{prefix}.email"),
                    format!("duplicate seed user email: {}", user.email),
                ));
            }
        }

        Ok(())
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
[server]
host = "127.0.0.1"
port = 9000

[feed]
endpoint = "https://feed.example.com/data"
timeout_seconds = 10

[search]
name_field = "NAME"

[search.presets]
name = "Jane Doe"

[logging]
level = "debug"
json = true

[[users]]
name = "Admin"
email = "admin@example.com"
password = "password"
role = "admin"

[[users]]
name = "John Doe"
email = "john@example.com"
password = "password123"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.server.address(), "127.0.0.1:9000");
        assert_eq!(config.feed.endpoint, "https://feed.example.com/data");
        assert_eq!(config.feed.timeout_seconds, Some(10));
        assert_eq!(config.search.name_field, "NAME");
        assert_eq!(config.search.nim_field, "NIM");
        assert_eq!(config.search.presets.name, "Jane Doe");
        assert_eq!(config.search.presets.nim, "9352078461");
        assert!(config.logging.json);
        assert_eq!(config.users.len(), 2);
        assert_eq!(config.users[0].role, Role::Admin);
        assert_eq!(config.users[1].role, Role::User);
        assert!(config.users[1].is_active);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();

        assert_eq!(config.feed.endpoint, DEFAULT_FEED_ENDPOINT);
        assert_eq!(config.feed.timeout_seconds, None);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.search, SearchConfig::default());
        assert!(config.users.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("FEED_SEARCH_TEST_ENDPOINT", "https://test.feed.com");

        let toml_content = r#"
[feed]
endpoint = "${FEED_SEARCH_TEST_ENDPOINT}"

[[users]]
name = "Admin"
email = "admin@example.com"
password = "${FEED_SEARCH_TEST_UNSET_PASSWORD}"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.feed.endpoint, "https://test.feed.com");
        assert_eq!(config.users[0].password, "${FEED_SEARCH_TEST_UNSET_PASSWORD}");
        assert!(matches!(config.validate(), Err(AppError::Config { .. })));

        std::env::remove_var("FEED_SEARCH_TEST_ENDPOINT");
    }

    #[test]
    fn test_config_validation_rejects_bad_endpoint() {
        let config = AppConfig::from_toml_str("[feed]\nendpoint = \"invalid-url\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_rejects_duplicate_seed_emails() {
        let toml_content = r#"
[[users]]
name = "A"
email = "same@example.com"
password = "password"

[[users]]
name = "B"
email = "SAME@example.com"
password = "password"
"#;
        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(config.validate(), Err(AppError::Config { .. })));
    }

    #[test]
    fn test_unknown_role_is_a_parse_error() {
        let toml_content = r#"
[[users]]
name = "A"
email = "a@example.com"
password = "password"
role = "root"
"#;
        assert!(AppConfig::from_toml_str(toml_content).is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nport = 3000\n")
            .unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = AppConfig::from_file("/definitely/not/here/feed-search.toml");
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}

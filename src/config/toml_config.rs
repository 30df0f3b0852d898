use crate::domain::ports::ConfigProvider;
use crate::utils::error::{CatalogError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 單次執行最多抓取的 PlayStation 頁數
pub const MAX_PAGE_SPAN: u32 = 100;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/140.0.0.0 Safari/537.36 Edg/140.0.0.0";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub playstation: PlayStationConfig,
    pub app_store: AppStoreConfig,
    pub google_play: GooglePlayConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayStationConfig {
    pub endpoint: String,
    pub operation_name: String,
    pub persisted_query_hash: String,
    pub category_id: String,
    pub page_size: u32,
    pub start_page: u32,
    pub end_page: u32,
    pub timeout_seconds: u64,
    /// 頁與頁之間的等待，0 表示不等待
    pub request_delay_ms: u64,
}

impl Default for PlayStationConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://web.np.playstation.com/api/graphql/v1/op".to_string(),
            operation_name: "categoryGridRetrieve".to_string(),
            persisted_query_hash:
                "be843d8d063502a54309ccfbedbcefaad4de7f923f8952a6f098ff388df0f25a".to_string(),
            category_id: "28c9c2b2-cecc-415c-9a08-482a605cb104".to_string(),
            page_size: 20,
            start_page: 1,
            end_page: 1,
            timeout_seconds: 10,
            request_delay_ms: 0,
        }
    }
}

/// iTunes RSS 榜單
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppStoreConfig {
    pub endpoint: String,
    pub limit: u32,
    pub timeout_seconds: u64,
}

impl Default for AppStoreConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://itunes.apple.com".to_string(),
            limit: 100,
            timeout_seconds: 10,
        }
    }
}

impl AppStoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// 回傳 Google Play 原生記錄陣列的榜單服務
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GooglePlayConfig {
    pub endpoint: String,
    pub limit: u32,
    pub timeout_seconds: u64,
    pub full_detail: bool,
}

impl Default for GooglePlayConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/googleplay/list".to_string(),
            limit: 100,
            timeout_seconds: 10,
            full_detail: true,
        }
    }
}

impl GooglePlayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub proxy_url: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy_url: None,
        }
    }
}

impl CatalogConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CatalogError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CatalogError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 有給路徑就讀檔，否則使用預設值
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// 替換環境變數 (例如 ${PROXY_URL})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CatalogError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 以環境變數覆蓋部分設定（Lambda 使用）
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(proxy) = std::env::var("STORE_RANKINGS_PROXY") {
            if !proxy.trim().is_empty() {
                self.http.proxy_url = Some(proxy);
            }
        }
        if let Ok(endpoint) = std::env::var("GOOGLE_PLAY_ENDPOINT") {
            self.google_play.endpoint = endpoint;
        }
        if let Some(size) = parse_env_u32("PS_PAGE_SIZE")? {
            self.playstation.page_size = size;
        }
        if let Some(end) = parse_env_u32("PS_END_PAGE")? {
            self.playstation.end_page = end;
        }
        Ok(())
    }

    pub fn validate_config(&self) -> Result<()> {
        let ps = &self.playstation;
        validation::validate_http_url("playstation.endpoint", &ps.endpoint)?;
        validation::validate_not_blank("playstation.operation_name", &ps.operation_name)?;
        validation::validate_not_blank(
            "playstation.persisted_query_hash",
            &ps.persisted_query_hash,
        )?;
        validation::validate_not_blank("playstation.category_id", &ps.category_id)?;
        validation::validate_range("playstation.page_size", ps.page_size, 1, 100)?;
        validation::validate_at_least("playstation.start_page", ps.start_page, 1)?;
        // start_page > end_page 是合法的空範圍
        if ps.end_page >= ps.start_page {
            validation::validate_range(
                "playstation.end_page",
                ps.end_page - ps.start_page + 1,
                1,
                MAX_PAGE_SPAN,
            )?;
        }
        validation::validate_at_least("playstation.timeout_seconds", ps.timeout_seconds, 1)?;

        validation::validate_http_url("app_store.endpoint", &self.app_store.endpoint)?;
        validation::validate_range("app_store.limit", self.app_store.limit, 1, 100)?;
        validation::validate_at_least(
            "app_store.timeout_seconds",
            self.app_store.timeout_seconds,
            1,
        )?;

        validation::validate_http_url("google_play.endpoint", &self.google_play.endpoint)?;
        validation::validate_range("google_play.limit", self.google_play.limit, 1, 100)?;
        validation::validate_at_least(
            "google_play.timeout_seconds",
            self.google_play.timeout_seconds,
            1,
        )?;

        validation::validate_not_blank("http.user_agent", &self.http.user_agent)?;
        if let Some(proxy) = &self.http.proxy_url {
            validation::validate_http_url("http.proxy_url", proxy)?;
        }

        Ok(())
    }
}

fn parse_env_u32(name: &str) -> Result<Option<u32>> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CatalogError::InvalidConfigValueError {
                field: name.to_string(),
                value,
                reason: "Expected a positive integer".to_string(),
            }),
        Err(_) => Ok(None),
    }
}

impl ConfigProvider for CatalogConfig {
    fn playstation_endpoint(&self) -> &str {
        &self.playstation.endpoint
    }

    fn operation_name(&self) -> &str {
        &self.playstation.operation_name
    }

    fn persisted_query_hash(&self) -> &str {
        &self.playstation.persisted_query_hash
    }

    fn category_id(&self) -> &str {
        &self.playstation.category_id
    }

    fn page_size(&self) -> u32 {
        self.playstation.page_size
    }

    fn page_range(&self) -> (u32, u32) {
        (self.playstation.start_page, self.playstation.end_page)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.playstation.timeout_seconds)
    }

    fn request_delay(&self) -> Duration {
        Duration::from_millis(self.playstation.request_delay_ms)
    }

    fn user_agent(&self) -> &str {
        &self.http.user_agent
    }

    fn proxy_url(&self) -> Option<&str> {
        self.http.proxy_url.as_deref()
    }
}

impl Validate for CatalogConfig {
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
    fn test_empty_toml_yields_defaults() {
        let config = CatalogConfig::from_toml_str("").unwrap();

        assert_eq!(config.page_size(), 20);
        assert_eq!(config.page_range(), (1, 1));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.request_delay(), Duration::ZERO);
        assert_eq!(config.operation_name(), "categoryGridRetrieve");
        assert!(config.proxy_url().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml_config() {
        let toml_content = r#"
[playstation]
page_size = 50
end_page = 3

[google_play]
endpoint = "http://localhost:3000/list"

[http]
proxy_url = "http://127.0.0.1:7890"
"#;

        let config = CatalogConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.playstation.page_size, 50);
        assert_eq!(config.page_range(), (1, 3));
        assert_eq!(config.playstation.timeout_seconds, 10);
        assert_eq!(config.google_play.endpoint, "http://localhost:3000/list");
        assert_eq!(config.app_store.endpoint, "https://itunes.apple.com");
        assert_eq!(config.proxy_url(), Some("http://127.0.0.1:7890"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_STORE_RANKINGS_PROXY", "http://proxy.test:3128");

        let toml_content = r#"
[http]
proxy_url = "${TEST_STORE_RANKINGS_PROXY}"
"#;

        let config = CatalogConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.proxy_url(), Some("http://proxy.test:3128"));

        std::env::remove_var("TEST_STORE_RANKINGS_PROXY");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[playstation]
endpoint = "invalid-url"
"#;
        let config = CatalogConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = r#"
[playstation]
page_size = 0
"#;
        let config = CatalogConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_page_span_is_bounded() {
        let mut config = CatalogConfig::default();
        config.playstation.start_page = 1;
        config.playstation.end_page = 100;
        assert!(config.validate().is_ok());

        config.playstation.end_page = 101;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidConfigValueError { ref field, .. } if field == "playstation.end_page"
        ));

        config.playstation.start_page = 5;
        config.playstation.end_page = 2;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let err = CatalogConfig::from_toml_str("[playstation\npage_size = 1").unwrap_err();
        assert!(matches!(err, CatalogError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[playstation]
category_id = "4cbf39e2-5749-4970-ba81-93a489e4570c"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = CatalogConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.category_id(), "4cbf39e2-5749-4970-ba81-93a489e4570c");
    }
}

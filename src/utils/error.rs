use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Unsupported region '{country}'. Supported regions: {}", .supported.join(", "))]
    UnsupportedRegion {
        country: String,
        supported: Vec<String>,
    },

    #[error("Invalid collection '{collection}' for {backend}. Valid collections: {}", .valid.join(", "))]
    InvalidCollection {
        backend: String,
        collection: String,
        valid: Vec<String>,
    },

    #[error("Invalid response shape from {backend}: {message}")]
    UpstreamShapeError { backend: String, message: String },

    #[error("{backend} request failed: {message}")]
    UpstreamError { backend: String, message: String },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Upstream,
    Network,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CatalogError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CatalogError::UnsupportedRegion { .. } | CatalogError::InvalidCollection { .. } => {
                ErrorCategory::Validation
            }
            CatalogError::UpstreamShapeError { .. } | CatalogError::UpstreamError { .. } => {
                ErrorCategory::Upstream
            }
            CatalogError::HttpError(_) => ErrorCategory::Network,
            CatalogError::CsvError(_) | CatalogError::SerializationError(_) => ErrorCategory::Data,
            CatalogError::ConfigError { .. }
            | CatalogError::ConfigValidationError { .. }
            | CatalogError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            CatalogError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::High,
            ErrorCategory::Upstream | ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 對應給路由層的 HTTP 狀態碼
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::Validation => 400,
            ErrorCategory::Upstream | ErrorCategory::Network => 502,
            _ => 500,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CatalogError::UnsupportedRegion { supported, .. } => {
                format!("Use one of the supported regions: {}", supported.join(", "))
            }
            CatalogError::InvalidCollection { valid, .. } => {
                format!("Use one of the valid collections: {}", valid.join(", "))
            }
            CatalogError::UpstreamShapeError { .. } => {
                "The upstream store changed its response format; check the endpoint and query hash".to_string()
            }
            CatalogError::UpstreamError { .. } | CatalogError::HttpError(_) => {
                "Check network connectivity or proxy settings and retry later".to_string()
            }
            CatalogError::CsvError(_) | CatalogError::SerializationError(_) => {
                "Inspect the upstream payload; it could not be serialized".to_string()
            }
            CatalogError::IoError(_) => "Check file permissions and available disk space".to_string(),
            CatalogError::ConfigError { .. }
            | CatalogError::ConfigValidationError { .. }
            | CatalogError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line arguments".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CatalogError::UnsupportedRegion { country, .. } => {
                format!("Region '{}' is not supported", country)
            }
            CatalogError::InvalidCollection {
                backend, collection, ..
            } => format!("'{}' is not a valid {} collection", collection, backend),
            CatalogError::UpstreamShapeError { backend, .. } => {
                format!("{} returned an invalid response", backend)
            }
            CatalogError::UpstreamError { backend, .. } => {
                format!("Failed to fetch data from {}", backend)
            }
            other => other.to_string(),
        }
    }

    /// 驗證錯誤附帶的有效值清單
    pub fn valid_values(&self) -> Option<&[String]> {
        match self {
            CatalogError::UnsupportedRegion { supported, .. } => Some(supported.as_slice()),
            CatalogError::InvalidCollection { valid, .. } => Some(valid.as_slice()),
            _ => None,
        }
    }
}

/// 單頁請求失敗的原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "status")]
pub enum PageFailureKind {
    Transport,
    Timeout,
    HttpStatus(u16),
    MissingPageInfo,
    Decode,
    InvalidRequest,
}

/// 單頁失敗只影響該頁，由聚合器吸收
#[derive(Error, Debug, Clone, Serialize)]
#[error("page {page} failed ({kind:?}): {detail}")]
pub struct PageFetchFailure {
    pub page: u32,
    pub kind: PageFailureKind,
    pub detail: String,
}

impl PageFetchFailure {
    pub fn new(page: u32, kind: PageFailureKind, detail: impl Into<String>) -> Self {
        Self {
            page,
            kind,
            detail: detail.into(),
        }
    }

    /// 將傳輸層錯誤折疊為單頁失敗
    pub fn from_transport(page: u32, err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            PageFailureKind::Timeout
        } else if let Some(status) = err.status() {
            PageFailureKind::HttpStatus(status.as_u16())
        } else if err.is_decode() {
            PageFailureKind::Decode
        } else {
            PageFailureKind::Transport
        };
        Self::new(page, kind, err.to_string())
    }
}

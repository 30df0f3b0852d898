use crate::utils::error::{CatalogError, Result};
use std::fmt::Display;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl Display, reason: impl Into<String>) -> CatalogError {
    CatalogError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// 上游端點與 proxy 只接受帶主機名的 http/https
pub fn validate_http_url(field: &str, value: &str) -> Result<Url> {
    let url = Url::parse(value.trim()).map_err(|e| invalid(field, value, format!("Invalid URL: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field,
            value,
            format!("Scheme '{}' is not supported, use http or https", url.scheme()),
        ));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid(field, value, "URL has no host"));
    }
    Ok(url)
}

pub fn validate_output_path(field: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field, path, "Output path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field, path.escape_default(), "Output path contains a NUL byte"));
    }
    Ok(())
}

pub fn validate_not_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "Value cannot be blank"));
    }
    Ok(())
}

pub fn validate_at_least<T: PartialOrd + Display>(field: &str, value: T, min: T) -> Result<()> {
    if value < min {
        return Err(invalid(field, &value, format!("Value must be at least {}", min)));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + Display>(field: &str, value: T, min: T, max: T) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(field, &value, format!("Value must be between {} and {}", min, max)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_url_rules() {
        let url = validate_http_url("playstation.endpoint", "https://web.np.playstation.com/api/graphql/v1/op").unwrap();
        assert_eq!(url.host_str(), Some("web.np.playstation.com"));

        assert!(validate_http_url("http.proxy_url", "http://127.0.0.1:7890").is_ok());
        assert!(validate_http_url("http.proxy_url", "socks5://127.0.0.1:1080").is_err());
        assert!(validate_http_url("app_store.endpoint", "").is_err());
        assert!(validate_http_url("app_store.endpoint", "itunes.apple.com").is_err());
    }

    #[test]
    fn test_numeric_bounds() {
        assert!(validate_range("playstation.page_size", 20u32, 1, 100).is_ok());
        assert!(validate_range("playstation.page_size", 0u32, 1, 100).is_err());
        assert!(validate_range("google_play.limit", 101u32, 1, 100).is_err());
        assert!(validate_at_least("playstation.start_page", 1u32, 1).is_ok());
        assert!(validate_at_least("app_store.timeout_seconds", 0u64, 1).is_err());
    }

    #[test]
    fn test_output_path() {
        assert!(validate_output_path("output", "out/rankings.csv").is_ok());
        assert!(validate_output_path("output", "  ").is_err());
        assert!(validate_output_path("output", "bad\0name").is_err());
    }
}

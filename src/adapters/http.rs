use crate::utils::error::{CatalogError, Result};
use reqwest::{Client, Proxy};
use std::time::Duration;

/// 每個 adapter 建一次，之後唯讀共用
pub fn build_client(timeout: Duration, user_agent: &str, proxy_url: Option<&str>) -> Result<Client> {
    let mut builder = Client::builder().timeout(timeout).user_agent(user_agent);

    if let Some(proxy_url) = proxy_url {
        let proxy = Proxy::all(proxy_url).map_err(|e| CatalogError::InvalidConfigValueError {
            field: "http.proxy_url".to_string(),
            value: proxy_url.to_string(),
            reason: e.to_string(),
        })?;
        tracing::debug!("Routing outbound requests through proxy {}", proxy_url);
        builder = builder.proxy(proxy);
    }

    builder.build().map_err(|e| CatalogError::ConfigError {
        message: format!("Failed to build HTTP client: {}", e),
    })
}

/// 錯誤訊息只保留回應內容開頭
pub fn snippet(body: &str) -> String {
    const LIMIT: usize = 200;
    match body.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

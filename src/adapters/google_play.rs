use crate::adapters::http::{build_client, snippet};
use crate::config::toml_config::CatalogConfig;
use crate::domain::ports::{ListQuery, MarketplaceClient};
use crate::utils::error::{CatalogError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

const BACKEND: &str = "Google Play";

/// 呼叫回傳 google-play-scraper 格式記錄的榜單服務
pub struct ScraperServiceClient {
    client: Client,
    endpoint: String,
    full_detail: bool,
}

impl ScraperServiceClient {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let client = build_client(
            config.google_play.timeout(),
            &config.http.user_agent,
            config.http.proxy_url.as_deref(),
        )?;
        Ok(Self {
            client,
            endpoint: config.google_play.endpoint.clone(),
            full_detail: config.google_play.full_detail,
        })
    }
}

#[async_trait]
impl MarketplaceClient for ScraperServiceClient {
    async fn list(&self, query: &ListQuery) -> Result<Value> {
        tracing::debug!(
            "📡 Google Play list request: collection={}, country={}, num={}",
            query.collection,
            query.country,
            query.num
        );

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("collection", query.collection.clone()),
                ("country", query.country.clone()),
                ("num", query.num.to_string()),
                ("fullDetail", self.full_detail.to_string()),
            ])
            .send()
            .await
            .map_err(|e| CatalogError::UpstreamError {
                backend: BACKEND.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(CatalogError::UpstreamError {
                backend: BACKEND.to_string(),
                message: format!("HTTP {}: {}", status.as_u16(), snippet(&body)),
            });
        }

        // 形狀檢查交給分派器
        serde_json::from_str(&body).map_err(|e| CatalogError::UpstreamShapeError {
            backend: BACKEND.to_string(),
            message: format!("invalid JSON: {}", e),
        })
    }
}

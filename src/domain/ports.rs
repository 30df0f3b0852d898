use crate::domain::model::{PageOutcome, PageRequest};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// 上游商店榜單查詢參數
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub collection: String,
    pub country: String,
    pub num: u32,
}

/// 現成商店客戶端的呼叫契約：回傳原生記錄，額外欄位一律忽略
#[async_trait]
pub trait MarketplaceClient: Send + Sync {
    async fn list(&self, query: &ListQuery) -> Result<serde_json::Value>;
}

/// 單頁抓取；失敗只屬於該頁
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> PageOutcome;
}

pub trait ConfigProvider: Send + Sync {
    fn playstation_endpoint(&self) -> &str;
    fn operation_name(&self) -> &str;
    fn persisted_query_hash(&self) -> &str;
    fn category_id(&self) -> &str;
    fn page_size(&self) -> u32;
    fn page_range(&self) -> (u32, u32);
    fn request_timeout(&self) -> Duration;
    fn request_delay(&self) -> Duration;
    fn user_agent(&self) -> &str;
    fn proxy_url(&self) -> Option<&str>;
}

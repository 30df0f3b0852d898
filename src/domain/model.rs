use crate::utils::error::PageFetchFailure;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 三個上游商店，集合固定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Backend {
    ConsumerAppStore,
    OpenMarketplace,
    ConsoleStore,
}

impl Backend {
    pub const ALL: [Backend; 3] = [
        Backend::ConsumerAppStore,
        Backend::OpenMarketplace,
        Backend::ConsoleStore,
    ];

    /// 解析路由參數；無法辨識時退回 App Store
    pub fn from_param(value: &str) -> Self {
        match Self::parse(value) {
            Some(backend) => backend,
            None => {
                tracing::warn!(
                    "⚠️ Unrecognized store '{}', falling back to {}",
                    value,
                    Backend::ConsumerAppStore
                );
                Backend::ConsumerAppStore
            }
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "appstore" | "app_store" | "ios" => Some(Backend::ConsumerAppStore),
            "googleplay" | "google_play" | "android" => Some(Backend::OpenMarketplace),
            "playstation" | "psstore" | "ps" => Some(Backend::ConsoleStore),
            _ => None,
        }
    }

    pub fn param(&self) -> &'static str {
        match self {
            Backend::ConsumerAppStore => "appstore",
            Backend::OpenMarketplace => "googleplay",
            Backend::ConsoleStore => "playstation",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Backend::ConsumerAppStore => "App Store",
            Backend::OpenMarketplace => "Google Play",
            Backend::ConsoleStore => "PlayStation Store",
        }
    }

    pub fn store_label(&self) -> StoreLabel {
        match self {
            Backend::ConsumerAppStore => StoreLabel::ConsumerAppStore,
            Backend::OpenMarketplace => StoreLabel::OpenMarketplace,
            Backend::ConsoleStore => StoreLabel::ConsoleStore,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoreLabel {
    ConsumerAppStore,
    OpenMarketplace,
    ConsoleStore,
}

impl StoreLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreLabel::ConsumerAppStore => "ConsumerAppStore",
            StoreLabel::OpenMarketplace => "OpenMarketplace",
            StoreLabel::ConsoleStore => "ConsoleStore",
        }
    }
}

impl fmt::Display for StoreLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 三個商店共用的標準化記錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppEntry {
    pub id: String,
    pub app_id: String,
    pub title: String,
    pub url: String,
    pub icon: String,
    pub developer: String,
    pub developer_url: String,
    pub primary_genre: String,
    pub genres: Vec<String>,
    pub price: f64,
    pub currency: String,
    pub free: bool,
    pub description: String,
    pub screenshots: Vec<String>,
    pub content_rating: String,
    pub score: f64,
    pub reviews: u64,
    pub version: String,
    pub released: String,
    pub updated: String,
    pub store: StoreLabel,
}

impl AppEntry {
    pub fn new(store: StoreLabel) -> Self {
        Self {
            id: String::new(),
            app_id: String::new(),
            title: String::new(),
            url: String::new(),
            icon: String::new(),
            developer: String::new(),
            developer_url: String::new(),
            primary_genre: String::new(),
            genres: Vec::new(),
            price: 0.0,
            currency: "USD".to_string(),
            free: false,
            description: String::new(),
            screenshots: Vec::new(),
            content_rating: String::new(),
            score: 0.0,
            reviews: 0,
            version: String::new(),
            released: String::new(),
            updated: String::new(),
            store,
        }
    }

    /// id 與 title 不可同時為空
    pub fn is_identifiable(&self) -> bool {
        !(self.id.is_empty() && self.title.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub collection: String,
    pub country: String,
    pub page_index: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(collection: &str, country: &str, page_index: u32, page_size: u32) -> Self {
        Self {
            collection: collection.to_string(),
            country: country.to_string(),
            page_index,
            page_size,
        }
    }

    /// 頁碼從 1 開始
    pub fn offset(&self) -> u64 {
        u64::from(self.page_index.saturating_sub(1)) * u64::from(self.page_size)
    }
}

#[derive(Debug, Clone)]
pub struct PageResult {
    pub page_index: u32,
    pub items: Vec<serde_json::Value>,
    pub total_count: u64,
    pub total_pages: u32,
}

pub type PageOutcome = std::result::Result<PageResult, PageFetchFailure>;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    pub entries: Vec<AppEntry>,
    pub total_pages: u32,
    pub failed_pages: Vec<PageFetchFailure>,
}

impl AggregationResult {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            total_pages: 1,
            failed_pages: Vec::new(),
        }
    }
}

/// 分派器對外回傳的結果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogListing {
    pub store: StoreLabel,
    pub collection: String,
    pub country: String,
    pub entries: Vec<AppEntry>,
    pub total_pages: u32,
    pub failed_pages: Vec<PageFetchFailure>,
}

impl CatalogListing {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 有頁面失敗或結果為空時視為降級
    pub fn is_degraded(&self) -> bool {
        self.entries.is_empty() || !self.failed_pages.is_empty()
    }
}

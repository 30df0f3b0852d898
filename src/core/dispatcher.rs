use crate::adapters::{ITunesRssClient, PsStoreClient, ScraperServiceClient};
use crate::config::toml_config::CatalogConfig;
use crate::core::aggregator::PaginationAggregator;
use crate::core::normalizer::normalize;
use crate::domain::collections::{self, CollectionSpec};
use crate::domain::locale;
use crate::domain::model::{AppEntry, Backend, CatalogListing};
use crate::domain::ports::{ConfigProvider, ListQuery, MarketplaceClient, PageSource};
use crate::utils::error::{CatalogError, Result};
use serde_json::Value;
use std::time::Duration;

/// 現成商店客戶端單次最多取 100 筆
pub const MAX_LIST_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSettings {
    pub start_page: u32,
    pub end_page: u32,
    pub page_size: u32,
    pub request_delay: Duration,
    pub app_store_limit: u32,
    pub google_play_limit: u32,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            start_page: 1,
            end_page: 1,
            page_size: 20,
            request_delay: Duration::ZERO,
            app_store_limit: MAX_LIST_SIZE,
            google_play_limit: MAX_LIST_SIZE,
        }
    }
}

impl DispatchSettings {
    pub fn from_config(config: &CatalogConfig) -> Self {
        let (start_page, end_page) = config.page_range();
        Self {
            start_page,
            end_page,
            page_size: config.page_size(),
            request_delay: config.request_delay(),
            app_store_limit: config.app_store.limit,
            google_play_limit: config.google_play.limit,
        }
    }
}

/// 驗證 {store, collection, country} 後分派到對應商店並標準化
pub struct CatalogDispatcher<P, A, G>
where
    P: PageSource,
    A: MarketplaceClient,
    G: MarketplaceClient,
{
    playstation: P,
    app_store: A,
    google_play: G,
    settings: DispatchSettings,
}

pub type DefaultDispatcher = CatalogDispatcher<PsStoreClient, ITunesRssClient, ScraperServiceClient>;

impl DefaultDispatcher {
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        Ok(CatalogDispatcher::new(
            PsStoreClient::new(config)?,
            ITunesRssClient::new(config)?,
            ScraperServiceClient::new(config)?,
            DispatchSettings::from_config(config),
        ))
    }
}

impl<P, A, G> CatalogDispatcher<P, A, G>
where
    P: PageSource,
    A: MarketplaceClient,
    G: MarketplaceClient,
{
    pub fn new(playstation: P, app_store: A, google_play: G, settings: DispatchSettings) -> Self {
        Self {
            playstation,
            app_store,
            google_play,
            settings,
        }
    }

    /// 只有 PlayStation 在本地驗證地區，其餘交給各自的客戶端
    pub fn validate(
        backend: Backend,
        collection: &str,
        country: &str,
    ) -> Result<&'static CollectionSpec> {
        let spec = collections::resolve(backend, collection)?;
        if backend == Backend::ConsoleStore {
            locale::resolve(country)?;
        }
        Ok(spec)
    }

    pub async fn fetch_catalog(
        &self,
        backend: Backend,
        collection: &str,
        country: &str,
    ) -> Result<CatalogListing> {
        let spec = Self::validate(backend, collection, country)?;
        tracing::info!(
            "🔍 Fetching {} collection '{}' for country '{}'",
            backend,
            spec.id,
            country
        );

        let listing = match backend {
            Backend::ConsoleStore => {
                let settings = &self.settings;
                let aggregation = PaginationAggregator::new(&self.playstation)
                    .with_request_delay(settings.request_delay)
                    .aggregate(
                        collection,
                        country,
                        settings.start_page,
                        settings.end_page,
                        settings.page_size,
                    )
                    .await?;
                CatalogListing {
                    store: backend.store_label(),
                    collection: collection.to_string(),
                    country: country.to_string(),
                    entries: aggregation.entries,
                    total_pages: aggregation.total_pages,
                    failed_pages: aggregation.failed_pages,
                }
            }
            Backend::ConsumerAppStore => {
                let query = list_query(spec, country, self.settings.app_store_limit);
                let records = self.app_store.list(&query).await?;
                self.listing_from_records(backend, collection, country, records)?
            }
            Backend::OpenMarketplace => {
                let query = list_query(spec, country, self.settings.google_play_limit);
                let records = self.google_play.list(&query).await?;
                self.listing_from_records(backend, collection, country, records)?
            }
        };

        if listing.is_empty() {
            tracing::warn!(
                "⚠️ No apps found for {} with collection '{}' and country '{}'",
                backend,
                collection,
                country
            );
        } else {
            tracing::info!(
                "✅ Fetched {} apps from {}",
                listing.entries.len(),
                backend
            );
        }
        Ok(listing)
    }

    fn listing_from_records(
        &self,
        backend: Backend,
        collection: &str,
        country: &str,
        records: Value,
    ) -> Result<CatalogListing> {
        Ok(CatalogListing {
            store: backend.store_label(),
            collection: collection.to_string(),
            country: country.to_string(),
            entries: normalize_records(backend, &records)?,
            total_pages: 1,
            failed_pages: Vec::new(),
        })
    }
}

fn list_query(spec: &CollectionSpec, country: &str, limit: u32) -> ListQuery {
    ListQuery {
        collection: spec.list_key.to_string(),
        country: country.to_string(),
        num: limit.clamp(1, MAX_LIST_SIZE),
    }
}

/// 整體回應必須是陣列，否則視為上游格式錯誤
pub fn normalize_records(backend: Backend, records: &Value) -> Result<Vec<AppEntry>> {
    let items = records
        .as_array()
        .ok_or_else(|| CatalogError::UpstreamShapeError {
            backend: backend.display_name().to_string(),
            message: "expected an array of app records".to_string(),
        })?;

    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        let entry = normalize(backend, item)?;
        if entry.is_identifiable() {
            entries.push(entry);
        } else {
            tracing::warn!("⚠️ Dropping {} record without id or title", backend);
        }
    }
    Ok(entries)
}

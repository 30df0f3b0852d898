use crate::core::normalizer::normalize;
use crate::domain::collections;
use crate::domain::locale;
use crate::domain::model::{AggregationResult, AppEntry, Backend, PageRequest};
use crate::domain::ports::PageSource;
use crate::utils::error::Result;
use std::collections::HashSet;
use std::time::Duration;

/// 依序抓取 PlayStation 分頁，單頁失敗不中斷整體
pub struct PaginationAggregator<'a, P: PageSource> {
    source: &'a P,
    request_delay: Duration,
}

impl<'a, P: PageSource> PaginationAggregator<'a, P> {
    pub fn new(source: &'a P) -> Self {
        Self {
            source,
            request_delay: Duration::ZERO,
        }
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// 參數錯誤在發出任何請求前回報；之後只會回傳（可能為空的）結果
    pub async fn aggregate(
        &self,
        collection: &str,
        country: &str,
        start_page: u32,
        end_page: u32,
        page_size: u32,
    ) -> Result<AggregationResult> {
        locale::resolve(country)?;
        collections::sort_key(collection)?;

        if start_page > end_page {
            tracing::debug!(
                "Empty page range {}..={} for {}/{}",
                start_page,
                end_page,
                collection,
                country
            );
            return Ok(AggregationResult::empty());
        }

        let mut result = AggregationResult::empty();
        let mut entries = Vec::new();

        for page_index in start_page..=end_page {
            if page_index > start_page && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }

            let request = PageRequest::new(collection, country, page_index, page_size);
            match self.source.fetch_page(&request).await {
                Ok(page) => {
                    result.total_pages = page.total_pages;
                    let before = entries.len();
                    for item in &page.items {
                        match normalize(Backend::ConsoleStore, item) {
                            Ok(entry) => entries.push(entry),
                            Err(e) => tracing::warn!("⚠️ Skipping item on page {}: {}", page_index, e),
                        }
                    }
                    tracing::info!(
                        "📄 PlayStation page {}/{}: {} items (totalCount={})",
                        page_index,
                        end_page,
                        entries.len() - before,
                        page.total_count
                    );
                }
                Err(failure) => {
                    tracing::warn!("⚠️ Failed to fetch PlayStation page {}: {}", page_index, failure);
                    result.failed_pages.push(failure);
                }
            }
        }

        result.entries = dedup_by_title(entries);
        if result.failed_pages.len() as u64 == u64::from(end_page - start_page) + 1 {
            tracing::warn!(
                "⚠️ All {} PlayStation pages failed for {}/{}",
                result.failed_pages.len(),
                collection,
                country
            );
        }
        Ok(result)
    }
}

/// 依標題去重，保留第一次出現者並丟棄空標題
pub fn dedup_by_title(entries: Vec<AppEntry>) -> Vec<AppEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| !entry.title.is_empty())
        .filter(|entry| seen.insert(entry.title.clone()))
        .collect()
}

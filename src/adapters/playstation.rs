use crate::adapters::http::{build_client, snippet};
use crate::domain::collections;
use crate::domain::locale::{self, LocaleMapping};
use crate::domain::model::{PageOutcome, PageRequest, PageResult};
use crate::domain::ports::{ConfigProvider, PageSource};
use crate::utils::error::{CatalogError, PageFailureKind, PageFetchFailure, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

/// PlayStation Store GraphQL 的 persisted query 客戶端
pub struct PsStoreClient {
    client: Client,
    endpoint: String,
    operation_name: String,
    persisted_query_hash: String,
    category_id: String,
    base_headers: HeaderMap,
}

/// 每次呼叫各自產生，不跨呼叫保存
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceIds {
    pub correlation_id: Uuid,
    pub request_id: Uuid,
}

impl TraceIds {
    pub fn generate() -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            request_id: Uuid::new_v4(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GridResponse {
    data: Option<GridData>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GridData {
    #[serde(rename = "categoryGridRetrieve")]
    grid: Option<CategoryGrid>,
}

#[derive(Debug, Deserialize)]
struct CategoryGrid {
    #[serde(rename = "pageInfo")]
    page_info: Option<PageInfo>,
    concepts: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct PageInfo {
    #[serde(rename = "totalCount", default)]
    total_count: u64,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    #[serde(default)]
    message: String,
}

impl PsStoreClient {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = build_client(config.request_timeout(), config.user_agent(), config.proxy_url())?;

        Ok(Self {
            client,
            endpoint: config.playstation_endpoint().to_string(),
            operation_name: config.operation_name().to_string(),
            persisted_query_hash: config.persisted_query_hash().to_string(),
            category_id: config.category_id().to_string(),
            base_headers: Self::base_headers()?,
        })
    }

    /// 模擬瀏覽器從 store.playstation.com 發出的請求
    fn base_headers() -> Result<HeaderMap> {
        const STATIC_HEADERS: [(&str, &str); 12] = [
            ("apollographql-client-version", "0.0.0"),
            ("dnt", "1"),
            ("origin", "https://store.playstation.com"),
            ("priority", "u=1, i"),
            ("referer", "https://store.playstation.com/"),
            (
                "sec-ch-ua",
                "\"Chromium\";v=\"140\", \"Not=A?Brand\";v=\"24\", \"Microsoft Edge\";v=\"140\"",
            ),
            ("sec-ch-ua-mobile", "?0"),
            ("sec-ch-ua-platform", "\"Windows\""),
            ("sec-fetch-dest", "empty"),
            ("sec-fetch-mode", "cors"),
            ("sec-fetch-site", "same-site"),
            ("x-psn-app-ver", "/0.0.0-"),
        ];

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in STATIC_HEADERS {
            let name = HeaderName::from_static(name);
            let value = HeaderValue::from_str(value).map_err(|e| CatalogError::ConfigError {
                message: format!("Invalid header value for {}: {}", name, e),
            })?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    fn request_headers(&self, locale: &LocaleMapping, trace: &TraceIds) -> Result<HeaderMap> {
        let mut headers = self.base_headers.clone();
        let dynamic = [
            (ACCEPT_LANGUAGE, locale.accept_language()),
            (
                HeaderName::from_static("x-psn-store-locale-override"),
                locale.store_locale(),
            ),
            (
                HeaderName::from_static("x-psn-correlation-id"),
                trace.correlation_id.to_string(),
            ),
            (
                HeaderName::from_static("x-psn-request-id"),
                trace.request_id.to_string(),
            ),
        ];
        for (name, value) in dynamic {
            let value = HeaderValue::from_str(&value).map_err(|e| CatalogError::ConfigError {
                message: format!("Invalid header value for {}: {}", name, e),
            })?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    /// categoryGridRetrieve 的 variables，鍵名依上游要求
    pub fn page_variables(&self, sort_key: &str, page_size: u32, offset: u64) -> Value {
        json!({
            "id": self.category_id,
            "pageArgs": { "size": page_size, "offset": offset },
            "sortBy": { "name": sort_key, "isAscending": false },
            "filterBy": [],
            "facetOptions": []
        })
    }

    pub fn extensions(&self) -> Value {
        json!({
            "persistedQuery": { "version": 1, "sha256Hash": self.persisted_query_hash }
        })
    }

    async fn fetch(&self, request: &PageRequest) -> PageOutcome {
        let page = request.page_index;
        let invalid =
            |e: CatalogError| PageFetchFailure::new(page, PageFailureKind::InvalidRequest, e.to_string());

        let locale = locale::resolve(&request.country).map_err(invalid)?;
        let sort_key = collections::sort_key(&request.collection).map_err(invalid)?;
        let trace = TraceIds::generate();
        let headers = self.request_headers(locale, &trace).map_err(invalid)?;

        let variables = self.page_variables(sort_key, request.page_size, request.offset());
        tracing::debug!(
            "📡 PlayStation page {} ({}): sort={}, offset={}, correlation_id={}",
            page,
            locale.store_locale(),
            sort_key,
            request.offset(),
            trace.correlation_id
        );

        let response = self
            .client
            .get(&self.endpoint)
            .headers(headers)
            .query(&[
                ("operationName", self.operation_name.clone()),
                ("variables", variables.to_string()),
                ("extensions", self.extensions().to_string()),
            ])
            .send()
            .await
            .map_err(|e| PageFetchFailure::from_transport(page, &e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PageFetchFailure::from_transport(page, &e))?;

        if !status.is_success() {
            return Err(PageFetchFailure::new(
                page,
                PageFailureKind::HttpStatus(status.as_u16()),
                snippet(&body),
            ));
        }

        let parsed: GridResponse = serde_json::from_str(&body).map_err(|e| {
            PageFetchFailure::new(page, PageFailureKind::Decode, format!("{}: {}", e, snippet(&body)))
        })?;

        let errors: Vec<String> = parsed
            .errors
            .unwrap_or_default()
            .into_iter()
            .map(|e| e.message)
            .collect();
        let grid = parsed.data.and_then(|data| data.grid);
        let (page_info, concepts) = match grid {
            Some(CategoryGrid {
                page_info: Some(page_info),
                concepts,
            }) => (page_info, concepts.unwrap_or_default()),
            _ => {
                let detail = if errors.is_empty() {
                    "response has no categoryGridRetrieve.pageInfo".to_string()
                } else {
                    format!("response has no pageInfo; errors: {}", errors.join("; "))
                };
                return Err(PageFetchFailure::new(page, PageFailureKind::MissingPageInfo, detail));
            }
        };

        let total_pages = page_info.total_count.div_ceil(u64::from(request.page_size.max(1)));
        tracing::debug!(
            "📡 PlayStation page {}: {} concepts, totalCount={}",
            page,
            concepts.len(),
            page_info.total_count
        );

        Ok(PageResult {
            page_index: page,
            items: concepts,
            total_count: page_info.total_count,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
        })
    }
}

#[async_trait]
impl PageSource for PsStoreClient {
    async fn fetch_page(&self, request: &PageRequest) -> PageOutcome {
        self.fetch(request).await
    }
}

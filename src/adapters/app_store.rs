use crate::adapters::http::{build_client, snippet};
use crate::config::toml_config::CatalogConfig;
use crate::domain::ports::{ListQuery, MarketplaceClient};
use crate::utils::error::{CatalogError, Result};
use crate::utils::validation::validate_http_url;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Map, Value};
use url::Url;

const BACKEND: &str = "App Store";

/// 透過 iTunes RSS JSON feed 取得 App Store 榜單
pub struct ITunesRssClient {
    client: Client,
    endpoint: Url,
}

impl ITunesRssClient {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let client = build_client(
            config.app_store.timeout(),
            &config.http.user_agent,
            config.http.proxy_url.as_deref(),
        )?;
        Ok(Self {
            client,
            endpoint: validate_http_url("app_store.endpoint", &config.app_store.endpoint)?,
        })
    }

    /// 每段各自 percent-encode，地區與榜單參數無法跳出 feed 路徑
    pub fn feed_url(&self, query: &ListQuery) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| CatalogError::UpstreamError {
                backend: BACKEND.to_string(),
                message: format!("endpoint {} cannot carry a feed path", self.endpoint),
            })?
            .pop_if_empty()
            .push(&query.country.trim().to_ascii_lowercase())
            .push("rss")
            .push(&query.collection)
            .push(&format!("limit={}", query.num))
            .push("json");
        Ok(url)
    }
}

/// feed.entry 可能是陣列、單一物件或不存在
pub fn feed_entries(feed: &Value) -> Result<Vec<Value>> {
    let feed = feed.get("feed").ok_or_else(|| CatalogError::UpstreamShapeError {
        backend: BACKEND.to_string(),
        message: "response has no 'feed' object".to_string(),
    })?;

    match feed.get("entry") {
        Some(Value::Array(entries)) => Ok(entries.iter().map(entry_to_record).collect()),
        Some(entry @ Value::Object(_)) => Ok(vec![entry_to_record(entry)]),
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(other) => Err(CatalogError::UpstreamShapeError {
            backend: BACKEND.to_string(),
            message: format!("unexpected 'feed.entry' value: {}", other),
        }),
    }
}

fn label<'a>(entry: &'a Value, pointer: &str) -> Option<&'a str> {
    entry.pointer(pointer).and_then(Value::as_str)
}

/// 轉成 app-store-scraper list() 的記錄格式
fn entry_to_record(entry: &Value) -> Value {
    let price = label(entry, "/im:price/attributes/amount")
        .and_then(|amount| amount.parse::<f64>().ok())
        .unwrap_or(0.0);

    // 圖示取最大尺寸（最後一個）
    let icon = entry
        .get("im:image")
        .and_then(Value::as_array)
        .and_then(|images| images.last())
        .and_then(|image| image.get("label"))
        .cloned()
        .unwrap_or(Value::Null);

    let mut record = Map::new();
    let fields = [
        ("id", label(entry, "/id/attributes/im:id")),
        ("appId", label(entry, "/id/attributes/im:bundleId")),
        ("title", label(entry, "/im:name/label")),
        ("url", label(entry, "/id/label")),
        ("currency", label(entry, "/im:price/attributes/currency")),
        ("description", label(entry, "/summary/label")),
        ("developer", label(entry, "/im:artist/label")),
        ("developerUrl", label(entry, "/im:artist/attributes/href")),
        ("genre", label(entry, "/category/attributes/label")),
        ("genreId", label(entry, "/category/attributes/im:id")),
        ("released", label(entry, "/im:releaseDate/label")),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            record.insert(key.to_string(), json!(value));
        }
    }
    record.insert("icon".to_string(), icon);
    record.insert("price".to_string(), json!(price));
    record.insert("free".to_string(), json!(price == 0.0));

    Value::Object(record)
}

#[async_trait]
impl MarketplaceClient for ITunesRssClient {
    async fn list(&self, query: &ListQuery) -> Result<Value> {
        let url = self.feed_url(query)?;
        tracing::debug!("📡 App Store feed request: {}", url);

        let response = self
            .client
            .get(url)
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

        let feed: Value = serde_json::from_str(&body).map_err(|e| CatalogError::UpstreamShapeError {
            backend: BACKEND.to_string(),
            message: format!("invalid JSON: {}", e),
        })?;

        Ok(Value::Array(feed_entries(&feed)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn rss_entry(id: &str, name: &str, amount: &str) -> Value {
        json!({
            "im:name": { "label": name },
            "im:image": [
                { "label": "https://is1.mzstatic.com/53x53.png", "attributes": { "height": "53" } },
                { "label": "https://is1.mzstatic.com/100x100.png", "attributes": { "height": "100" } }
            ],
            "summary": { "label": "A description" },
            "im:price": { "label": "Get", "attributes": { "amount": amount, "currency": "USD" } },
            "id": {
                "label": format!("https://apps.apple.com/us/app/id{}", id),
                "attributes": { "im:id": id, "im:bundleId": format!("com.example.{}", id) }
            },
            "im:artist": { "label": "Example Inc.", "attributes": { "href": "https://apps.apple.com/us/developer/id1" } },
            "category": { "attributes": { "im:id": "6014", "label": "Games" } },
            "im:releaseDate": { "label": "2024-05-01T00:00:00-07:00" }
        })
    }

    #[test]
    fn test_feed_entries_reshape_to_list_records() {
        let feed = json!({ "feed": { "entry": [rss_entry("1", "Alpha", "0.00000"), rss_entry("2", "Beta", "2.99000")] } });
        let records = feed_entries(&feed).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["id"], "1");
        assert_eq!(records[0]["appId"], "com.example.1");
        assert_eq!(records[0]["title"], "Alpha");
        assert_eq!(records[0]["icon"], "https://is1.mzstatic.com/100x100.png");
        assert_eq!(records[0]["free"], true);
        assert_eq!(records[1]["price"], 2.99);
        assert_eq!(records[1]["free"], false);
        assert_eq!(records[1]["genre"], "Games");
    }

    #[test]
    fn test_single_entry_feed_is_wrapped() {
        let feed = json!({ "feed": { "entry": rss_entry("9", "Solo", "0") } });
        assert_eq!(feed_entries(&feed).unwrap().len(), 1);

        let empty = json!({ "feed": { "author": {} } });
        assert!(feed_entries(&empty).unwrap().is_empty());

        assert!(feed_entries(&json!({ "error": "nope" })).is_err());
    }

    #[tokio::test]
    async fn test_list_requests_country_feed() {
        let server = MockServer::start();
        let feed_mock = server.mock(|when, then| {
            when.method(GET).path("/jp/rss/topfreeapplications/limit=100/json");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({ "feed": { "entry": [rss_entry("1", "Alpha", "0")] } }));
        });

        let mut config = CatalogConfig::default();
        config.app_store.endpoint = server.base_url();
        let client = ITunesRssClient::new(&config).unwrap();

        let records = client
            .list(&ListQuery {
                collection: "topfreeapplications".to_string(),
                country: "JP".to_string(),
                num: 100,
            })
            .await
            .unwrap();

        feed_mock.assert();
        assert_eq!(records.as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_feed_url_encodes_each_segment() {
        let mut config = CatalogConfig::default();
        config.app_store.endpoint = "https://itunes.apple.com/".to_string();
        let client = ITunesRssClient::new(&config).unwrap();

        let url = client
            .feed_url(&ListQuery {
                collection: "toppaidapplications".to_string(),
                country: "GB".to_string(),
                num: 50,
            })
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://itunes.apple.com/gb/rss/toppaidapplications/limit=50/json"
        );

        let url = client
            .feed_url(&ListQuery {
                collection: "topfreeapplications".to_string(),
                country: "us/../../lookup?id=1#".to_string(),
                num: 100,
            })
            .unwrap();
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
        assert!(url.path().ends_with("/rss/topfreeapplications/limit=100/json"));
        assert_eq!(url.path_segments().unwrap().count(), 5);
    }

    #[tokio::test]
    async fn test_list_surfaces_http_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET);
            then.status(500);
        });

        let mut config = CatalogConfig::default();
        config.app_store.endpoint = server.base_url();
        let client = ITunesRssClient::new(&config).unwrap();

        let err = client
            .list(&ListQuery {
                collection: "toppaidapplications".to_string(),
                country: "us".to_string(),
                num: 10,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::UpstreamError { .. }));
    }
}

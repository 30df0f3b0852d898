use crate::core::dispatcher::CatalogDispatcher;
use crate::domain::model::Backend;
use crate::domain::ports::{MarketplaceClient, PageSource};
use crate::utils::error::CatalogError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// 路由層收到的查詢參數，缺省值與網頁前端一致
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ListRequest {
    #[serde(default = "default_store")]
    pub store: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub health: Option<String>,
}

fn default_store() -> String {
    "appstore".to_string()
}

fn default_collection() -> String {
    "topfreeapplications".to_string()
}

fn default_country() -> String {
    "us".to_string()
}

impl Default for ListRequest {
    fn default() -> Self {
        Self {
            store: default_store(),
            collection: default_collection(),
            country: default_country(),
            health: None,
        }
    }
}

impl ListRequest {
    pub fn is_health_check(&self) -> bool {
        self.health.as_deref() == Some("check")
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouterResponse {
    pub status_code: u16,
    pub body: Value,
}

impl RouterResponse {
    fn ok(body: Value) -> Self {
        Self {
            status_code: 200,
            body,
        }
    }
}

pub async fn handle_list<P, A, G>(
    dispatcher: &CatalogDispatcher<P, A, G>,
    request: &ListRequest,
) -> RouterResponse
where
    P: PageSource,
    A: MarketplaceClient,
    G: MarketplaceClient,
{
    if request.is_health_check() {
        return RouterResponse::ok(json!({ "status": "ok" }));
    }

    let backend = Backend::from_param(&request.store);
    match dispatcher
        .fetch_catalog(backend, &request.collection, &request.country)
        .await
    {
        Ok(listing) => match serde_json::to_value(&listing) {
            Ok(body) => RouterResponse::ok(body),
            Err(e) => error_response(&CatalogError::from(e)),
        },
        Err(e) => error_response(&e),
    }
}

pub fn error_response(error: &CatalogError) -> RouterResponse {
    let status_code = error.status_code();
    let body = match error {
        CatalogError::InvalidCollection { valid, .. } => json!({
            "error": error.to_string(),
            "validCollections": valid,
        }),
        CatalogError::UnsupportedRegion { supported, .. } => json!({
            "error": error.to_string(),
            "supportedRegions": supported,
        }),
        _ => {
            tracing::error!("❌ Request failed: {}", error);
            json!({
                "error": error.user_friendly_message(),
                "details": error.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            })
        }
    };
    RouterResponse { status_code, body }
}

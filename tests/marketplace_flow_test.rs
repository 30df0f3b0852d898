use anyhow::Result;
use httpmock::prelude::*;
use serde_json::json;
use store_rankings::{handle_list, Backend, CatalogConfig, DefaultDispatcher, ListRequest, StoreLabel};

fn config_for(server: &MockServer) -> CatalogConfig {
    let mut config = CatalogConfig::default();
    config.app_store.endpoint = server.base_url();
    config.google_play.endpoint = server.url("/googleplay/list");
    config.google_play.limit = 50;
    config
}

#[tokio::test]
async fn test_google_play_records_keep_rich_fields() -> Result<()> {
    let server = MockServer::start();
    let list_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/googleplay/list")
            .query_param("collection", "TOP_PAID")
            .query_param("country", "gb")
            .query_param("num", "50");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!([
                {
                    "appId": "com.mojang.minecraftpe",
                    "title": "Minecraft",
                    "url": "https://play.google.com/store/apps/details?id=com.mojang.minecraftpe",
                    "icon": "https://play-lh.googleusercontent.com/icon",
                    "developer": "Mojang",
                    "genre": "Arcade",
                    "priceText": "£6.99",
                    "price": 6.99,
                    "currency": "GBP",
                    "free": false,
                    "score": 4.5,
                    "reviews": 5123456,
                    "contentRating": "Everyone 10+",
                    "unknownVendorField": { "nested": true }
                },
                { "appId": "com.example.free", "title": "Free Thing", "priceText": "Free" }
            ]));
    });

    let listing = DefaultDispatcher::from_config(&config_for(&server))?
        .fetch_catalog(Backend::OpenMarketplace, "TOP_PAID", "gb")
        .await?;

    list_mock.assert();
    assert_eq!(listing.entries.len(), 2);

    let minecraft = &listing.entries[0];
    assert_eq!(minecraft.store, StoreLabel::OpenMarketplace);
    assert_eq!(minecraft.id, "com.mojang.minecraftpe");
    assert_eq!(minecraft.currency, "GBP");
    assert_eq!(minecraft.price, 6.99);
    assert!(!minecraft.free);
    assert_eq!(minecraft.reviews, 5_123_456);
    assert_eq!(minecraft.content_rating, "Everyone 10+");

    let free = &listing.entries[1];
    assert_eq!(free.price, 0.0);
    assert!(free.free);
    assert_eq!(free.primary_genre, "Unknown");
    assert_eq!(free.currency, "USD");
    Ok(())
}

#[tokio::test]
async fn test_router_serves_app_store_defaults() -> Result<()> {
    let server = MockServer::start();
    let feed_mock = server.mock(|when, then| {
        when.method(GET).path("/us/rss/topfreeapplications/limit=100/json");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "feed": {
                    "entry": {
                        "im:name": { "label": "Only App" },
                        "im:price": { "attributes": { "amount": "0.00000", "currency": "USD" } },
                        "id": {
                            "label": "https://apps.apple.com/us/app/id42",
                            "attributes": { "im:id": "42", "im:bundleId": "com.example.only" }
                        }
                    }
                }
            }));
    });

    let dispatcher = DefaultDispatcher::from_config(&config_for(&server))?;
    let request: ListRequest = serde_json::from_value(json!({}))?;
    let response = handle_list(&dispatcher, &request).await;

    feed_mock.assert();
    assert_eq!(response.status_code, 200);
    assert_eq!(response.body["store"], "ConsumerAppStore");
    assert_eq!(response.body["entries"][0]["id"], "42");
    assert_eq!(response.body["entries"][0]["free"], true);
    Ok(())
}

#[tokio::test]
async fn test_router_maps_upstream_failure_to_502() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/googleplay/list");
        then.status(503).body("maintenance");
    });

    let dispatcher = DefaultDispatcher::from_config(&config_for(&server))?;
    let request = ListRequest {
        store: "googleplay".to_string(),
        collection: "TOP_FREE".to_string(),
        ..ListRequest::default()
    };
    let response = handle_list(&dispatcher, &request).await;

    assert_eq!(response.status_code, 502);
    assert!(response.body["details"].as_str().unwrap_or_default().contains("503"));
    assert!(response.body["timestamp"].is_string());
    Ok(())
}

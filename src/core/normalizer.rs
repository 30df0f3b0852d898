use crate::domain::model::{AppEntry, Backend};
use crate::utils::error::{CatalogError, Result};
use serde_json::{Map, Value};

/// 上游原生記錄轉成 AppEntry；缺少的選填欄位一律給預設值
pub fn normalize(backend: Backend, raw: &Value) -> Result<AppEntry> {
    let obj = raw.as_object().ok_or_else(|| CatalogError::UpstreamShapeError {
        backend: backend.display_name().to_string(),
        message: format!("expected an object record, got {}", type_name(raw)),
    })?;

    let entry = match backend {
        Backend::ConsoleStore => normalize_playstation(obj),
        Backend::ConsumerAppStore => normalize_app_store(obj),
        Backend::OpenMarketplace => normalize_google_play(obj),
    };
    Ok(entry)
}

fn normalize_playstation(item: &Map<String, Value>) -> AppEntry {
    let mut entry = AppEntry::new(Backend::ConsoleStore.store_label());
    let media: &[Value] = item
        .get("media")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    entry.id = text(item, "id");
    entry.app_id = entry.id.clone();
    entry.title = text(item, "name");
    entry.icon = media
        .iter()
        .find(|m| m.get("role").and_then(Value::as_str) == Some("MASTER"))
        .and_then(|m| m.get("url"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    entry.screenshots = media
        .iter()
        .filter(|m| m.get("role").and_then(Value::as_str) == Some("SCREENSHOT"))
        .filter_map(|m| m.get("url").and_then(Value::as_str))
        .map(str::to_string)
        .collect();
    entry.price = item
        .get("price")
        .and_then(|p| p.get("basePrice"))
        .map(price_value)
        .unwrap_or(0.0);
    // 列表回應沒有幣別與開發商，不另抓詳情頁
    entry.currency = "USD".to_string();
    entry.primary_genre = "Game".to_string();
    entry.genres = vec![entry.primary_genre.clone()];
    // 沿用上游行為：一律標為免費，不依價格判斷
    entry.free = true;
    entry
}

fn normalize_app_store(app: &Map<String, Value>) -> AppEntry {
    let mut entry = AppEntry::new(Backend::ConsumerAppStore.store_label());

    entry.id = text(app, "id");
    entry.app_id = text(app, "appId");
    entry.title = text(app, "title");
    entry.url = text(app, "url");
    entry.icon = text(app, "icon");
    entry.developer = text(app, "developer");
    entry.developer_url = text(app, "developerUrl");
    entry.primary_genre = text(app, "primaryGenre");
    if entry.primary_genre.is_empty() {
        entry.primary_genre = text(app, "genre");
    }
    entry.genres = string_list(app, "genres");
    if entry.genres.is_empty() && !entry.primary_genre.is_empty() {
        entry.genres = vec![entry.primary_genre.clone()];
    }
    entry.price = app.get("price").map(price_value).unwrap_or(0.0);
    entry.currency = text_or(app, "currency", "USD");
    entry.free = app
        .get("free")
        .and_then(Value::as_bool)
        .unwrap_or(entry.price == 0.0);
    entry.description = text(app, "description");
    entry.screenshots = string_list(app, "screenshots");
    entry.content_rating = text(app, "contentRating");
    entry.score = number(app, "score");
    entry.reviews = count(app, "reviews");
    entry.version = text(app, "version");
    entry.released = text(app, "released");
    entry.updated = text(app, "updated");
    entry
}

fn normalize_google_play(app: &Map<String, Value>) -> AppEntry {
    let mut entry = AppEntry::new(Backend::OpenMarketplace.store_label());

    entry.app_id = text(app, "appId");
    entry.id = entry.app_id.clone();
    entry.title = text(app, "title");
    entry.url = text(app, "url");
    entry.icon = text(app, "icon");
    entry.description = text(app, "description");
    entry.developer = text(app, "developer");
    entry.developer_url = text(app, "developerUrl");
    entry.primary_genre = text_or(app, "genre", "Unknown");
    entry.genres = string_list(app, "genres");
    entry.content_rating = text(app, "contentRating");

    let price_text = app.get("priceText").and_then(Value::as_str);
    entry.price = match (price_text, app.get("price")) {
        (Some(text), _) if is_free_text(text) => 0.0,
        (_, Some(price)) => price_value(price),
        (Some(text), None) => parse_price_text(text),
        (None, None) => 0.0,
    };
    entry.currency = text_or(app, "currency", "USD");
    // 明確旗標優先，其次看 priceText，最後才看數值
    entry.free = match (app.get("free").and_then(Value::as_bool), price_text) {
        (Some(flag), _) => flag,
        (None, Some(text)) => is_free_text(text),
        (None, None) => entry.price == 0.0,
    };

    entry.screenshots = string_list(app, "screenshots");
    entry.score = number(app, "score");
    entry.reviews = count(app, "reviews");
    entry.version = text(app, "version");
    entry.released = text(app, "released");
    entry.updated = text(app, "updated");
    entry
}

fn text(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn text_or(obj: &Map<String, Value>, key: &str, default: &str) -> String {
    let value = text(obj, key);
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

fn string_list(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn number(obj: &Map<String, Value>, key: &str) -> f64 {
    match obj.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn count(obj: &Map<String, Value>, key: &str) -> u64 {
    let value = number(obj, key);
    if value.is_finite() && value > 0.0 {
        value as u64
    } else {
        0
    }
}

fn is_free_text(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case("free")
}

/// 數字或價格文字（"$69.99"、"Free"、"¥8,580"、"69,99 €"）轉成非負數
pub fn price_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().filter(|p| p.is_finite() && *p > 0.0).unwrap_or(0.0),
        Value::String(s) => parse_price_text(s),
        _ => 0.0,
    }
}

pub fn parse_price_text(text: &str) -> f64 {
    if is_free_text(text) {
        return 0.0;
    }

    let filtered: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();

    let normalized = match (filtered.rfind('.'), filtered.rfind(',')) {
        (Some(dot), Some(comma)) => {
            // 兩者皆有時，最後出現的是小數點
            let (thousands, decimal) = if dot > comma {
                (',', '.')
            } else {
                ('.', ',')
            };
            filtered.replace(thousands, "").replace(decimal, ".")
        }
        (None, Some(idx)) => {
            // "69,99" 視為小數，"8,580" 視為千分位
            if filtered.len() - idx - 1 == 2 {
                filtered.replace(',', ".")
            } else {
                filtered.replace(',', "")
            }
        }
        _ => filtered,
    };

    normalized
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p > 0.0)
        .unwrap_or(0.0)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::StoreLabel;
    use serde_json::json;

    #[test]
    fn test_playstation_concept_mapping() {
        let concept = json!({
            "id": "10002694",
            "name": "Astro Bot",
            "media": [
                { "role": "SCREENSHOT", "type": "IMAGE", "url": "https://img/s1.jpg" },
                { "role": "MASTER", "type": "IMAGE", "url": "https://img/master.png" },
                { "role": "SCREENSHOT", "type": "IMAGE", "url": "https://img/s2.jpg" },
                { "role": "BACKGROUND", "type": "IMAGE", "url": "https://img/bg.jpg" }
            ],
            "price": { "basePrice": "$59.99", "discountedPrice": "$39.99" }
        });

        let entry = normalize(Backend::ConsoleStore, &concept).unwrap();

        assert_eq!(entry.id, "10002694");
        assert_eq!(entry.title, "Astro Bot");
        assert_eq!(entry.icon, "https://img/master.png");
        assert_eq!(entry.screenshots, vec!["https://img/s1.jpg", "https://img/s2.jpg"]);
        assert_eq!(entry.price, 59.99);
        assert_eq!(entry.currency, "USD");
        assert_eq!(entry.primary_genre, "Game");
        assert!(entry.developer.is_empty());
        assert!(entry.description.is_empty());
        assert!(entry.free);
        assert_eq!(entry.store, StoreLabel::ConsoleStore);
    }

    #[test]
    fn test_playstation_concept_without_media_or_price() {
        let entry = normalize(Backend::ConsoleStore, &json!({ "id": 7, "name": "Bare" })).unwrap();

        assert_eq!(entry.id, "7");
        assert!(entry.icon.is_empty());
        assert!(entry.screenshots.is_empty());
        assert_eq!(entry.price, 0.0);
    }

    #[test]
    fn test_free_items_normalize_to_zero_price_on_every_backend() {
        let cases = [
            (Backend::ConsoleStore, json!({ "id": "1", "name": "F2P", "price": { "basePrice": "Free" } })),
            (Backend::ConsumerAppStore, json!({ "id": 1, "title": "Free App", "price": 0, "free": true })),
            (
                Backend::OpenMarketplace,
                json!({ "appId": "a.b", "title": "Free Droid", "price": 0, "priceText": "Free", "free": true }),
            ),
            (Backend::OpenMarketplace, json!({ "appId": "c.d", "title": "Text Only", "priceText": "FREE" })),
        ];

        for (backend, raw) in cases {
            let entry = normalize(backend, &raw).unwrap();
            assert!(entry.free, "{:?} should be free", raw);
            assert_eq!(entry.price, 0.0, "{:?} should cost nothing", raw);
        }
    }

    #[test]
    fn test_google_play_mapping_defaults() {
        let raw = json!({
            "appId": "com.example.paid",
            "title": "Paid Tool",
            "price": "4.99",
            "priceText": "$4.99",
            "genre": null,
            "score": 4.3,
            "reviews": 1200,
            "screenshots": ["https://img/1.png"],
            "unknownVendorField": { "nested": true }
        });

        let entry = normalize(Backend::OpenMarketplace, &raw).unwrap();

        assert_eq!(entry.id, "com.example.paid");
        assert_eq!(entry.price, 4.99);
        assert!(!entry.free);
        assert_eq!(entry.currency, "USD");
        assert_eq!(entry.primary_genre, "Unknown");
        assert_eq!(entry.score, 4.3);
        assert_eq!(entry.reviews, 1200);
        assert_eq!(entry.screenshots.len(), 1);
        assert_eq!(entry.store, StoreLabel::OpenMarketplace);
    }

    #[test]
    fn test_app_store_passthrough() {
        let raw = json!({
            "id": 553834731,
            "appId": "com.midasplayer.apps.candycrushsaga",
            "title": "Candy Crush Saga",
            "icon": "https://is1.mzstatic.com/icon.png",
            "price": 0,
            "currency": "JPY",
            "free": true,
            "developer": "King",
            "genre": "Games",
            "released": "2012-11-14"
        });

        let entry = normalize(Backend::ConsumerAppStore, &raw).unwrap();

        assert_eq!(entry.id, "553834731");
        assert_eq!(entry.title, "Candy Crush Saga");
        assert_eq!(entry.currency, "JPY");
        assert_eq!(entry.primary_genre, "Games");
        assert_eq!(entry.genres, vec!["Games"]);
        assert_eq!(entry.developer, "King");
        assert_eq!(entry.store, StoreLabel::ConsumerAppStore);
    }

    #[test]
    fn test_missing_free_flag_follows_price() {
        let paid = normalize(Backend::ConsumerAppStore, &json!({ "title": "Paid", "price": 1.99 })).unwrap();
        let free = normalize(Backend::ConsumerAppStore, &json!({ "title": "Gratis" })).unwrap();
        assert!(!paid.free);
        assert!(free.free);
    }

    #[test]
    fn test_google_play_price_text_only_record() {
        let paid = normalize(
            Backend::OpenMarketplace,
            &json!({ "appId": "com.example.paid", "title": "Paid", "priceText": "$4.99" }),
        )
        .unwrap();
        assert_eq!(paid.price, 4.99);
        assert!(!paid.free);

        // priceText 優先於數值
        let promo = normalize(
            Backend::OpenMarketplace,
            &json!({ "appId": "com.example.promo", "title": "Promo", "priceText": "Free", "price": 2.99 }),
        )
        .unwrap();
        assert_eq!(promo.price, 0.0);
        assert!(promo.free);
    }

    #[test]
    fn test_non_object_record_is_shape_error() {
        let err = normalize(Backend::OpenMarketplace, &json!("com.example")).unwrap_err();
        assert!(matches!(err, CatalogError::UpstreamShapeError { .. }));
    }

    #[test]
    fn test_parse_price_text() {
        assert_eq!(parse_price_text("$69.99"), 69.99);
        assert_eq!(parse_price_text("Free"), 0.0);
        assert_eq!(parse_price_text("¥8,580"), 8580.0);
        assert_eq!(parse_price_text("69,99 €"), 69.99);
        assert_eq!(parse_price_text("1.299,00 €"), 1299.0);
        assert_eq!(parse_price_text("HK$1,234.50"), 1234.5);
        assert_eq!(parse_price_text("Included"), 0.0);
    }
}

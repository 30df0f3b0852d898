use crate::domain::model::Backend;
use crate::utils::error::{CatalogError, Result};

/// 榜單 id 與上游排序鍵；同一 id 只屬於一個商店
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionSpec {
    pub id: &'static str,
    pub backend: Backend,
    pub list_key: &'static str,
    pub label: &'static str,
}

const APP_STORE_COLLECTIONS: [CollectionSpec; 9] = [
    app_store("topfreeapplications", "Top Free iPhone Apps"),
    app_store("toppaidapplications", "Top Paid iPhone Apps"),
    app_store("topfreeipadapplications", "Top Free iPad Apps"),
    app_store("toppaidipadapplications", "Top Paid iPad Apps"),
    app_store("topgrossingapplications", "Top Grossing iPhone Apps"),
    app_store("topgrossingipadapplications", "Top Grossing iPad Apps"),
    app_store("newapplications", "New iPhone Apps"),
    app_store("newfreeipadapplications", "New Free iPad Apps"),
    app_store("newpaidipadapplications", "New Paid iPad Apps"),
];

const GOOGLE_PLAY_COLLECTIONS: [CollectionSpec; 3] = [
    google_play("TOP_FREE", "Top Free"),
    google_play("TOP_PAID", "Top Paid"),
    google_play("GROSSING", "Top Grossing"),
];

const PLAYSTATION_COLLECTIONS: [CollectionSpec; 4] = [
    playstation("topselling", "sales30", "Best Selling"),
    playstation("sales7", "sales7", "Best Selling (7 days)"),
    playstation("sales365", "sales365", "Best Selling (365 days)"),
    playstation("sales1", "sales1", "Best Selling (1 day)"),
];

const fn app_store(id: &'static str, label: &'static str) -> CollectionSpec {
    CollectionSpec {
        id,
        backend: Backend::ConsumerAppStore,
        list_key: id,
        label,
    }
}

const fn google_play(id: &'static str, label: &'static str) -> CollectionSpec {
    CollectionSpec {
        id,
        backend: Backend::OpenMarketplace,
        list_key: id,
        label,
    }
}

const fn playstation(id: &'static str, sort_key: &'static str, label: &'static str) -> CollectionSpec {
    CollectionSpec {
        id,
        backend: Backend::ConsoleStore,
        list_key: sort_key,
        label,
    }
}

pub fn collections_for(backend: Backend) -> &'static [CollectionSpec] {
    match backend {
        Backend::ConsumerAppStore => &APP_STORE_COLLECTIONS,
        Backend::OpenMarketplace => &GOOGLE_PLAY_COLLECTIONS,
        Backend::ConsoleStore => &PLAYSTATION_COLLECTIONS,
    }
}

pub fn valid_collection_ids(backend: Backend) -> Vec<String> {
    collections_for(backend)
        .iter()
        .map(|spec| spec.id.to_string())
        .collect()
}

/// 只在該商店自己的表內查找，大小寫需完全一致
pub fn resolve(backend: Backend, collection: &str) -> Result<&'static CollectionSpec> {
    collections_for(backend)
        .iter()
        .find(|spec| spec.id == collection)
        .ok_or_else(|| CatalogError::InvalidCollection {
            backend: backend.display_name().to_string(),
            collection: collection.to_string(),
            valid: valid_collection_ids(backend),
        })
}

/// PlayStation 榜單 id 對應 GraphQL sortBy 名稱
pub fn sort_key(collection: &str) -> Result<&'static str> {
    resolve(Backend::ConsoleStore, collection).map(|spec| spec.list_key)
}

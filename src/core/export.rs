use crate::domain::model::{AppEntry, CatalogListing};
use crate::utils::error::{CatalogError, Result};
use serde::Serialize;

/// CSV 不支援巢狀欄位，清單欄位以 `|` 串接
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CsvRow<'a> {
    store: &'a str,
    id: &'a str,
    app_id: &'a str,
    title: &'a str,
    developer: &'a str,
    primary_genre: &'a str,
    genres: String,
    price: f64,
    currency: &'a str,
    free: bool,
    score: f64,
    reviews: u64,
    url: &'a str,
    icon: &'a str,
    screenshots: String,
}

impl<'a> From<&'a AppEntry> for CsvRow<'a> {
    fn from(entry: &'a AppEntry) -> Self {
        Self {
            store: entry.store.as_str(),
            id: &entry.id,
            app_id: &entry.app_id,
            title: &entry.title,
            developer: &entry.developer,
            primary_genre: &entry.primary_genre,
            genres: entry.genres.join("|"),
            price: entry.price,
            currency: &entry.currency,
            free: entry.free,
            score: entry.score,
            reviews: entry.reviews,
            url: &entry.url,
            icon: &entry.icon,
            screenshots: entry.screenshots.join("|"),
        }
    }
}

pub fn to_json(listing: &CatalogListing) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(listing)?)
}

pub fn to_csv(entries: &[AppEntry]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for entry in entries {
        writer.serialize(CsvRow::from(entry))?;
    }
    writer.into_inner().map_err(|e| CatalogError::IoError(e.into_error()))
}

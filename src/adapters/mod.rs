// Adapters layer: concrete clients for the three upstream stores.

pub mod app_store;
pub mod google_play;
pub mod http;
pub mod playstation;

pub use app_store::ITunesRssClient;
pub use google_play::ScraperServiceClient;
pub use playstation::PsStoreClient;

pub mod aggregator;
pub mod dispatcher;
pub mod export;
pub mod normalizer;
pub mod router;

pub use crate::domain::ports::{ConfigProvider, MarketplaceClient, PageSource};
pub use crate::utils::error::Result;

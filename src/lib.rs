pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::LocalOutput, CliConfig, OutputFormat};

#[cfg(feature = "lambda")]
pub use config::lambda::LambdaConfig;

pub use config::toml_config::CatalogConfig;
pub use crate::core::dispatcher::{CatalogDispatcher, DefaultDispatcher, DispatchSettings};
pub use crate::core::router::{handle_list, ListRequest, RouterResponse};
pub use domain::model::{AppEntry, Backend, CatalogListing, StoreLabel};
pub use utils::error::{CatalogError, Result};

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "store-rankings")]
#[command(about = "Fetch App Store, Google Play and PlayStation Store rankings in one schema")]
pub struct CliConfig {
    /// appstore | googleplay | playstation (unknown values fall back to appstore)
    #[arg(long, default_value = "appstore")]
    pub store: String,

    #[arg(long, default_value = "topfreeapplications")]
    pub collection: String,

    #[arg(long, default_value = "us")]
    pub country: String,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    #[arg(long)]
    pub start_page: Option<u32>,

    #[arg(long)]
    pub end_page: Option<u32>,

    #[arg(long)]
    pub page_size: Option<u32>,

    /// Outbound proxy, e.g. http://127.0.0.1:7890
    #[arg(long)]
    pub proxy: Option<String>,

    #[arg(long, help = "Print valid collections and regions, then exit")]
    pub list_collections: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 命令列參數覆蓋檔案設定
    pub fn apply_overrides(&self, config: &mut toml_config::CatalogConfig) {
        if let Some(start) = self.start_page {
            config.playstation.start_page = start;
        }
        if let Some(end) = self.end_page {
            config.playstation.end_page = end;
        }
        if let Some(size) = self.page_size {
            config.playstation.page_size = size;
        }
        if let Some(proxy) = &self.proxy {
            config.http.proxy_url = Some(proxy.clone());
        }
    }
}

use crate::config::toml_config::CatalogConfig;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::env;

#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub config_path: Option<String>,
    pub catalog: CatalogConfig,
}

impl LambdaConfig {
    /// CATALOG_CONFIG 指向 TOML 檔（選填），再套用環境變數覆蓋
    pub fn from_env() -> Result<Self> {
        let config_path = env::var("CATALOG_CONFIG").ok().filter(|p| !p.trim().is_empty());
        let mut catalog = CatalogConfig::load(config_path.as_deref())?;
        catalog.apply_env_overrides()?;
        catalog.validate()?;

        Ok(Self {
            config_path,
            catalog,
        })
    }
}

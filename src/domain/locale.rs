use crate::utils::error::{CatalogError, Result};

/// 國家代碼對應 PlayStation Store 的語言與地區
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleMapping {
    pub country: &'static str,
    pub language: &'static str,
    pub region: &'static str,
}

const SUPPORTED_REGIONS: [LocaleMapping; 14] = [
    LocaleMapping { country: "us", language: "en", region: "US" },
    LocaleMapping { country: "jp", language: "ja", region: "JP" },
    LocaleMapping { country: "gb", language: "en", region: "GB" },
    LocaleMapping { country: "fr", language: "fr", region: "FR" },
    LocaleMapping { country: "de", language: "de", region: "DE" },
    LocaleMapping { country: "es", language: "es", region: "ES" },
    LocaleMapping { country: "it", language: "it", region: "IT" },
    LocaleMapping { country: "ca", language: "en", region: "CA" },
    LocaleMapping { country: "au", language: "en", region: "AU" },
    LocaleMapping { country: "cn", language: "zh-hans", region: "CN" },
    LocaleMapping { country: "hk", language: "zh-hant", region: "HK" },
    LocaleMapping { country: "tw", language: "zh-hant", region: "TW" },
    LocaleMapping { country: "kr", language: "ko", region: "KR" },
    LocaleMapping { country: "ru", language: "ru", region: "RU" },
];

impl LocaleMapping {
    /// x-psn-store-locale-override 使用的全小寫標籤，例如 `zh-hant-hk`
    pub fn store_locale(&self) -> String {
        format!("{}-{}", self.language, self.region.to_ascii_lowercase())
    }

    /// 例如 `en-US,en;q=0.9`
    pub fn accept_language(&self) -> String {
        let primary = self.language.split('-').next().unwrap_or(self.language);
        format!("{}-{},{};q=0.9", self.language, self.region, primary)
    }
}

/// 不區分大小寫；不支援的代碼直接拒絕，不套預設值
pub fn resolve(country: &str) -> Result<&'static LocaleMapping> {
    let code = country.trim().to_ascii_lowercase();
    SUPPORTED_REGIONS
        .iter()
        .find(|mapping| mapping.country == code)
        .ok_or_else(|| CatalogError::UnsupportedRegion {
            country: country.to_string(),
            supported: supported_countries(),
        })
}

pub fn supported_countries() -> Vec<String> {
    SUPPORTED_REGIONS
        .iter()
        .map(|mapping| mapping.country.to_string())
        .collect()
}

pub fn all() -> &'static [LocaleMapping] {
    &SUPPORTED_REGIONS
}

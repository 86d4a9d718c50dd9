#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://partners.shopify.com";

/// 輸出記錄的結構：扁平欄位或巢狀物件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordLayout {
    #[default]
    Flat,
    Nested,
}

/// Connector settings, loaded once and read-only for the whole sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnersConfig {
    pub api_key: String,
    pub api_version: String,
    pub partner_id: String,
    pub application_id: String,
    #[serde(deserialize_with = "deserialize_page_size")]
    pub num_results_per_call: u32,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub record_layout: RecordLayout,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// 舊設定檔會把頁面大小寫成字串，例如 "50"
fn deserialize_page_size<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u32),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

impl PartnersConfig {
    /// 從 JSON 物件解析（與資料整合平台的 config.json 相同格式）
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| EtlError::ConfigValidationError {
            field: "connector".to_string(),
            message: format!("JSON parsing error: {}", e),
        })
    }

    /// `{base_url}/{partner_id}/api/{api_version}/graphql.json`
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}/api/{}/graphql.json",
            self.base_url.trim_end_matches('/'),
            self.partner_id,
            self.api_version
        )
    }

    /// The application id in the Partner API global-id form.
    pub fn app_gid(&self) -> String {
        format!("gid://partners/App/{}", self.application_id)
    }
}

impl Validate for PartnersConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("api_key", &self.api_key)?;
        validation::validate_non_empty_string("api_version", &self.api_version)?;
        validation::validate_non_empty_string("partner_id", &self.partner_id)?;
        validation::validate_non_empty_string("application_id", &self.application_id)?;
        validation::validate_positive_number(
            "num_results_per_call",
            self.num_results_per_call as usize,
            1,
        )?;
        validation::validate_url("base_url", &self.base_url)?;
        Ok(())
    }
}

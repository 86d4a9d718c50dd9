use crate::config::PartnersConfig;
use crate::core::catalog::StreamCatalog;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub connector: PartnersConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    /// `--check` 與 `--list-streams` 不需要 `[load]`
    #[serde(default)]
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// 只同步這些 stream；未設定時同步整個 catalog
    pub streams: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadConfig {
    #[serde(default)]
    pub output_path: String,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: String,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex is valid"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SHOPIFY_PARTNERS_API_KEY})；未設定的變數保持原樣，由驗證回報
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn output_path(&self) -> &str {
        &self.load.output_path
    }

    pub fn selected_streams(&self) -> Option<&[String]> {
        self.extract.streams.as_deref()
    }

    /// 啟用壓縮時回傳 ZIP 檔名
    pub fn archive_name(&self) -> Option<&str> {
        self.load
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.as_str())
    }

    /// 只驗證 `[connector]`，供不寫檔的指令使用
    pub fn validate_connector(&self) -> Result<()> {
        let connector = &self.connector;
        for (field, value) in [
            ("connector.api_key", &connector.api_key),
            ("connector.api_version", &connector.api_version),
            ("connector.partner_id", &connector.partner_id),
            ("connector.application_id", &connector.application_id),
            ("connector.base_url", &connector.base_url),
        ] {
            validate_resolved(field, value)?;
        }

        connector.validate()
    }
}

/// 未設定的 `${VAR}` 會原樣留在值裡
fn validate_resolved(field_name: &str, value: &str) -> Result<()> {
    match env_var_pattern().captures(value) {
        Some(caps) => Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Environment variable {} is not set", &caps[1]),
        }),
        None => Ok(()),
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_connector()?;

        validation::validate_non_empty_string("load.output_path", &self.load.output_path)?;
        validate_resolved("load.output_path", &self.load.output_path)?;
        validation::validate_path("load.output_path", &self.load.output_path)?;

        if let Some(filename) = self.archive_name() {
            validate_resolved("load.compression.filename", filename)?;
            validation::validate_path("load.compression.filename", filename)?;
        }

        if let Some(streams) = self.selected_streams() {
            validation::validate_known_names("extract.streams", streams, &StreamCatalog::names())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecordLayout;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[connector]
api_key = "prtapi_abc"
api_version = "2024-01"
partner_id = "1234"
application_id = "5678"
num_results_per_call = 50
record_layout = "nested"

[extract]
streams = ["relationship_installs", "all_transactions"]

[load]
output_path = "./output"

[load.compression]
enabled = true
filename = "partners.zip"
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.connector.partner_id, "1234");
        assert_eq!(config.connector.num_results_per_call, 50);
        assert_eq!(config.connector.record_layout, RecordLayout::Nested);
        assert_eq!(
            config.selected_streams().unwrap(),
            ["relationship_installs", "all_transactions"]
        );
        assert_eq!(config.archive_name(), Some("partners.zip"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PARTNERS_ETL_TEST_API_KEY", "prtapi_from_env");

        let toml_content = r#"
[connector]
api_key = "${PARTNERS_ETL_TEST_API_KEY}"
api_version = "2024-01"
partner_id = "1"
application_id = "2"
num_results_per_call = "10"

[load]
output_path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.connector.api_key, "prtapi_from_env");
        assert_eq!(config.connector.num_results_per_call, 10);
        assert!(config.selected_streams().is_none());
        assert!(config.archive_name().is_none());

        std::env::remove_var("PARTNERS_ETL_TEST_API_KEY");
    }

    #[test]
    fn test_unknown_stream_fails_validation() {
        let toml_content = BASIC.replace("\"all_transactions\"", "\"refunds\"");
        let config = TomlConfig::from_toml_str(&toml_content).unwrap();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, EtlError::InvalidConfigValueError { ref field, .. } if field == "extract.streams"));
    }

    #[test]
    fn test_unset_env_var_fails_validation() {
        std::env::remove_var("PARTNERS_ETL_UNSET_API_KEY");
        let toml_content = BASIC.replace("\"prtapi_abc\"", "\"${PARTNERS_ETL_UNSET_API_KEY}\"");

        let config = TomlConfig::from_toml_str(&toml_content).unwrap();
        assert_eq!(config.connector.api_key, "${PARTNERS_ETL_UNSET_API_KEY}");

        let err = config.validate_connector().unwrap_err();
        assert!(matches!(
            err,
            EtlError::InvalidConfigValueError { ref field, ref reason, .. }
                if field == "connector.api_key" && reason.contains("PARTNERS_ETL_UNSET_API_KEY")
        ));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unset_env_var_in_output_path_fails_validation() {
        std::env::remove_var("PARTNERS_ETL_UNSET_OUTPUT");
        let toml_content = BASIC.replace("\"./output\"", "\"${PARTNERS_ETL_UNSET_OUTPUT}/out\"");

        let config = TomlConfig::from_toml_str(&toml_content).unwrap();

        assert!(config.validate_connector().is_ok());
        let err = config.validate().unwrap_err();
        assert!(matches!(err, EtlError::InvalidConfigValueError { ref field, .. } if field == "load.output_path"));
    }

    #[test]
    fn test_connector_only_config_is_enough_for_connector_checks() {
        let toml_content = r#"
[connector]
api_key = "prtapi_abc"
api_version = "2024-01"
partner_id = "1234"
application_id = "5678"
num_results_per_call = 50
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert!(config.validate_connector().is_ok());
        assert!(config.archive_name().is_none());
        let err = config.validate().unwrap_err();
        assert!(matches!(err, EtlError::MissingConfigError { ref field } if field == "load.output_path"));
    }

    #[test]
    fn test_invalid_toml_reports_parse_error() {
        let err = TomlConfig::from_toml_str("[connector\napi_key = 1").unwrap_err();
        assert!(matches!(err, EtlError::ConfigValidationError { ref field, .. } if field == "toml_parsing"));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.connector.application_id, "5678");
        assert_eq!(config.output_path(), "./output");
    }
}

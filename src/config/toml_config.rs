use crate::domain::tier::ScorePolicy;
use crate::utils::error::{Result, StierError};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_required_field, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const VALID_FORMATS: [&str; 3] = ["csv", "tsv", "json"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub tiers: TierConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Local JSON catalog with embedded reviews.
    #[default]
    Seed,
    /// Hosted database over REST.
    Rest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub r#type: SourceKind,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub catalog_path: Option<String>,
    /// Where seed mode keeps submitted ratings.
    pub ratings_path: Option<String>,
    pub category: Option<String>,
    pub products_table: Option<String>,
    pub ratings_table: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            r#type: SourceKind::Seed,
            endpoint: None,
            api_key: None,
            catalog_path: Some("data/seed_catalog.json".to_string()),
            ratings_path: Some("data/ratings.json".to_string()),
            category: None,
            products_table: None,
            ratings_table: None,
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TierConfig {
    #[serde(default)]
    pub score_policy: ScorePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
            output_formats: vec!["csv".to_string(), "json".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub json: bool,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${SUPABASE_ANON_KEY})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| StierError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn source_kind(&self) -> SourceKind {
        self.source.r#type
    }

    pub fn score_policy(&self) -> ScorePolicy {
        self.tiers.score_policy
    }

    pub fn output_path(&self) -> &str {
        &self.export.output_path
    }

    pub fn output_formats(&self) -> &[String] {
        &self.export.output_formats
    }

    pub fn ratings_path(&self) -> &str {
        self.source.ratings_path.as_deref().unwrap_or("data/ratings.json")
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.source.timeout_seconds.unwrap_or(30)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        match self.source.r#type {
            SourceKind::Rest => {
                let endpoint = validate_required_field("source.endpoint", &self.source.endpoint)?;
                validate_url("source.endpoint", endpoint)?;
                let api_key = validate_required_field("source.api_key", &self.source.api_key)?;
                if api_key.starts_with("${") {
                    return Err(StierError::InvalidConfigValueError {
                        field: "source.api_key".to_string(),
                        value: api_key.clone(),
                        reason: "environment variable is not set".to_string(),
                    });
                }
                validate_non_empty_string("source.api_key", api_key)?;
            }
            SourceKind::Seed => {
                let path =
                    validate_required_field("source.catalog_path", &self.source.catalog_path)?;
                validate_path("source.catalog_path", path)?;
                if let Some(ratings_path) = &self.source.ratings_path {
                    validate_path("source.ratings_path", ratings_path)?;
                }
            }
        }

        if let Some(category) = &self.source.category {
            validate_non_empty_string("source.category", category)?;
        }

        validate_path("export.output_path", &self.export.output_path)?;

        for format in &self.export.output_formats {
            if !VALID_FORMATS.contains(&format.as_str()) {
                return Err(StierError::InvalidConfigValueError {
                    field: "export.output_formats".to_string(),
                    value: format.clone(),
                    reason: format!(
                        "Unsupported format. Valid formats: {}",
                        VALID_FORMATS.join(", ")
                    ),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_from_empty_file() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.source_kind(), SourceKind::Seed);
        assert_eq!(config.score_policy(), ScorePolicy::Clamp);
        assert_eq!(config.output_formats(), &["csv".to_string(), "json".to_string()]);
        assert_eq!(config.ratings_path(), "data/ratings.json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_ratings_path() {
        let config =
            AppConfig::from_toml_str("[source]\nratings_path = \"state/my_ratings.json\"\n").unwrap();
        assert_eq!(config.ratings_path(), "state/my_ratings.json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_rest_config() {
        let toml_content = r#"
[source]
type = "rest"
endpoint = "https://example.supabase.co"
api_key = "anon-key"
category = "Video Games"
timeout_seconds = 5

[tiers]
score_policy = "reject"

[export]
output_path = "./tiers"
output_formats = ["tsv"]
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source_kind(), SourceKind::Rest);
        assert_eq!(config.source.category.as_deref(), Some("Video Games"));
        assert_eq!(config.score_policy(), ScorePolicy::Reject);
        assert_eq!(config.timeout_seconds(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("STIER_TEST_ANON_KEY", "secret-anon-key");

        let toml_content = r#"
[source]
type = "rest"
endpoint = "https://example.supabase.co"
api_key = "${STIER_TEST_ANON_KEY}"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source.api_key.as_deref(), Some("secret-anon-key"));

        std::env::remove_var("STIER_TEST_ANON_KEY");
    }

    #[test]
    fn test_unset_env_var_fails_validation() {
        let toml_content = r#"
[source]
type = "rest"
endpoint = "https://example.supabase.co"
api_key = "${STIER_DEFINITELY_UNSET_KEY}"
"#;
        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rest_requires_endpoint() {
        let config = AppConfig::from_toml_str("[source]\ntype = \"rest\"\napi_key = \"k\"\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, StierError::MissingConfigError { .. }));
    }

    #[test]
    fn test_bad_format_and_policy() {
        let config = AppConfig::from_toml_str("[export]\noutput_path = \"out\"\noutput_formats = [\"xlsx\"]\n")
            .unwrap();
        assert!(config.validate().is_err());

        assert!(AppConfig::from_toml_str("[tiers]\nscore_policy = \"round\"\n").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[source]\ncatalog_path = \"catalog.json\"\n")
            .unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.source.catalog_path.as_deref(), Some("catalog.json"));
        // a [source] table without the key still falls back to the default file
        assert_eq!(config.ratings_path(), "data/ratings.json");
    }
}

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct GrocyConfig {
    /// Base URL of the Grocy instance, e.g. `http://grocy.local`
    pub url: String,
    /// API key created under "Manage API keys" in Grocy
    pub api_key: String,
    /// Port appended to `url` when set
    #[serde(default)]
    pub port: Option<u16>,
    /// Location assigned to products created during an import
    #[serde(default = "default_location_id")]
    pub location_id: u64,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Product similarity settings
    #[serde(default)]
    pub matching: MatchingConfig,
    /// Additions to the built-in nickname tables
    #[serde(default)]
    pub lexicon: LexiconConfig,
}

/// Thresholds for fuzzy product matching
#[derive(Debug, Deserialize, Clone)]
pub struct MatchingConfig {
    /// Minimum similarity for a product to be offered as a choice
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    /// Minimum similarity for automatic mode to accept a product without asking
    #[serde(default = "default_automatic_threshold")]
    pub automatic_threshold: f64,
    /// Maximum number of similar products offered in a prompt
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            automatic_threshold: default_automatic_threshold(),
            max_candidates: default_max_candidates(),
        }
    }
}

/// User additions to the nickname tables and unit rules
#[derive(Debug, Deserialize, Clone)]
pub struct LexiconConfig {
    /// Unit synonym to canonical unit name
    #[serde(default)]
    pub units: HashMap<String, String>,
    /// Product phrase to canonical product
    #[serde(default)]
    pub products: HashMap<String, ProductNicknameConfig>,
    /// Extra leading preparation phrases
    #[serde(default)]
    pub prep_verbs: Vec<String>,
    /// Extra product-specific unit overrides
    #[serde(default)]
    pub unit_overrides: Vec<UnitOverrideConfig>,
    /// Canonical name of the unit used when a line has no unit
    #[serde(default = "default_count_unit")]
    pub count_unit: String,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            units: HashMap::new(),
            products: HashMap::new(),
            prep_verbs: Vec::new(),
            unit_overrides: Vec::new(),
            count_unit: default_count_unit(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProductNicknameConfig {
    /// Catalog product name
    pub name: String,
    /// Note attached to ingredients using this phrase
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UnitOverrideConfig {
    pub product: String,
    pub from_unit: String,
    pub to_unit: String,
}

// Default value functions
fn default_location_id() -> u64 {
    1
}

fn default_timeout() -> u64 {
    30
}

fn default_similarity_threshold() -> f64 {
    0.5
}

fn default_automatic_threshold() -> f64 {
    0.7
}

fn default_max_candidates() -> usize {
    8
}

fn default_count_unit() -> String {
    "count".to_string()
}

impl GrocyConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with GROCY_ prefix
    /// 2. grocy-import.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: GROCY_API_KEY, GROCY_MATCHING__AUTOMATIC_THRESHOLD
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// URL the API paths are appended to.
    pub fn base_url(&self) -> String {
        let url = self.url.trim_end_matches('/');
        match self.port {
            Some(port) => format!("{}:{}", url, port),
            None => url.to_string(),
        }
    }
}

/// Load configuration from file and environment variables
///
/// See [`GrocyConfig::load`] for the lookup order.
pub fn load_config() -> Result<GrocyConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("grocy-import").required(false))
        // GROCY_URL, GROCY_API_KEY; nested keys use a double underscore
        .add_source(
            Environment::with_prefix("GROCY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(text: &str) -> Result<GrocyConfig, ConfigError> {
        Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_location_id(), 1);
        assert_eq!(default_timeout(), 30);
        assert_eq!(default_similarity_threshold(), 0.5);
        assert_eq!(default_automatic_threshold(), 0.7);
        assert_eq!(default_count_unit(), "count");
    }

    #[test]
    fn test_minimal_config() {
        let config = from_toml(
            r#"
            url = "http://grocy.local/"
            api_key = "secret"
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url(), "http://grocy.local");
        assert_eq!(config.location_id, 1);
        assert_eq!(config.matching.max_candidates, 8);
        assert!(config.lexicon.units.is_empty());
        assert_eq!(config.lexicon.count_unit, "count");
    }

    #[test]
    fn test_port_is_appended() {
        let config = from_toml(
            r#"
            url = "http://grocy.local"
            api_key = "secret"
            port = 9283
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url(), "http://grocy.local:9283");
    }

    #[test]
    fn test_lexicon_section() {
        let config = from_toml(
            r#"
            url = "http://grocy.local"
            api_key = "secret"

            [matching]
            automatic_threshold = 0.8

            [lexicon]
            prep_verbs = ["spiralized"]
            count_unit = "piece"

            [lexicon.units]
            tsps = "teaspoon"

            [lexicon.products]
            "panko breadcrumbs" = { name = "breadcrumbs", note = "panko" }

            [[lexicon.unit_overrides]]
            product = "butter"
            from_unit = "stick"
            to_unit = "tablespoon"
            "#,
        )
        .unwrap();
        assert_eq!(config.matching.automatic_threshold, 0.8);
        assert_eq!(config.matching.similarity_threshold, 0.5);
        assert_eq!(config.lexicon.units.get("tsps").unwrap(), "teaspoon");
        let panko = config.lexicon.products.get("panko breadcrumbs").unwrap();
        assert_eq!(panko.name, "breadcrumbs");
        assert_eq!(panko.note.as_deref(), Some("panko"));
        assert_eq!(config.lexicon.unit_overrides.len(), 1);
        assert_eq!(config.lexicon.count_unit, "piece");
    }

    #[test]
    fn test_missing_api_key_fails() {
        assert!(from_toml(r#"url = "http://grocy.local""#).is_err());
    }
}

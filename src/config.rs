use crate::catalog::countries::DEFAULT_BASE_URL;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_ID_PREFIX: &str = "Autocomplete";
pub const DEFAULT_MIN_QUERY_LENGTH: usize = 2;
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_MAX_VISIBLE: usize = 8;
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WidgetConfig {
    pub id_prefix: String,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub min_query_length: usize,
    pub debounce_ms: u64,
    pub max_visible: usize,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
            label: None,
            placeholder: None,
            min_query_length: DEFAULT_MIN_QUERY_LENGTH,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            max_visible: DEFAULT_MAX_VISIBLE,
        }
    }
}

impl WidgetConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_min_query_length(mut self, min_query_length: usize) -> Self {
        self.min_query_length = min_query_length;
        self
    }

    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    pub fn with_id_prefix(mut self, id_prefix: impl Into<String>) -> Self {
        self.id_prefix = id_prefix.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_query_length == 0 {
            return Err(ConfigError::Invalid(
                "min_query_length must be at least 1".to_string(),
            ));
        }
        if self.max_visible == 0 {
            return Err(ConfigError::Invalid(
                "max_visible must be at least 1".to_string(),
            ));
        }
        if self.id_prefix.is_empty() || self.id_prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid(format!(
                "id_prefix '{}' must be non-empty and contain no whitespace",
                self.id_prefix
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub offline: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            offline: false,
        }
    }
}

impl CatalogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub widget: WidgetConfig,
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Reads a YAML (or JSON) file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(raw.as_str()).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.widget.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, WidgetConfig};
    use crate::error::ConfigError;
    use std::path::Path;
    use std::time::Duration;

    #[test]
    fn defaults_match_widget_contract() {
        let config = WidgetConfig::default();
        assert_eq!(config.min_query_length, 2);
        assert_eq!(config.debounce(), Duration::from_millis(500));
        assert_eq!(config.id_prefix, "Autocomplete");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = AppConfig::parse(
            "widget:\n  debounce_ms: 250\n  label: Country\ncatalog:\n  offline: true\n",
        )
        .expect("parse");
        assert_eq!(config.widget.debounce_ms, 250);
        assert_eq!(config.widget.label.as_deref(), Some("Country"));
        assert_eq!(config.widget.min_query_length, 2);
        assert!(config.catalog.offline);
        assert_eq!(config.catalog.timeout_ms, 5_000);
    }

    #[test]
    fn json_is_accepted() {
        let config = AppConfig::parse(r#"{"widget": {"min_query_length": 3}}"#).expect("parse");
        assert_eq!(config.widget.min_query_length, 3);
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(AppConfig::parse("  \n").expect("parse"), AppConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(AppConfig::parse("widget:\n  debounce: 10\n").is_err());
    }

    #[test]
    fn invalid_values_fail_validation() {
        let zero_min = WidgetConfig::default().with_min_query_length(0);
        assert!(matches!(zero_min.validate(), Err(ConfigError::Invalid(_))));

        let spaced = WidgetConfig::default().with_id_prefix("my widget");
        assert!(matches!(spaced.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = AppConfig::load(Path::new("/nonexistent/typeahead.yaml")).expect_err("missing");
        assert!(err.to_string().contains("/nonexistent/typeahead.yaml"));
    }
}

//! Configuration management for moneyview
//!
//! This module handles loading, validation, and management of
//! moneyview configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8081
}

/// Remote data source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Seed URL, written to the store on startup when none is stored yet
    #[serde(default)]
    pub url: Option<String>,
    /// Prefix every configured URL must start with
    #[serde(default = "default_allowed_prefix")]
    pub allowed_prefix: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: None,
            allowed_prefix: default_allowed_prefix(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_allowed_prefix() -> String {
    "https://script.google.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Local key-value store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON file backing the store
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./data/store.json")
}

/// Period the work-time conversion is expressed over
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkPeriod {
    /// Hours worked per month
    Monthly,
    /// Hours worked per year
    Yearly,
}

impl Default for WorkPeriod {
    fn default() -> Self {
        WorkPeriod::Monthly
    }
}

impl WorkPeriod {
    /// Hours worked in one period when none are configured
    pub fn default_hours(self) -> f64 {
        match self {
            WorkPeriod::Monthly => MONTHLY_WORK_HOURS,
            WorkPeriod::Yearly => YEARLY_WORK_HOURS,
        }
    }
}

impl std::fmt::Display for WorkPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkPeriod::Monthly => write!(f, "monthly"),
            WorkPeriod::Yearly => write!(f, "yearly"),
        }
    }
}

/// Work-time equivalent settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkTimeConfig {
    /// Period the income and hours refer to
    #[serde(default)]
    pub period: WorkPeriod,
    /// Hours worked in one period; the period's default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_per_period: Option<f64>,
}

impl WorkTimeConfig {
    /// Effective hours per period
    pub fn hours(&self) -> f64 {
        self.hours_per_period
            .unwrap_or_else(|| self.period.default_hours())
    }
}

impl Default for WorkTimeConfig {
    fn default() -> Self {
        Self {
            period: WorkPeriod::Monthly,
            hours_per_period: None,
        }
    }
}

/// Hours in a working month (44 hours over 52 weeks, per month)
pub const MONTHLY_WORK_HOURS: f64 = 190.67;

/// Hours in a working year of 52 weeks at 44 hours
pub const YEARLY_WORK_HOURS: f64 = 44.0 * 52.0;

/// Currency and number formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Currency symbol, always printed before the value
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Number of decimal places
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Thousands separator
    #[serde(default = "default_thousands_sep")]
    pub thousands_separator: String,
    /// Decimal separator
    #[serde(default = "default_decimal_sep")]
    pub decimal_separator: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            decimal_places: default_decimal_places(),
            thousands_separator: default_thousands_sep(),
            decimal_separator: default_decimal_sep(),
        }
    }
}

fn default_symbol() -> String {
    "€".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

fn default_thousands_sep() -> String {
    ".".to_string()
}

fn default_decimal_sep() -> String {
    ",".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Remote data source settings
    #[serde(default)]
    pub source: SourceConfig,
    /// Local store settings
    #[serde(default)]
    pub storage: StorageConfig,
    /// Work-time equivalent settings
    #[serde(default)]
    pub work_time: WorkTimeConfig,
    /// Currency settings
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|_| ConfigError::IoError)?;

        let config = Self::from_yaml(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from YAML text without validating it
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
            message: e.to_string(),
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.source.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "source.timeout_secs".to_string(),
                reason: "Timeout must be at least one second".to_string(),
            });
        }

        if let Some(url) = &self.source.url {
            if !url.trim().starts_with(&self.source.allowed_prefix) {
                return Err(ConfigError::InvalidValue {
                    field: "source.url".to_string(),
                    reason: format!("URL must start with {}", self.source.allowed_prefix),
                });
            }
        }

        let hours = self.work_time.hours();
        if !(hours.is_finite() && hours > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "work_time.hours_per_period".to_string(),
                reason: "Hours per period must be a positive number".to_string(),
            });
        }

        if self.currency.decimal_places > 10 {
            return Err(ConfigError::InvalidValue {
                field: "currency.decimal_places".to_string(),
                reason: "Decimal places must be between 0 and 10".to_string(),
            });
        }

        if self.currency.thousands_separator == self.currency.decimal_separator {
            return Err(ConfigError::ValidationError {
                message: "Thousands and decimal separators must differ".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_template_parses_and_validates() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.work_time.period, WorkPeriod::Monthly);
        assert_eq!(config.currency.symbol, "€");
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.source.allowed_prefix, "https://script.google.com");
        assert!(config.source.url.is_none());
        assert!((config.work_time.hours() - MONTHLY_WORK_HOURS).abs() < 1e-9);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_yearly_work_period_defaults_hours() {
        let config = Config::from_yaml("work_time:\n  period: yearly\n").unwrap();
        assert_eq!(config.work_time.period, WorkPeriod::Yearly);
        assert_eq!(config.work_time.hours(), 2288.0);

        let config = Config::from_yaml("work_time:\n  period: yearly\n  hours_per_period: 2000\n").unwrap();
        assert_eq!(config.work_time.hours(), 2000.0);
    }

    #[test]
    fn test_invalid_port() {
        let mut config = Config::default();
        config.server.port = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "server.port"));
    }

    #[test]
    fn test_source_url_must_match_prefix() {
        let mut config = Config::default();
        config.source.url = Some("https://example.com/data".to_string());
        assert!(config.validate().is_err());

        config.source.url = Some("https://script.google.com/macros/s/abc/exec".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_hours_per_period_must_be_positive() {
        let mut config = Config::default();
        config.work_time.hours_per_period = Some(0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_separators_must_differ() {
        let mut config = Config::default();
        config.currency.decimal_separator = ".".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(PathBuf::from("/nonexistent/moneyview.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server:\n  port: 9000\nlogging:\n  level: debug").unwrap();

        let config = Config::load(file.path().to_path_buf()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_load_invalid_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server: [unclosed").unwrap();

        let err = Config::load(file.path().to_path_buf()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidYaml { .. }));
    }
}

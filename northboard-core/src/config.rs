//! Configuration loading and management
//!
//! Configuration is a TOML file supplied explicitly by the caller (there is
//! no implicit search path — the CLI passes `--config`). It carries the
//! product catalog, the action classification rules, and the deep-dive
//! selection, all of which are operator input rather than inferred data.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Product catalog, in presentation order
    #[serde(default)]
    pub products: Vec<ProductConfig>,

    /// Action classification rules, keyed by (action_type_id, product)
    #[serde(default)]
    pub actions: Vec<ActionRule>,

    /// Deep-dive selection (product + date range)
    pub deep_dive: Option<DeepDiveConfig>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// One product in the catalog.
///
/// The catalog order is a contract: every per-product output table lists
/// configured products in this order, so tile sequencing is stable across
/// runs regardless of input row order.
#[derive(Debug, Deserialize, Clone)]
pub struct ProductConfig {
    /// Product name as it appears in the input tables
    pub name: String,
    /// Label of the action counted as this product's North Star metric
    pub north_star: String,
    /// Short description shown under the North Star tile
    #[serde(default)]
    pub description: String,
}

/// One classification rule: what an action type id means within a product.
///
/// Ids are product-scoped — the same numeric id can mean different things
/// in different products, so the key is always the pair.
#[derive(Debug, Deserialize, Clone)]
pub struct ActionRule {
    pub action_type_id: i64,
    pub product: String,
    pub label: String,
}

/// Deep-dive selection: which product gets the time-series and cohort
/// breakdowns, and over which inclusive daily date range.
///
/// The range is required configuration. Input data can be sparse or
/// out-of-order, so the window is never inferred from it.
#[derive(Debug, Deserialize, Clone)]
pub struct DeepDiveConfig {
    pub product: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
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

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// Duplicate classification keys are rejected outright: a second rule
    /// for the same `(action_type_id, product)` pair would silently
    /// overwrite the first, which is exactly the data bug this config
    /// format exists to prevent.
    pub fn validate(&self) -> Result<()> {
        let mut seen: HashSet<(i64, &str)> = HashSet::new();
        for rule in &self.actions {
            if !seen.insert((rule.action_type_id, rule.product.as_str())) {
                return Err(Error::Config(format!(
                    "duplicate action rule for id {} in product {:?}",
                    rule.action_type_id, rule.product
                )));
            }
        }

        let mut names: HashSet<&str> = HashSet::new();
        for product in &self.products {
            if !names.insert(product.name.as_str()) {
                return Err(Error::Config(format!(
                    "duplicate product {:?} in catalog",
                    product.name
                )));
            }
        }

        if let Some(deep_dive) = &self.deep_dive {
            if deep_dive.start_date > deep_dive.end_date {
                return Err(Error::Config(format!(
                    "deep_dive range is inverted: {} > {}",
                    deep_dive.start_date, deep_dive.end_date
                )));
            }
            if !names.contains(deep_dive.product.as_str()) {
                tracing::warn!(
                    product = %deep_dive.product,
                    "deep_dive product is not in the product catalog"
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[[products]]
name = "Mailchimp"
north_star = "Email Campaigns Sent"
description = "Total email campaigns successfully sent by all users."

[[products]]
name = "QuickBooks"
north_star = "Invoice Created"

[[actions]]
action_type_id = 2
product = "Mailchimp"
label = "Email Campaigns Sent"

[[actions]]
action_type_id = 5
product = "QuickBooks"
label = "Invoice Created"

[deep_dive]
product = "Mailchimp"
start_date = "2021-05-01"
end_date = "2022-06-30"

[logging]
level = "debug"
"#;

    #[test]
    fn test_parse_config() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        config.validate().unwrap();

        assert_eq!(config.products.len(), 2);
        assert_eq!(config.products[0].name, "Mailchimp");
        assert_eq!(config.products[0].north_star, "Email Campaigns Sent");
        assert!(config.products[1].description.is_empty());

        let deep_dive = config.deep_dive.unwrap();
        assert_eq!(deep_dive.product, "Mailchimp");
        assert_eq!(
            deep_dive.start_date,
            NaiveDate::from_ymd_opt(2021, 5, 1).unwrap()
        );
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.products.is_empty());
        assert!(config.deep_dive.is_none());
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_duplicate_action_rule_rejected() {
        let toml = r#"
[[actions]]
action_type_id = 5
product = "Mailchimp"
label = "Campaigns Created"

[[actions]]
action_type_id = 5
product = "Mailchimp"
label = "Log-Ins"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate action rule"));
    }

    #[test]
    fn test_same_id_across_products_allowed() {
        let toml = r#"
[[actions]]
action_type_id = 5
product = "Mint"
label = "Budget Created"

[[actions]]
action_type_id = 5
product = "QuickBooks"
label = "Invoice Created"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let toml = r#"
[deep_dive]
product = "Mailchimp"
start_date = "2022-06-30"
end_date = "2021-05-01"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("inverted"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("northboard.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.products.len(), 2);

        let missing = Config::load_from(&dir.path().join("nope.toml"));
        assert!(missing.is_err());
    }
}

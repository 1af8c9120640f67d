//! Action classification
//!
//! Maps raw `(action_type_id, product)` pairs from the usage table to
//! display labels, and knows which label is each product's North Star
//! action. Classification gaps are expected data: an unrecognized id
//! classifies to [`UNKNOWN_ACTION`], never an error.

use crate::config::Config;
use crate::error::{Error, Result};
use std::collections::HashMap;

/// Sentinel label for action ids with no classification rule.
pub const UNKNOWN_ACTION: &str = "Unknown Action";

/// Catalog of products and action classification rules.
///
/// Built once from config; read-only afterwards. Product order is the
/// configured catalog order and drives row ordering in every per-product
/// output table.
#[derive(Debug, Clone)]
pub struct ActionCatalog {
    /// (action_type_id, product) -> display label
    labels: HashMap<(i64, String), String>,
    /// product -> North Star label
    north_star: HashMap<String, String>,
    /// product -> tile description
    descriptions: HashMap<String, String>,
    /// Configured products, in catalog order
    product_order: Vec<String>,
    /// product -> rule labels, in rule declaration order
    label_order: HashMap<String, Vec<String>>,
}

impl ActionCatalog {
    /// Build a catalog from configuration.
    ///
    /// Rejects duplicate `(action_type_id, product)` keys even if the
    /// config skipped validation; a silently overwritten rule is the
    /// classification bug this type exists to rule out.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut labels = HashMap::new();
        let mut label_order: HashMap<String, Vec<String>> = HashMap::new();

        for rule in &config.actions {
            let key = (rule.action_type_id, rule.product.clone());
            if labels.insert(key, rule.label.clone()).is_some() {
                return Err(Error::Config(format!(
                    "duplicate action rule for id {} in product {:?}",
                    rule.action_type_id, rule.product
                )));
            }
            label_order
                .entry(rule.product.clone())
                .or_default()
                .push(rule.label.clone());
        }

        let mut north_star = HashMap::new();
        let mut descriptions = HashMap::new();
        let mut product_order = Vec::new();

        for product in &config.products {
            let has_rule = label_order
                .get(&product.name)
                .is_some_and(|labels| labels.iter().any(|l| l == &product.north_star));
            if !has_rule {
                tracing::warn!(
                    product = %product.name,
                    north_star = %product.north_star,
                    "North Star label matches no action rule; metric will be 0"
                );
            }

            north_star.insert(product.name.clone(), product.north_star.clone());
            descriptions.insert(product.name.clone(), product.description.clone());
            product_order.push(product.name.clone());
        }

        Ok(Self {
            labels,
            north_star,
            descriptions,
            product_order,
            label_order,
        })
    }

    /// Classify an action id within a product.
    ///
    /// Returns the configured display label, or [`UNKNOWN_ACTION`] when no
    /// rule matches.
    pub fn label(&self, action_type_id: i64, product: &str) -> &str {
        self.labels
            .get(&(action_type_id, product.to_string()))
            .map(String::as_str)
            .unwrap_or(UNKNOWN_ACTION)
    }

    /// The North Star label for a product, if the product is configured.
    pub fn north_star_label(&self, product: &str) -> Option<&str> {
        self.north_star.get(product).map(String::as_str)
    }

    /// Whether an action id is the North Star action for its product.
    pub fn is_north_star(&self, action_type_id: i64, product: &str) -> bool {
        match self.north_star_label(product) {
            Some(star) => self.label(action_type_id, product) == star,
            None => false,
        }
    }

    /// Tile description for a product (empty when not configured).
    pub fn description(&self, product: &str) -> &str {
        self.descriptions
            .get(product)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Configured product names in catalog order.
    pub fn products(&self) -> &[String] {
        &self.product_order
    }

    /// Rule labels for a product, in rule declaration order.
    pub fn labels_for(&self, product: &str) -> &[String] {
        self.label_order
            .get(product)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> ActionCatalog {
        let toml = r#"
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
product = "Mailchimp"
label = "Log-Ins"

[[actions]]
action_type_id = 5
product = "QuickBooks"
label = "Invoice Created"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        ActionCatalog::from_config(&config).unwrap()
    }

    #[test]
    fn test_label_lookup_is_product_scoped() {
        let catalog = sample_catalog();
        // Same numeric id, different meanings per product
        assert_eq!(catalog.label(5, "Mailchimp"), "Log-Ins");
        assert_eq!(catalog.label(5, "QuickBooks"), "Invoice Created");
    }

    #[test]
    fn test_unknown_action_sentinel() {
        let catalog = sample_catalog();
        assert_eq!(catalog.label(99, "Mailchimp"), UNKNOWN_ACTION);
        assert_eq!(catalog.label(2, "NoSuchProduct"), UNKNOWN_ACTION);
    }

    #[test]
    fn test_north_star_flags() {
        let catalog = sample_catalog();
        assert!(catalog.is_north_star(2, "Mailchimp"));
        assert!(!catalog.is_north_star(5, "Mailchimp"));
        assert!(catalog.is_north_star(5, "QuickBooks"));
        assert!(!catalog.is_north_star(5, "NoSuchProduct"));
        assert_eq!(
            catalog.north_star_label("Mailchimp"),
            Some("Email Campaigns Sent")
        );
        assert_eq!(catalog.north_star_label("NoSuchProduct"), None);
    }

    #[test]
    fn test_catalog_ordering() {
        let catalog = sample_catalog();
        assert_eq!(catalog.products(), &["Mailchimp", "QuickBooks"]);
        assert_eq!(
            catalog.labels_for("Mailchimp"),
            &["Email Campaigns Sent", "Log-Ins"]
        );
        assert!(catalog.labels_for("NoSuchProduct").is_empty());
    }

    #[test]
    fn test_duplicate_rule_rejected() {
        let toml = r#"
[[actions]]
action_type_id = 3
product = "TurboTax"
label = "Filing Completed"

[[actions]]
action_type_id = 3
product = "TurboTax"
label = "Return Started"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(ActionCatalog::from_config(&config).is_err());
    }
}

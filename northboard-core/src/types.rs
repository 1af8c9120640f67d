//! Core domain types for northboard
//!
//! These are the two flat input tables the whole pipeline is derived from.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Product** | One subscription product in the portfolio (e.g. "Mailchimp") |
//! | **Customer Record** | One customer-product subscription; `customer_id` is unique per product |
//! | **Usage Event** | A pre-aggregated action occurrence count for one customer and action type |
//! | **Activation** | The first date a customer reached value (`first_activation_date`) |
//! | **Churn** | A record acquiring a `cancel_date` after activation |
//! | **North Star** | The single action a product treats as its primary value signal |
//! | **Channel** | The acquisition channel label a customer came in through |

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One customer-product subscription.
///
/// Both dates are optional: an absent `first_activation_date` means the
/// customer never activated, an absent `cancel_date` means they have not
/// cancelled. Absent includes unparseable — the loader maps garbage dates
/// to `None` rather than failing the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// Customer identifier, unique within a product
    pub customer_id: String,
    /// Product this subscription belongs to
    pub product: String,
    /// First activation date, if the customer ever activated
    pub first_activation_date: Option<NaiveDate>,
    /// Cancellation date, if the customer cancelled
    pub cancel_date: Option<NaiveDate>,
    /// Acquisition channel label (free-form, grouped for reporting)
    pub channel: String,
}

impl CustomerRecord {
    /// Whether this customer ever reached first activation.
    pub fn is_activated(&self) -> bool {
        self.first_activation_date.is_some()
    }

    /// Whether this customer has churned (cancel date present).
    pub fn is_churned(&self) -> bool {
        self.cancel_date.is_some()
    }

    /// Activated and not cancelled.
    pub fn is_active(&self) -> bool {
        self.is_activated() && !self.is_churned()
    }
}

/// One pre-aggregated usage row: how many times a customer performed an
/// action type within a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageEvent {
    /// Customer identifier, unique within a product
    pub customer_id: String,
    /// Product the action was performed in
    pub product: String,
    /// Raw action type id; meaning is product-scoped (see `classify`)
    pub action_type_id: i64,
    /// Occurrence count, always >= 0 after ingestion
    pub usage_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(activated: Option<&str>, cancelled: Option<&str>) -> CustomerRecord {
        let parse = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        CustomerRecord {
            customer_id: "c1".to_string(),
            product: "Mailchimp".to_string(),
            first_activation_date: activated.map(parse),
            cancel_date: cancelled.map(parse),
            channel: "Organic".to_string(),
        }
    }

    #[test]
    fn test_lifecycle_predicates() {
        let never = record(None, None);
        assert!(!never.is_activated());
        assert!(!never.is_active());

        let active = record(Some("2021-01-01"), None);
        assert!(active.is_activated());
        assert!(active.is_active());
        assert!(!active.is_churned());

        let churned = record(Some("2021-01-01"), Some("2021-06-01"));
        assert!(churned.is_activated());
        assert!(churned.is_churned());
        assert!(!churned.is_active());
    }
}

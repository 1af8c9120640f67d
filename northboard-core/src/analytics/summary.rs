//! Per-product summary metrics
//!
//! Turns the two raw tables into one row per product: lifecycle counts and
//! churn rate from customer records, plus the North Star usage total from
//! classified usage events, merged on product.

use crate::classify::ActionCatalog;
use crate::types::{CustomerRecord, UsageEvent};
use serde::Serialize;
use std::collections::HashMap;

/// Lifecycle metrics for one product, before the North Star merge.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerMetrics {
    pub product: String,
    /// Customers that ever reached first activation
    pub lifetime_activated: i64,
    /// Activated and not cancelled
    pub current_active: i64,
    /// Customers with a cancel date
    pub churned: i64,
    /// churned / lifetime_activated * 100, 0 when nothing activated
    pub churn_rate_pct: f64,
}

/// One row of the merged customer summary table.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    pub product: String,
    pub lifetime_activated: i64,
    pub current_active: i64,
    pub churned: i64,
    pub churn_rate_pct: f64,
    /// Total usage of the product's North Star action
    pub north_star_value: i64,
}

/// One row of a product's action funnel: total usage per classified label.
#[derive(Debug, Clone, Serialize)]
pub struct FunnelRow {
    pub label: String,
    pub usage_count: i64,
}

/// Guarded churn-rate formula shared by product and channel breakdowns.
///
/// Defined as 0 when nothing activated; never NaN.
pub(crate) fn churn_rate_pct(churned: i64, lifetime_activated: i64) -> f64 {
    if lifetime_activated == 0 {
        0.0
    } else {
        churned as f64 / lifetime_activated as f64 * 100.0
    }
}

#[derive(Default)]
struct LifecycleCounts {
    lifetime_activated: i64,
    current_active: i64,
    churned: i64,
}

/// Compute lifecycle metrics per product.
///
/// Row order is the catalog's configured product order, followed by any
/// product discovered only in the data, in first-appearance order.
/// Configured products with no records still appear, zero-filled.
pub fn customer_metrics(
    records: &[CustomerRecord],
    catalog: &ActionCatalog,
) -> Vec<CustomerMetrics> {
    let mut order: Vec<String> = catalog.products().to_vec();
    let mut index: HashMap<String, usize> = order
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), i))
        .collect();
    let mut counts: Vec<LifecycleCounts> = order.iter().map(|_| LifecycleCounts::default()).collect();

    for record in records {
        let idx = match index.get(&record.product) {
            Some(&idx) => idx,
            None => {
                order.push(record.product.clone());
                counts.push(LifecycleCounts::default());
                index.insert(record.product.clone(), order.len() - 1);
                order.len() - 1
            }
        };

        let entry = &mut counts[idx];
        if record.is_activated() {
            entry.lifetime_activated += 1;
        }
        if record.is_active() {
            entry.current_active += 1;
        }
        if record.is_churned() {
            entry.churned += 1;
        }
    }

    order
        .into_iter()
        .zip(counts)
        .map(|(product, c)| CustomerMetrics {
            product,
            lifetime_activated: c.lifetime_activated,
            current_active: c.current_active,
            churned: c.churned,
            churn_rate_pct: churn_rate_pct(c.churned, c.lifetime_activated),
        })
        .collect()
}

/// Sum usage counts of each product's North Star action.
///
/// Events classified to any other label (including the unknown sentinel)
/// never contribute. Products with no matching events are simply absent;
/// the merger fills them with 0.
pub fn north_star_totals(events: &[UsageEvent], catalog: &ActionCatalog) -> HashMap<String, i64> {
    let mut totals: HashMap<String, i64> = HashMap::new();
    for event in events {
        if catalog.is_north_star(event.action_type_id, &event.product) {
            *totals.entry(event.product.clone()).or_insert(0) += event.usage_count;
        }
    }
    totals
}

/// Merge lifecycle metrics with North Star totals, one row per product.
///
/// Left join on product: every lifecycle row survives in order, and a
/// product with no North Star events gets 0, not absence.
pub fn product_summaries(
    records: &[CustomerRecord],
    events: &[UsageEvent],
    catalog: &ActionCatalog,
) -> Vec<ProductSummary> {
    let totals = north_star_totals(events, catalog);

    customer_metrics(records, catalog)
        .into_iter()
        .map(|m| {
            let north_star_value = totals.get(&m.product).copied().unwrap_or(0);
            ProductSummary {
                product: m.product,
                lifetime_activated: m.lifetime_activated,
                current_active: m.current_active,
                churned: m.churned,
                churn_rate_pct: m.churn_rate_pct,
                north_star_value,
            }
        })
        .collect()
}

/// Total usage per classified action label for one product, sorted by
/// descending usage (label name breaks ties for determinism).
pub fn action_funnel(
    events: &[UsageEvent],
    catalog: &ActionCatalog,
    product: &str,
) -> Vec<FunnelRow> {
    let mut totals: HashMap<String, i64> = HashMap::new();
    for event in events.iter().filter(|e| e.product == product) {
        let label = catalog.label(event.action_type_id, product);
        *totals.entry(label.to_string()).or_insert(0) += event.usage_count;
    }

    let mut rows: Vec<FunnelRow> = totals
        .into_iter()
        .map(|(label, usage_count)| FunnelRow { label, usage_count })
        .collect();
    rows.sort_by(|a, b| {
        b.usage_count
            .cmp(&a.usage_count)
            .then_with(|| a.label.cmp(&b.label))
    });
    rows
}

//! Churned vs. retained cohort comparison
//!
//! Splits one product's customers by churn status, joins each cohort to its
//! usage events, and compares the percentage distribution of actions across
//! the two cohorts. Also breaks churn counts and churn rate out by
//! acquisition channel.

use crate::analytics::summary::churn_rate_pct;
use crate::classify::{ActionCatalog, UNKNOWN_ACTION};
use crate::types::{CustomerRecord, UsageEvent};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Percentage of each cohort's total usage spent on one action.
///
/// The two cohorts are outer-joined on label: an action performed by only
/// one cohort still appears, with 0% on the other side.
#[derive(Debug, Clone, Serialize)]
pub struct ActionMixRow {
    pub label: String,
    pub churned_pct: f64,
    pub retained_pct: f64,
}

/// Churn metrics for one acquisition channel.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelChurnRow {
    pub channel: String,
    pub lifetime_activated: i64,
    pub churned: i64,
    pub churn_rate_pct: f64,
}

/// Customer headcount for one acquisition channel.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelBreakdownRow {
    pub channel: String,
    pub customer_count: i64,
}

/// Full cohort comparison output for one product.
#[derive(Debug, Clone, Serialize)]
pub struct CohortComparison {
    pub action_mix: Vec<ActionMixRow>,
    pub channel_churn: Vec<ChannelChurnRow>,
    pub channel_breakdown: Vec<ChannelBreakdownRow>,
}

fn percentage(count: i64, total: i64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Compare churned and retained cohorts for one product.
pub fn cohort_comparison(
    records: &[CustomerRecord],
    events: &[UsageEvent],
    catalog: &ActionCatalog,
    product: &str,
) -> CohortComparison {
    let product_records: Vec<&CustomerRecord> =
        records.iter().filter(|r| r.product == product).collect();

    let churned_ids: HashSet<&str> = product_records
        .iter()
        .filter(|r| r.is_churned())
        .map(|r| r.customer_id.as_str())
        .collect();
    let retained_ids: HashSet<&str> = product_records
        .iter()
        .filter(|r| !r.is_churned())
        .map(|r| r.customer_id.as_str())
        .collect();

    // Inner join: events must match the product and a cohort member.
    // customer_id is only unique per product, so the product filter is part
    // of the join key.
    let mut churned_usage: HashMap<String, i64> = HashMap::new();
    let mut retained_usage: HashMap<String, i64> = HashMap::new();

    for event in events.iter().filter(|e| e.product == product) {
        let label = catalog.label(event.action_type_id, product);
        if churned_ids.contains(event.customer_id.as_str()) {
            *churned_usage.entry(label.to_string()).or_insert(0) += event.usage_count;
        } else if retained_ids.contains(event.customer_id.as_str()) {
            *retained_usage.entry(label.to_string()).or_insert(0) += event.usage_count;
        }
    }

    let churned_total: i64 = churned_usage.values().sum();
    let retained_total: i64 = retained_usage.values().sum();

    // Outer join on label, in deterministic order: rule declaration order,
    // unknown bucket last.
    let mut labels: Vec<String> = catalog
        .labels_for(product)
        .iter()
        .filter(|l| churned_usage.contains_key(*l) || retained_usage.contains_key(*l))
        .cloned()
        .collect();
    if churned_usage.contains_key(UNKNOWN_ACTION) || retained_usage.contains_key(UNKNOWN_ACTION) {
        labels.push(UNKNOWN_ACTION.to_string());
    }

    let action_mix = labels
        .into_iter()
        .map(|label| {
            let churned = churned_usage.get(&label).copied().unwrap_or(0);
            let retained = retained_usage.get(&label).copied().unwrap_or(0);
            ActionMixRow {
                label,
                churned_pct: percentage(churned, churned_total),
                retained_pct: percentage(retained, retained_total),
            }
        })
        .collect();

    CohortComparison {
        action_mix,
        channel_churn: channel_churn(&product_records),
        channel_breakdown: channel_breakdown(&product_records),
    }
}

/// Churned count and churn rate per acquisition channel, sorted by channel.
fn channel_churn(product_records: &[&CustomerRecord]) -> Vec<ChannelChurnRow> {
    let mut per_channel: HashMap<&str, (i64, i64)> = HashMap::new();
    for record in product_records {
        let entry = per_channel.entry(record.channel.as_str()).or_insert((0, 0));
        if record.is_activated() {
            entry.0 += 1;
        }
        if record.is_churned() {
            entry.1 += 1;
        }
    }

    let mut rows: Vec<ChannelChurnRow> = per_channel
        .into_iter()
        .map(|(channel, (activated, churned))| ChannelChurnRow {
            channel: channel.to_string(),
            lifetime_activated: activated,
            churned,
            churn_rate_pct: churn_rate_pct(churned, activated),
        })
        .collect();
    rows.sort_by(|a, b| a.channel.cmp(&b.channel));
    rows
}

/// Customer headcount per channel, busiest channel first.
fn channel_breakdown(product_records: &[&CustomerRecord]) -> Vec<ChannelBreakdownRow> {
    let mut per_channel: HashMap<&str, i64> = HashMap::new();
    for record in product_records {
        *per_channel.entry(record.channel.as_str()).or_insert(0) += 1;
    }

    let mut rows: Vec<ChannelBreakdownRow> = per_channel
        .into_iter()
        .map(|(channel, customer_count)| ChannelBreakdownRow {
            channel: channel.to_string(),
            customer_count,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.customer_count
            .cmp(&a.customer_count)
            .then_with(|| a.channel.cmp(&b.channel))
    });
    rows
}

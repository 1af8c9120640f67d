//! Analytics pipeline for northboard
//!
//! A single pure pass over the two input tables:
//!
//! ```text
//! records ──┬─> customer metrics ──┐
//!           │                      ├─> product summaries ─┐
//! events ───┼─> north star totals ─┘                      │
//!           │                                             ├─> DashboardReport
//!           ├─> daily series (deep-dive product) ─────────┤
//!           └─> cohort comparison (deep-dive product) ────┘
//! ```
//!
//! Every step reads its inputs and produces a new table; nothing is mutated
//! after creation and nothing is cached between runs.

pub mod cohort;
pub mod series;
pub mod summary;

pub use cohort::{
    cohort_comparison, ActionMixRow, ChannelBreakdownRow, ChannelChurnRow, CohortComparison,
};
pub use series::{daily_series, DailySeriesPoint, DateRange};
pub use summary::{
    action_funnel, customer_metrics, north_star_totals, product_summaries, CustomerMetrics,
    FunnelRow, ProductSummary,
};

use crate::classify::ActionCatalog;
use crate::config::DeepDiveConfig;
use crate::error::Result;
use crate::types::{CustomerRecord, UsageEvent};
use serde::Serialize;

/// Which product gets the deep-dive breakdowns, and over what window.
#[derive(Debug, Clone, Serialize)]
pub struct DeepDiveParams {
    pub product: String,
    pub range: DateRange,
}

impl DeepDiveParams {
    pub fn new(product: impl Into<String>, range: DateRange) -> Self {
        Self {
            product: product.into(),
            range,
        }
    }

    /// Build params from the `[deep_dive]` config section.
    pub fn from_config(config: &DeepDiveConfig) -> Result<Self> {
        let range = DateRange::new(config.start_date, config.end_date)?;
        Ok(Self::new(config.product.clone(), range))
    }
}

/// Deep-dive tables for one product.
#[derive(Debug, Clone, Serialize)]
pub struct DeepDive {
    pub product: String,
    pub range: DateRange,
    /// Daily cumulative activation/cancellation series over the range
    pub series: Vec<DailySeriesPoint>,
    /// Action usage funnel, busiest action first
    pub funnel: Vec<FunnelRow>,
    /// Churned vs. retained cohort comparison + channel breakdowns
    pub cohorts: CohortComparison,
}

/// Everything the presentation layer needs, computed in one pass.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    /// One row per product, in catalog order
    pub summary: Vec<ProductSummary>,
    pub deep_dive: DeepDive,
}

/// Run the whole pipeline.
///
/// Pure function of its inputs: same tables, catalog, and params always
/// produce the same report.
pub fn compute(
    records: &[CustomerRecord],
    events: &[UsageEvent],
    catalog: &ActionCatalog,
    params: &DeepDiveParams,
) -> DashboardReport {
    tracing::debug!(
        records = records.len(),
        events = events.len(),
        deep_dive = %params.product,
        "computing dashboard report"
    );

    let summary = product_summaries(records, events, catalog);
    let series = daily_series(records, &params.product, &params.range);
    let funnel = action_funnel(events, catalog, &params.product);
    let cohorts = cohort_comparison(records, events, catalog, &params.product);

    DashboardReport {
        summary,
        deep_dive: DeepDive {
            product: params.product.clone(),
            range: params.range,
            series,
            funnel,
            cohorts,
        },
    }
}

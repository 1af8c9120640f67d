//! Daily activation/cancellation time series
//!
//! Builds a dense daily series for one product over a fixed inclusive date
//! range: cumulative activations, cumulative cancellations, and their
//! difference (active customers that day). Dates outside the range are
//! silently excluded — the window is configuration, never inferred.

use crate::error::{Error, Result};
use crate::types::CustomerRecord;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;

/// Inclusive daily date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::Config(format!(
                "date range is inverted: {} > {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Number of days in the range (inclusive).
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Whether a date falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Iterate every day in the range, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let start = self.start;
        (0..self.num_days()).map(move |offset| start + Duration::days(offset))
    }
}

/// One day of the cumulative series for a product.
#[derive(Debug, Clone, Serialize)]
pub struct DailySeriesPoint {
    pub date: NaiveDate,
    /// Activations up to and including this day
    pub cumulative_activated: i64,
    /// Cancellations up to and including this day
    pub cumulative_cancelled: i64,
    /// cumulative_activated - cumulative_cancelled
    pub active: i64,
}

/// Build the dense daily series for one product.
///
/// Per-day activation and cancellation counts are reindexed onto the dense
/// range (missing days fill with 0), then cumulatively summed. Output has
/// exactly one point per day of the range, in date order.
pub fn daily_series(
    records: &[CustomerRecord],
    product: &str,
    range: &DateRange,
) -> Vec<DailySeriesPoint> {
    let mut activations: HashMap<NaiveDate, i64> = HashMap::new();
    let mut cancellations: HashMap<NaiveDate, i64> = HashMap::new();

    for record in records.iter().filter(|r| r.product == product) {
        if let Some(date) = record.first_activation_date {
            if range.contains(date) {
                *activations.entry(date).or_insert(0) += 1;
            }
        }
        if let Some(date) = record.cancel_date {
            if range.contains(date) {
                *cancellations.entry(date).or_insert(0) += 1;
            }
        }
    }

    let mut cumulative_activated = 0i64;
    let mut cumulative_cancelled = 0i64;

    range
        .days()
        .map(|date| {
            cumulative_activated += activations.get(&date).copied().unwrap_or(0);
            cumulative_cancelled += cancellations.get(&date).copied().unwrap_or(0);
            DailySeriesPoint {
                date,
                cumulative_activated,
                cumulative_cancelled,
                active: cumulative_activated - cumulative_cancelled,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(
        id: &str,
        product: &str,
        activated: Option<&str>,
        cancelled: Option<&str>,
    ) -> CustomerRecord {
        CustomerRecord {
            customer_id: id.to_string(),
            product: product.to_string(),
            first_activation_date: activated.map(date),
            cancel_date: cancelled.map(date),
            channel: "Organic".to_string(),
        }
    }

    #[test]
    fn test_range_rejects_inversion() {
        assert!(DateRange::new(date("2021-06-02"), date("2021-06-01")).is_err());
        let range = DateRange::new(date("2021-06-01"), date("2021-06-01")).unwrap();
        assert_eq!(range.num_days(), 1);
    }

    #[test]
    fn test_single_activation_scenario() {
        // Range 2021-06-01..03, one activation on 06-02, no cancellations.
        let range = DateRange::new(date("2021-06-01"), date("2021-06-03")).unwrap();
        let records = vec![record("1", "Mailchimp", Some("2021-06-02"), None)];

        let series = daily_series(&records, "Mailchimp", &range);
        assert_eq!(series.len(), 3);

        let activated: Vec<i64> = series.iter().map(|p| p.cumulative_activated).collect();
        let active: Vec<i64> = series.iter().map(|p| p.active).collect();
        assert_eq!(activated, vec![0, 1, 1]);
        assert_eq!(active, vec![0, 1, 1]);
        assert_eq!(series[0].date, date("2021-06-01"));
        assert_eq!(series[2].date, date("2021-06-03"));
    }

    #[test]
    fn test_cancellation_reduces_active() {
        let range = DateRange::new(date("2021-06-01"), date("2021-06-05")).unwrap();
        let records = vec![
            record("1", "Mailchimp", Some("2021-06-01"), Some("2021-06-04")),
            record("2", "Mailchimp", Some("2021-06-02"), None),
        ];

        let series = daily_series(&records, "Mailchimp", &range);
        let active: Vec<i64> = series.iter().map(|p| p.active).collect();
        assert_eq!(active, vec![1, 2, 2, 1, 1]);

        for point in &series {
            assert_eq!(
                point.active,
                point.cumulative_activated - point.cumulative_cancelled
            );
        }
    }

    #[test]
    fn test_cumulative_series_non_decreasing() {
        let range = DateRange::new(date("2021-06-01"), date("2021-06-10")).unwrap();
        let records = vec![
            record("1", "Mailchimp", Some("2021-06-03"), Some("2021-06-07")),
            record("2", "Mailchimp", Some("2021-06-03"), None),
            record("3", "Mailchimp", Some("2021-06-09"), None),
        ];

        let series = daily_series(&records, "Mailchimp", &range);
        for window in series.windows(2) {
            assert!(window[1].cumulative_activated >= window[0].cumulative_activated);
            assert!(window[1].cumulative_cancelled >= window[0].cumulative_cancelled);
        }
    }

    #[test]
    fn test_out_of_range_dates_excluded() {
        let range = DateRange::new(date("2021-06-01"), date("2021-06-03")).unwrap();
        let records = vec![
            record("1", "Mailchimp", Some("2021-05-30"), None), // before range
            record("2", "Mailchimp", Some("2021-07-01"), None), // after range
            record("3", "Mailchimp", None, None),               // never activated
        ];

        let series = daily_series(&records, "Mailchimp", &range);
        assert!(series.iter().all(|p| p.cumulative_activated == 0));
    }

    #[test]
    fn test_other_products_ignored() {
        let range = DateRange::new(date("2021-06-01"), date("2021-06-02")).unwrap();
        let records = vec![record("1", "QuickBooks", Some("2021-06-01"), None)];

        let series = daily_series(&records, "Mailchimp", &range);
        assert!(series.iter().all(|p| p.cumulative_activated == 0));
    }
}

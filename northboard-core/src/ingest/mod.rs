//! CSV ingestion
//!
//! Loads the two input tables from CSV files into domain rows. This is the
//! tolerance boundary for dirty data: unparseable dates become absent and
//! malformed usage counts degrade to 0, so downstream aggregation never has
//! to handle them. Structural problems — missing columns, unreadable files —
//! are real errors and abort the load.

use crate::error::Result;
use crate::types::{CustomerRecord, UsageEvent};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;

/// Raw customer row as it appears in the CSV.
#[derive(Debug, Deserialize)]
struct RawCustomerRow {
    #[serde(rename = "customerid")]
    customer_id: String,
    product_name: String,
    #[serde(default)]
    first_activation_date: String,
    #[serde(default)]
    cancel_date: String,
    channel: String,
}

/// Raw usage row as it appears in the CSV.
#[derive(Debug, Deserialize)]
struct RawUsageRow {
    #[serde(rename = "customerid")]
    customer_id: String,
    product_name: String,
    action_type_id: i64,
    #[serde(default)]
    usage_count: String,
}

/// Parse a date cell, treating blanks and garbage as absent.
fn parse_date(value: &str, column: &str, line: u64) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            tracing::debug!(line, column, value, "unparseable date treated as absent");
            None
        }
    }
}

/// Parse a usage count cell, degrading malformed or negative values to 0.
fn parse_count(value: &str, line: u64) -> i64 {
    match value.trim().parse::<i64>() {
        Ok(count) if count >= 0 => count,
        Ok(count) => {
            tracing::warn!(line, count, "negative usage_count clamped to 0");
            0
        }
        Err(_) => {
            tracing::warn!(line, value, "malformed usage_count treated as 0");
            0
        }
    }
}

/// Load customer lifecycle records from a CSV file.
pub fn load_customers(path: &Path) -> Result<Vec<CustomerRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();

    for result in reader.deserialize() {
        let raw: RawCustomerRow = result?;
        let line = records.len() as u64 + 2; // header is line 1

        let first_activation_date =
            parse_date(&raw.first_activation_date, "first_activation_date", line);
        let cancel_date = parse_date(&raw.cancel_date, "cancel_date", line);

        // Data-quality check, not a rejection: the record still counts.
        if let (Some(activated), Some(cancelled)) = (first_activation_date, cancel_date) {
            if cancelled < activated {
                tracing::warn!(
                    customer_id = %raw.customer_id,
                    product = %raw.product_name,
                    %activated,
                    %cancelled,
                    "cancel_date precedes first_activation_date"
                );
            }
        }

        records.push(CustomerRecord {
            customer_id: raw.customer_id,
            product: raw.product_name,
            first_activation_date,
            cancel_date,
            channel: raw.channel,
        });
    }

    tracing::info!(path = %path.display(), rows = records.len(), "loaded customer records");
    Ok(records)
}

/// Load pre-aggregated usage events from a CSV file.
pub fn load_usage(path: &Path) -> Result<Vec<UsageEvent>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut events = Vec::new();

    for result in reader.deserialize() {
        let raw: RawUsageRow = result?;
        let line = events.len() as u64 + 2;

        events.push(UsageEvent {
            customer_id: raw.customer_id,
            product: raw.product_name,
            action_type_id: raw.action_type_id,
            usage_count: parse_count(&raw.usage_count, line),
        });
    }

    tracing::info!(path = %path.display(), rows = events.len(), "loaded usage events");
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_customers_tolerant_dates() {
        let file = write_csv(
            "customerid,product_name,first_activation_date,cancel_date,channel\n\
             1,Mailchimp,2021-01-01,,Organic\n\
             2,Mailchimp,not-a-date,2021-02-03,Paid Search\n\
             3,QuickBooks,,,Referral\n",
        );

        let records = load_customers(file.path()).unwrap();
        assert_eq!(records.len(), 3);

        assert_eq!(
            records[0].first_activation_date,
            NaiveDate::from_ymd_opt(2021, 1, 1)
        );
        assert!(records[0].cancel_date.is_none());

        // Garbage date degrades to absent, row survives
        assert!(records[1].first_activation_date.is_none());
        assert_eq!(
            records[1].cancel_date,
            NaiveDate::from_ymd_opt(2021, 2, 3)
        );

        assert!(!records[2].is_activated());
        assert_eq!(records[2].channel, "Referral");
    }

    #[test]
    fn test_load_usage_clamps_counts() {
        let file = write_csv(
            "customerid,product_name,action_type_id,usage_count\n\
             1,Mailchimp,2,14\n\
             2,Mailchimp,5,-3\n\
             3,QuickBooks,5,lots\n",
        );

        let events = load_usage(file.path()).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].usage_count, 14);
        assert_eq!(events[1].usage_count, 0);
        assert_eq!(events[2].usage_count, 0);
        assert_eq!(events[2].action_type_id, 5);
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(load_customers(Path::new("/nonexistent/customers.csv")).is_err());
    }

    #[test]
    fn test_missing_column_is_error() {
        let file = write_csv("customerid,product_name\n1,Mailchimp\n");
        assert!(load_customers(file.path()).is_err());
    }
}

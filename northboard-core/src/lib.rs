//! # northboard-core
//!
//! Core library for northboard - a customer-analytics dashboard for a
//! multi-product subscription business.
//!
//! This library provides:
//! - Domain types for customer records and usage events
//! - CSV ingestion with tolerant boundary parsing
//! - Product-scoped action classification with North Star designation
//! - The aggregation pipeline: per-product summaries, a daily
//!   activation/cancellation series, and churned-vs-retained cohort
//!   comparisons
//!
//! ## Architecture
//!
//! Data flows strictly forward: loader -> classifier -> aggregators ->
//! merged report. Every step produces a new table; no shared mutable state,
//! no persistence, no inference of configuration from data.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use northboard_core::{ActionCatalog, Config};
//! use northboard_core::analytics::{compute, DeepDiveParams};
//! use northboard_core::ingest;
//!
//! let config = Config::load_from(Path::new("northboard.toml")).expect("config");
//! let catalog = ActionCatalog::from_config(&config).expect("catalog");
//! let records = ingest::load_customers(Path::new("customer_data.csv")).expect("customers");
//! let events = ingest::load_usage(Path::new("usage_data.csv")).expect("usage");
//!
//! let deep_dive = config.deep_dive.as_ref().expect("deep_dive config");
//! let params = DeepDiveParams::from_config(deep_dive).expect("range");
//! let report = compute(&records, &events, &catalog, &params);
//! println!("{} products", report.summary.len());
//! ```

// Re-export commonly used items at the crate root
pub use classify::{ActionCatalog, UNKNOWN_ACTION};
pub use config::Config;
pub use error::{Error, Result};
pub use types::{CustomerRecord, UsageEvent};

// Public modules
pub mod analytics;
pub mod classify;
pub mod config;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod types;

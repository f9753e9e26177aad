//! Chapel Core - offering aggregates for church management clients
//!
//! The dashboard and mobile app fetch snapshots from the backend; this crate
//! computes what they display from those snapshots:
//!
//! - **domain**: records as the backend sends them (FinancialRecord, Poll)
//! - **services**: totals, week/month grouping, poll tallies, SMS segments,
//!   and the structured event log
//! - **config**: settings shared with the dashboard

pub mod config;
pub mod domain;
mod log_migrations;
pub mod services;

use std::path::Path;

use anyhow::Result;

use config::Config;
use services::ReportService;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{parse_snapshot, FinancialRecord, NestedCollection, OfferingField, Poll, PollVote};
pub use services::{
    count_segments, group_by_period, record_total, sum_fields, sum_nested, tally, EntryPoint,
    Granularity, GroupingOptions, LogEvent, LoggingService, TimeBucketedCollection,
};

/// Main context for Chapel operations
///
/// Holds the loaded configuration and the services built from it.
pub struct ChapelContext {
    pub config: Config,
    pub report_service: ReportService,
}

impl ChapelContext {
    pub fn new(chapel_dir: &Path) -> Result<Self> {
        let config = Config::load(chapel_dir)?;
        let report_service = ReportService::new(&config);

        Ok(Self {
            config,
            report_service,
        })
    }
}

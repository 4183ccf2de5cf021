//! Campaign Pulse core: dashboard payload model, ingestion into
//! normalized campaigns, grouping keys, configuration and errors.

pub mod config;
pub mod error;
pub mod ingest;
pub mod keys;
pub mod lenient;
pub mod types;

pub use config::ReportingConfig;
pub use error::{PulseError, PulseResult};
pub use ingest::{ingest, Campaign};
pub use types::{CampaignRecord, MarketingData};

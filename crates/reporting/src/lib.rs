//! Campaign performance reporting: per-dimension aggregation with
//! proportional spend/revenue allocation, derived rates and presentation
//! formatting.

pub mod aggregator;
pub mod allocation;
pub mod bucket;
pub mod dimension;
pub mod formatter;
pub mod rates;
pub mod report;
pub mod weekly;

pub use aggregator::{aggregate, aggregate_campaigns};
pub use bucket::{AggregationBucket, Counters, DimensionBuckets, SubGroup};
pub use dimension::DimensionKind;
pub use formatter::BucketFormatter;
pub use rates::{derive_rates, DerivedRates};
pub use report::{AggregationEngine, DimensionReport};

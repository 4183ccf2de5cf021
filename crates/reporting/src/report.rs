//! Multi-dimension report: runs every dimension aggregation over one
//! input, optionally on scoped threads.

use std::thread;

use pulse_core::ingest::{self, Campaign};
use pulse_core::{CampaignRecord, ReportingConfig};
use serde::Serialize;
use tracing::info;

use crate::aggregator::aggregate_campaigns;
use crate::bucket::DimensionBuckets;
use crate::dimension::DimensionKind;

/// Buckets for all five dimensions of one input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DimensionReport {
    pub gender: DimensionBuckets,
    pub age_group: DimensionBuckets,
    pub device: DimensionBuckets,
    pub region: DimensionBuckets,
    pub week: DimensionBuckets,
}

impl DimensionReport {
    pub fn get(&self, dimension: DimensionKind) -> &DimensionBuckets {
        match dimension {
            DimensionKind::Gender => &self.gender,
            DimensionKind::AgeGroup => &self.age_group,
            DimensionKind::Device => &self.device,
            DimensionKind::Region => &self.region,
            DimensionKind::Week => &self.week,
        }
    }

    fn set(&mut self, dimension: DimensionKind, buckets: DimensionBuckets) {
        match dimension {
            DimensionKind::Gender => self.gender = buckets,
            DimensionKind::AgeGroup => self.age_group = buckets,
            DimensionKind::Device => self.device = buckets,
            DimensionKind::Region => self.region = buckets,
            DimensionKind::Week => self.week = buckets,
        }
    }
}

/// Stateless entry point for the reporting layer. Holds only configuration,
/// so one engine can serve any number of concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct AggregationEngine {
    config: ReportingConfig,
}

impl AggregationEngine {
    pub fn new(config: ReportingConfig) -> Self {
        Self { config }
    }

    pub fn aggregate(
        &self,
        records: &[CampaignRecord],
        dimension: DimensionKind,
    ) -> DimensionBuckets {
        crate::aggregator::aggregate(records, dimension)
    }

    pub fn report(&self, records: &[CampaignRecord]) -> DimensionReport {
        let campaigns = ingest::ingest(records);
        let results = if self.config.parallel_dimensions {
            aggregate_parallel(&campaigns)
        } else {
            DimensionKind::ALL
                .into_iter()
                .map(|kind| (kind, aggregate_campaigns(&campaigns, kind)))
                .collect()
        };

        let report = results
            .into_iter()
            .fold(DimensionReport::default(), |mut report, (kind, buckets)| {
                report.set(kind, buckets);
                report
            });

        info!(
            records = records.len(),
            parallel = self.config.parallel_dimensions,
            gender = report.gender.len(),
            age_groups = report.age_group.len(),
            devices = report.device.len(),
            regions = report.region.len(),
            weeks = report.week.len(),
            "Dimension report computed"
        );
        report
    }
}

/// One scoped thread per dimension, each owning its accumulator. Results
/// are only read once every thread has joined.
fn aggregate_parallel(campaigns: &[Campaign]) -> Vec<(DimensionKind, DimensionBuckets)> {
    thread::scope(|scope| {
        let handles: Vec<_> = DimensionKind::ALL
            .into_iter()
            .map(|kind| scope.spawn(move || (kind, aggregate_campaigns(campaigns, kind))))
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::types::{DemographicEntry, Performance, RegionEntry, WeekEntry};

    fn sample_records() -> Vec<CampaignRecord> {
        (0..6)
            .map(|i| {
                let f = i as f64;
                CampaignRecord {
                    spend: 1_000.0 + f * 17.3,
                    revenue: 2_500.0 - f * 11.1,
                    clicks: 30.0 + f,
                    conversions: 7.0 + f,
                    demographic_breakdown: vec![
                        DemographicEntry {
                            gender: Some("Male".into()),
                            age_group: Some(format!("{}-{}", 18 + i, 24 + i)),
                            performance: Performance {
                                impressions: 900.0 + f,
                                clicks: 13.0 + f,
                                conversions: 3.0,
                                ..Default::default()
                            },
                            ..Default::default()
                        },
                        DemographicEntry {
                            gender: Some("Female".into()),
                            age_group: Some("25-34".into()),
                            performance: Performance {
                                impressions: 700.0,
                                clicks: 17.0,
                                conversions: 4.0 + f,
                                ..Default::default()
                            },
                            ..Default::default()
                        },
                    ],
                    regional_performance: vec![RegionEntry {
                        region: Some(if i % 2 == 0 { "Doha" } else { "Manama" }.into()),
                        spend: 100.0 + f,
                        revenue: 300.0,
                        ..Default::default()
                    }],
                    weekly_performance: vec![WeekEntry {
                        week_start: Some(format!("2024-10-{:02}", 29 - i * 4)),
                        spend: 10.0,
                        revenue: 20.0,
                        clicks: 3.0,
                        conversions: 1.0,
                        ..Default::default()
                    }],
                    ..Default::default()
                }
            })
            .collect()
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let records = sample_records();
        let sequential = AggregationEngine::default().report(&records);
        let parallel = AggregationEngine::new(ReportingConfig {
            parallel_dimensions: true,
            ..Default::default()
        })
        .report(&records);

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_report_matches_single_dimension_calls() {
        let records = sample_records();
        let engine = AggregationEngine::default();
        let report = engine.report(&records);
        for kind in DimensionKind::ALL {
            assert_eq!(report.get(kind), &engine.aggregate(&records, kind));
        }
    }

    #[test]
    fn test_report_is_deterministic() {
        let records = sample_records();
        let engine = AggregationEngine::default();
        let first = serde_json::to_string(&engine.report(&records)).unwrap();
        let second = serde_json::to_string(&engine.report(&records)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_weeks_ordered_in_report() {
        let report = AggregationEngine::default().report(&sample_records());
        let keys: Vec<_> = report.week.keys().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(keys.first().copied(), Some("2024-10-09"));
    }
}

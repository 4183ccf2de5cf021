//! Dimension aggregation: groups breakdown entries by key, sums counters
//! and allocates campaign spend/revenue across keys.
//!
//! Each dimension is a fold over the campaigns in record order (entries in
//! their listed order), so float accumulation is reproducible. Work is
//! linear in the number of breakdown entries.

use pulse_core::ingest::{self, Campaign};
use pulse_core::CampaignRecord;
use tracing::debug;

use crate::allocation::proportional_share;
use crate::bucket::{Counters, DimensionBuckets};
use crate::dimension::DimensionKind;
use crate::weekly;

/// Aggregate raw payload records along one dimension.
pub fn aggregate(records: &[CampaignRecord], dimension: DimensionKind) -> DimensionBuckets {
    aggregate_campaigns(&ingest::ingest(records), dimension)
}

/// Aggregate already-ingested campaigns along one dimension.
pub fn aggregate_campaigns(campaigns: &[Campaign], dimension: DimensionKind) -> DimensionBuckets {
    let seed = DimensionBuckets::new();
    let buckets = match dimension {
        DimensionKind::Gender => campaigns.iter().fold(seed, fold_gender),
        DimensionKind::AgeGroup => campaigns.iter().fold(seed, fold_age_group),
        DimensionKind::Device => campaigns.iter().fold(seed, fold_device),
        DimensionKind::Region => campaigns.iter().fold(seed, fold_region),
        DimensionKind::Week => {
            weekly::order_chronologically(campaigns.iter().fold(seed, fold_week))
        }
    };
    let buckets = buckets.finalize();

    metrics::counter!("reporting.aggregations", "dimension" => dimension.as_str()).increment(1);
    debug!(
        dimension = %dimension,
        campaigns = campaigns.len(),
        buckets = buckets.len(),
        "Dimension aggregated"
    );
    buckets
}

/// Spend follows each gender's share of the campaign's clicks summed over
/// all of its gender keys; revenue follows conversions the same way.
/// Counters reach `acc` entry by entry; the per-campaign map only holds the
/// allocation basis of each gender key.
fn fold_gender(mut acc: DimensionBuckets, campaign: &Campaign) -> DimensionBuckets {
    let mut basis = DimensionBuckets::new();
    for demo in &campaign.demographics {
        let counters = Counters::new(demo.impressions, demo.clicks, demo.conversions);
        acc.entry(&demo.gender).add_counters(&counters);
        basis.entry(&demo.gender).add_counters(&counters);
    }

    let click_basis: f64 = basis.iter().map(|b| b.counters.clicks).sum();
    let conversion_basis: f64 = basis.iter().map(|b| b.counters.conversions).sum();

    for share in basis.iter() {
        acc.entry(&share.key).add_money(
            proportional_share(campaign.totals.spend, share.counters.clicks, click_basis),
            proportional_share(
                campaign.totals.revenue,
                share.counters.conversions,
                conversion_basis,
            ),
        );
    }
    acc
}

/// Spend follows each entry's clicks over the campaign's own click total;
/// revenue follows conversions over the campaign's own conversion total.
fn fold_age_group(mut acc: DimensionBuckets, campaign: &Campaign) -> DimensionBuckets {
    let totals = campaign.totals;
    for demo in &campaign.demographics {
        let counters = Counters::new(demo.impressions, demo.clicks, demo.conversions);
        let bucket = acc.entry(&demo.age_group);
        bucket.add_counters(&counters);
        bucket.add_sub_group(&demo.gender, &counters);
        bucket.add_money(
            proportional_share(totals.spend, demo.clicks, totals.clicks),
            proportional_share(totals.revenue, demo.conversions, totals.conversions),
        );
    }
    acc
}

fn fold_device(mut acc: DimensionBuckets, campaign: &Campaign) -> DimensionBuckets {
    for device in &campaign.devices {
        let bucket = acc.entry(&device.device);
        bucket.add_counters(&Counters::new(
            device.impressions,
            device.clicks,
            device.conversions,
        ));
        bucket.add_money(device.spend, device.revenue);
    }
    acc
}

fn fold_region(mut acc: DimensionBuckets, campaign: &Campaign) -> DimensionBuckets {
    for region in &campaign.regions {
        acc.entry(&region.region).add_money(region.spend, region.revenue);
    }
    acc
}

fn fold_week(mut acc: DimensionBuckets, campaign: &Campaign) -> DimensionBuckets {
    for week in &campaign.weeks {
        let bucket = acc.entry(&week.week.label);
        bucket.period_start = week.week.start;
        bucket.add_counters(&Counters::new(0.0, week.clicks, week.conversions));
        bucket.add_money(week.spend, week.revenue);
    }
    acc
}

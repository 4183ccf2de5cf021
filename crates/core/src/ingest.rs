//! Coerce-or-default step: payload records become fully populated
//! campaigns with normalized keys before any arithmetic runs.

use crate::keys::{self, WeekKey};
use crate::lenient::coerce_number;
use crate::types::{CampaignRecord, DemographicEntry, DeviceEntry, RegionEntry, WeekEntry};

/// Campaign-level totals, the allocation denominators.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CampaignTotals {
    pub spend: f64,
    pub revenue: f64,
    pub clicks: f64,
    pub conversions: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DemographicActivity {
    pub gender: String,
    pub age_group: String,
    pub impressions: f64,
    pub clicks: f64,
    pub conversions: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceActivity {
    pub device: String,
    pub spend: f64,
    pub revenue: f64,
    pub impressions: f64,
    pub clicks: f64,
    pub conversions: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionActivity {
    pub region: String,
    pub spend: f64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekActivity {
    pub week: WeekKey,
    pub spend: f64,
    pub revenue: f64,
    pub clicks: f64,
    pub conversions: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Campaign {
    pub totals: CampaignTotals,
    pub demographics: Vec<DemographicActivity>,
    pub devices: Vec<DeviceActivity>,
    pub regions: Vec<RegionActivity>,
    pub weeks: Vec<WeekActivity>,
}

impl From<&CampaignRecord> for Campaign {
    fn from(record: &CampaignRecord) -> Self {
        Self {
            totals: CampaignTotals {
                spend: coerce_number(record.spend),
                revenue: coerce_number(record.revenue),
                clicks: coerce_number(record.clicks),
                conversions: coerce_number(record.conversions),
            },
            demographics: record
                .demographic_breakdown
                .iter()
                .map(DemographicActivity::from)
                .collect(),
            devices: record
                .device_performance
                .iter()
                .map(DeviceActivity::from)
                .collect(),
            regions: record
                .regional_performance
                .iter()
                .map(RegionActivity::from)
                .collect(),
            weeks: record
                .weekly_performance
                .iter()
                .map(WeekActivity::from)
                .collect(),
        }
    }
}

impl From<&DemographicEntry> for DemographicActivity {
    fn from(entry: &DemographicEntry) -> Self {
        Self {
            gender: keys::gender_key(entry.gender.as_deref()),
            age_group: keys::age_group_key(entry.age_group.as_deref()),
            impressions: coerce_number(entry.performance.impressions),
            clicks: coerce_number(entry.performance.clicks),
            conversions: coerce_number(entry.performance.conversions),
        }
    }
}

impl From<&DeviceEntry> for DeviceActivity {
    fn from(entry: &DeviceEntry) -> Self {
        Self {
            device: keys::categorical_key(entry.device.as_deref(), false),
            spend: coerce_number(entry.spend),
            revenue: coerce_number(entry.revenue),
            impressions: coerce_number(entry.impressions.unwrap_or_default()),
            clicks: coerce_number(entry.clicks.unwrap_or_default()),
            conversions: coerce_number(entry.conversions.unwrap_or_default()),
        }
    }
}

impl From<&RegionEntry> for RegionActivity {
    fn from(entry: &RegionEntry) -> Self {
        Self {
            region: keys::categorical_key(entry.region.as_deref(), false),
            spend: coerce_number(entry.spend),
            revenue: coerce_number(entry.revenue),
        }
    }
}

impl From<&WeekEntry> for WeekActivity {
    fn from(entry: &WeekEntry) -> Self {
        Self {
            week: keys::week_key(entry.week_start.as_deref()),
            spend: coerce_number(entry.spend),
            revenue: coerce_number(entry.revenue),
            clicks: coerce_number(entry.clicks),
            conversions: coerce_number(entry.conversions),
        }
    }
}

pub fn ingest(records: &[CampaignRecord]) -> Vec<Campaign> {
    records.iter().map(Campaign::from).collect()
}

//! Presentation helpers: rounding, currency/percentage strings, week labels
//! and chart series built from aggregated buckets.

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use pulse_core::ReportingConfig;
use serde::Serialize;

use crate::bucket::{AggregationBucket, DimensionBuckets, SubGroup};

/// Round half away from zero to `decimals` places. Non-finite input gives 0.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() {
        rounded
    } else {
        value
    }
}

/// `1234.5` → `"$1,234.50"`; negatives render as `"-$12.00"`.
pub fn format_currency(value: f64, symbol: &str, decimals: u32) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let fixed = format!("{:.*}", decimals as usize, value.abs());
    let (whole, fraction) = match fixed.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let is_negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if is_negative { "-" } else { "" };
    match fraction {
        Some(fraction) => format!("{sign}{symbol}{grouped}.{fraction}"),
        None => format!("{sign}{symbol}{grouped}"),
    }
}

/// `12.3456` → `"12.35%"`.
pub fn format_percent(value: f64, decimals: u32) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("{:.*}%", decimals as usize, value)
}

/// `"2024-10-01"` → `"Oct 1"` with the default pattern. Keys that are not
/// ISO dates, or an invalid pattern, return the key unchanged.
pub fn week_label(key: &str, pattern: &str) -> String {
    let Ok(date) = NaiveDate::parse_from_str(key, "%Y-%m-%d") else {
        return key.to_string();
    };
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return key.to_string();
    }
    date.format_with_items(items.into_iter()).to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedSubRow {
    pub key: String,
    pub impressions: f64,
    pub clicks: f64,
    pub conversions: f64,
    pub ctr: String,
    pub conv_rate: String,
}

/// One table row per bucket, values rounded and rendered for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedRow {
    pub key: String,
    pub label: String,
    pub impressions: f64,
    pub clicks: f64,
    pub conversions: f64,
    pub spend: f64,
    pub revenue: f64,
    pub spend_display: String,
    pub revenue_display: String,
    pub ctr: String,
    pub conv_rate: String,
    pub sub_rows: Vec<FormattedSubRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

pub struct BucketFormatter {
    config: ReportingConfig,
}

impl BucketFormatter {
    pub fn new(config: ReportingConfig) -> Self {
        Self { config }
    }

    pub fn currency(&self, value: f64) -> String {
        format_currency(
            round_to(value, self.config.currency_decimals),
            &self.config.currency_symbol,
            self.config.currency_decimals,
        )
    }

    pub fn percent(&self, value: f64) -> String {
        format_percent(value, self.config.percent_decimals)
    }

    /// Week keys get calendar labels; other keys are their own label.
    pub fn label(&self, bucket: &AggregationBucket) -> String {
        match bucket.period_start {
            Some(_) => week_label(&bucket.key, &self.config.week_label_format),
            None => bucket.key.clone(),
        }
    }

    pub fn row(&self, bucket: &AggregationBucket) -> FormattedRow {
        let decimals = self.config.currency_decimals;
        FormattedRow {
            key: bucket.key.clone(),
            label: self.label(bucket),
            impressions: bucket.counters.impressions,
            clicks: bucket.counters.clicks,
            conversions: bucket.counters.conversions,
            spend: round_to(bucket.spend, decimals),
            revenue: round_to(bucket.revenue, decimals),
            spend_display: self.currency(bucket.spend),
            revenue_display: self.currency(bucket.revenue),
            ctr: self.percent(bucket.rates.ctr),
            conv_rate: self.percent(bucket.rates.conv_rate),
            sub_rows: bucket
                .sub_groups
                .iter()
                .map(|(key, group)| self.sub_row(key, group))
                .collect(),
        }
    }

    fn sub_row(&self, key: &str, group: &SubGroup) -> FormattedSubRow {
        FormattedSubRow {
            key: key.to_string(),
            impressions: group.counters.impressions,
            clicks: group.counters.clicks,
            conversions: group.counters.conversions,
            ctr: self.percent(group.rates.ctr),
            conv_rate: self.percent(group.rates.conv_rate),
        }
    }

    /// Rows in mapping order (chronological for weeks).
    pub fn rows(&self, buckets: &DimensionBuckets) -> Vec<FormattedRow> {
        buckets.iter().map(|b| self.row(b)).collect()
    }

    pub fn spend_series(&self, buckets: &DimensionBuckets) -> Vec<ChartPoint> {
        self.series(buckets, self.config.currency_decimals, |b| b.spend)
    }

    pub fn revenue_series(&self, buckets: &DimensionBuckets) -> Vec<ChartPoint> {
        self.series(buckets, self.config.currency_decimals, |b| b.revenue)
    }

    /// Whole-number clicks per bucket, e.g. the weekly clicks line.
    pub fn clicks_series(&self, buckets: &DimensionBuckets) -> Vec<ChartPoint> {
        self.series(buckets, 0, |b| b.counters.clicks)
    }

    pub fn conversions_series(&self, buckets: &DimensionBuckets) -> Vec<ChartPoint> {
        self.series(buckets, 0, |b| b.counters.conversions)
    }

    fn series<F>(&self, buckets: &DimensionBuckets, decimals: u32, value: F) -> Vec<ChartPoint>
    where
        F: Fn(&AggregationBucket) -> f64,
    {
        buckets
            .iter()
            .map(|b| ChartPoint {
                label: self.label(b),
                value: round_to(value(b), decimals),
            })
            .collect()
    }
}

impl Default for BucketFormatter {
    fn default() -> Self {
        Self::new(ReportingConfig::default())
    }
}

//! Per-key accumulators and the ordered key → bucket mapping every
//! dimension aggregates into.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use pulse_core::lenient::coerce_number;
use serde::ser::{Serialize, Serializer};
use serde::Deserialize;

use crate::rates::{derive_rates, DerivedRates};

/// Raw activity counters summed per bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, Deserialize)]
pub struct Counters {
    pub impressions: f64,
    pub clicks: f64,
    pub conversions: f64,
}

impl Counters {
    pub fn new(impressions: f64, clicks: f64, conversions: f64) -> Self {
        Self {
            impressions,
            clicks,
            conversions,
        }
    }

    pub fn absorb(&mut self, other: &Counters) {
        self.impressions = coerce_number(self.impressions + other.impressions);
        self.clicks = coerce_number(self.clicks + other.clicks);
        self.conversions = coerce_number(self.conversions + other.conversions);
    }
}

/// Counters for one sub-group of a bucket (a gender within an age group).
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct SubGroup {
    pub counters: Counters,
    pub rates: DerivedRates,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct AggregationBucket {
    pub key: String,
    pub counters: Counters,
    /// Allocated from campaign totals, or summed from per-entry spend for
    /// dimensions that carry their own.
    pub spend: f64,
    pub revenue: f64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub sub_groups: BTreeMap<String, SubGroup>,
    pub rates: DerivedRates,
    /// Parsed start date for week buckets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_start: Option<NaiveDate>,
}

impl AggregationBucket {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            counters: Counters::default(),
            spend: 0.0,
            revenue: 0.0,
            sub_groups: BTreeMap::new(),
            rates: DerivedRates::default(),
            period_start: None,
        }
    }

    pub fn add_counters(&mut self, counters: &Counters) {
        self.counters.absorb(counters);
    }

    pub fn add_money(&mut self, spend: f64, revenue: f64) {
        self.spend = coerce_number(self.spend + spend);
        self.revenue = coerce_number(self.revenue + revenue);
    }

    pub fn add_sub_group(&mut self, key: &str, counters: &Counters) {
        self.sub_groups
            .entry(key.to_string())
            .or_default()
            .counters
            .absorb(counters);
    }

    pub fn sub_group(&self, key: &str) -> Option<&SubGroup> {
        self.sub_groups.get(key)
    }

    fn finalize(mut self) -> Self {
        self.rates = derive_rates(&self.counters);
        for group in self.sub_groups.values_mut() {
            group.rates = derive_rates(&group.counters);
        }
        self
    }
}

/// Key → bucket mapping that remembers first-encounter order.
///
/// Serializes as a JSON object whose entries follow that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DimensionBuckets {
    buckets: Vec<AggregationBucket>,
    index: HashMap<String, usize>,
}

impl DimensionBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bucket for `key`, created empty on first use.
    pub fn entry(&mut self, key: &str) -> &mut AggregationBucket {
        let slot = match self.index.get(key) {
            Some(&slot) => slot,
            None => {
                self.buckets.push(AggregationBucket::new(key));
                let slot = self.buckets.len() - 1;
                self.index.insert(key.to_string(), slot);
                slot
            }
        };
        &mut self.buckets[slot]
    }

    pub fn get(&self, key: &str) -> Option<&AggregationBucket> {
        self.index.get(key).map(|&slot| &self.buckets[slot])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AggregationBucket> {
        self.buckets.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|b| b.key.as_str())
    }

    /// Stable reorder by `key_fn`; equal keys keep encounter order.
    pub fn sorted_by_key<K, F>(mut self, key_fn: F) -> Self
    where
        K: Ord,
        F: FnMut(&AggregationBucket) -> K,
    {
        self.buckets.sort_by_key(key_fn);
        self.reindex();
        self
    }

    /// Compute derived rates for every bucket and sub-group.
    pub fn finalize(self) -> Self {
        let buckets: Vec<_> = self
            .buckets
            .into_iter()
            .map(AggregationBucket::finalize)
            .collect();
        Self {
            buckets,
            index: self.index,
        }
    }

    fn reindex(&mut self) {
        self.index = self
            .buckets
            .iter()
            .enumerate()
            .map(|(slot, b)| (b.key.clone(), slot))
            .collect();
    }
}

impl Serialize for DimensionBuckets {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.buckets.iter().map(|b| (&b.key, b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_preserves_encounter_order() {
        let mut buckets = DimensionBuckets::new();
        buckets.entry("Mobile").add_money(1.0, 2.0);
        buckets.entry("Desktop").add_money(3.0, 4.0);
        buckets.entry("Mobile").add_money(1.0, 0.5);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets.keys().collect::<Vec<_>>(), vec!["Mobile", "Desktop"]);
        let mobile = buckets.get("Mobile").unwrap();
        assert_eq!(mobile.spend, 2.0);
        assert_eq!(mobile.revenue, 2.5);
    }

    #[test]
    fn test_nan_never_reaches_sums() {
        let mut bucket = AggregationBucket::new("x");
        bucket.add_money(f64::NAN, 1.0);
        bucket.add_counters(&Counters::new(f64::NAN, 2.0, 0.0));
        assert_eq!(bucket.spend, 0.0);
        assert_eq!(bucket.counters.impressions, 0.0);
        assert_eq!(bucket.counters.clicks, 2.0);
    }

    #[test]
    fn test_finalize_computes_sub_group_rates() {
        let mut buckets = DimensionBuckets::new();
        let bucket = buckets.entry("25-34");
        bucket.add_counters(&Counters::new(200.0, 10.0, 2.0));
        bucket.add_sub_group("male", &Counters::new(200.0, 10.0, 2.0));

        let buckets = buckets.finalize();
        let bucket = buckets.get("25-34").unwrap();
        assert!((bucket.rates.ctr - 5.0).abs() < 1e-12);
        let male = bucket.sub_group("male").unwrap();
        assert!((male.rates.conv_rate - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_sorted_by_key_reindexes() {
        let mut buckets = DimensionBuckets::new();
        buckets.entry("b");
        buckets.entry("a");
        let buckets = buckets.sorted_by_key(|b| b.key.clone());
        assert_eq!(buckets.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(buckets.get("b").map(|b| b.key.as_str()), Some("b"));
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let mut buckets = DimensionBuckets::new();
        buckets.entry("z");
        buckets.entry("a");
        let json = serde_json::to_string(&buckets).unwrap();
        let z = json.find("\"z\"").unwrap();
        let a = json.find("\"a\"").unwrap();
        assert!(z < a);
    }
}

//! Chronological ordering of week buckets.

use crate::bucket::DimensionBuckets;

/// Sort ascending by parsed week start. Equal dates keep encounter order;
/// buckets whose key never parsed as a date go last, also in encounter order.
pub fn order_chronologically(buckets: DimensionBuckets) -> DimensionBuckets {
    buckets.sorted_by_key(|b| (b.period_start.is_none(), b.period_start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn week(buckets: &mut DimensionBuckets, key: &str, date: Option<(i32, u32, u32)>) {
        buckets.entry(key).period_start =
            date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
    }

    #[test]
    fn test_orders_by_date() {
        let mut buckets = DimensionBuckets::new();
        week(&mut buckets, "2024-10-08", Some((2024, 10, 8)));
        week(&mut buckets, "2024-10-01", Some((2024, 10, 1)));

        let ordered = order_chronologically(buckets);
        assert_eq!(
            ordered.keys().collect::<Vec<_>>(),
            vec!["2024-10-01", "2024-10-08"]
        );
    }

    #[test]
    fn test_undated_keys_trail_in_encounter_order() {
        let mut buckets = DimensionBuckets::new();
        week(&mut buckets, "week 2", None);
        week(&mut buckets, "2024-09-30", Some((2024, 9, 30)));
        week(&mut buckets, "Unknown", None);
        week(&mut buckets, "2023-12-25", Some((2023, 12, 25)));

        let ordered = order_chronologically(buckets);
        assert_eq!(
            ordered.keys().collect::<Vec<_>>(),
            vec!["2023-12-25", "2024-09-30", "week 2", "Unknown"]
        );
    }
}

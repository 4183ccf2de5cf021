//! Derived rate metrics with an explicit zero-denominator policy.

use pulse_core::lenient::coerce_number;
use serde::{Deserialize, Serialize};

use crate::bucket::Counters;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedRates {
    /// `clicks / impressions * 100` (0.0 when impressions is not positive).
    pub ctr: f64,
    /// `conversions / clicks * 100` (0.0 when clicks is not positive).
    pub conv_rate: f64,
}

/// Percentage of `numerator` over `denominator`, 0 unless the denominator
/// is strictly positive. Never returns NaN.
pub fn percentage(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        coerce_number(numerator / denominator * 100.0)
    } else {
        0.0
    }
}

pub fn derive_rates(counters: &Counters) -> DerivedRates {
    DerivedRates {
        ctr: percentage(counters.clicks, counters.impressions),
        conv_rate: percentage(counters.conversions, counters.clicks),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counters(impressions: f64, clicks: f64, conversions: f64) -> Counters {
        Counters {
            impressions,
            clicks,
            conversions,
        }
    }

    #[test]
    fn test_rates_basic() {
        let rates = derive_rates(&counters(1_000.0, 50.0, 5.0));
        assert!((rates.ctr - 5.0).abs() < 1e-12);
        assert!((rates.conv_rate - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_impressions_gives_zero_ctr() {
        let rates = derive_rates(&counters(0.0, 5.0, 1.0));
        assert_eq!(rates.ctr, 0.0);
        assert!((rates.conv_rate - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_clicks_gives_zero_conv_rate() {
        let rates = derive_rates(&counters(100.0, 0.0, 3.0));
        assert_eq!(rates.ctr, 0.0);
        assert_eq!(rates.conv_rate, 0.0);
    }

    #[test]
    fn test_negative_denominators_give_zero() {
        let rates = derive_rates(&counters(-10.0, -2.0, 1.0));
        assert_eq!(rates.ctr, 0.0);
        assert_eq!(rates.conv_rate, 0.0);
    }

    #[test]
    fn test_rates_never_nan() {
        let rates = derive_rates(&counters(f64::INFINITY, f64::INFINITY, 1.0));
        assert!(!rates.ctr.is_nan());
        assert!(!rates.conv_rate.is_nan());
        assert_eq!(rates.ctr, 0.0);
    }
}

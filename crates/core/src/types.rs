//! Dashboard payload types as delivered by the campaign data source.
//!
//! Every field is optional on the wire. Unknown fields are kept in `extra`
//! so a record serializes back to what was received.

use crate::error::PulseResult;
use crate::lenient;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level payload: `{ "campaigns": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketingData {
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub campaigns: Vec<CampaignRecord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MarketingData {
    pub fn from_json_str(payload: &str) -> PulseResult<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> PulseResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// One campaign's totals and its per-dimension breakdowns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
    #[serde(default, deserialize_with = "lenient::number")]
    pub spend: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub revenue: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub clicks: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub conversions: f64,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub demographic_breakdown: Vec<DemographicEntry>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub device_performance: Vec<DeviceEntry>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub regional_performance: Vec<RegionEntry>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub weekly_performance: Vec<WeekEntry>,
    /// id, name, status and anything else the source attaches.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemographicEntry {
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub gender: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub age_group: Option<String>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub performance: Performance,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    #[serde(default, deserialize_with = "lenient::number")]
    pub impressions: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub clicks: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub conversions: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceEntry {
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub device: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub revenue: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub spend: f64,
    #[serde(
        default,
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub impressions: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub clicks: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub conversions: Option<f64>,
    /// ctr, conversion_rate, percentage_of_traffic, ...
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionEntry {
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub spend: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub revenue: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekEntry {
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub week_start: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub spend: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub revenue: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub clicks: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub conversions: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sparse_campaign_decodes() {
        let record: CampaignRecord = serde_json::from_value(json!({
            "id": 7,
            "name": "Ramadan Promo",
            "spend": "1200.50",
            "clicks": null,
            "demographic_breakdown": [
                { "gender": "Male", "performance": { "clicks": 3 } },
                { "age_group": "25-34", "performance": null }
            ],
            "device_performance": null
        }))
        .unwrap();

        assert_eq!(record.spend, 1200.5);
        assert_eq!(record.clicks, 0.0);
        assert_eq!(record.revenue, 0.0);
        assert_eq!(record.demographic_breakdown.len(), 2);
        assert_eq!(record.demographic_breakdown[0].performance.clicks, 3.0);
        assert_eq!(record.demographic_breakdown[1].age_group.as_deref(), Some("25-34"));
        assert!(record.device_performance.is_empty());
        assert!(record.weekly_performance.is_empty());
        assert_eq!(record.extra.get("name"), Some(&json!("Ramadan Promo")));
    }

    #[test]
    fn test_device_entry_round_trips_optional_fields() {
        let raw = json!({
            "device": "Mobile",
            "revenue": 10.0,
            "spend": 4.0,
            "clicks": 12.0,
            "ctr": 1.5,
            "percentage_of_traffic": 60.0
        });
        let entry: DeviceEntry = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(entry.clicks, Some(12.0));
        assert_eq!(entry.impressions, None);
        assert_eq!(serde_json::to_value(&entry).unwrap(), raw);
    }

    #[test]
    fn test_payload_from_str() {
        let data = MarketingData::from_json_str(
            r#"{ "campaigns": [ { "spend": 5 } ], "company_info": { "name": "Acme" } }"#,
        )
        .unwrap();
        assert_eq!(data.campaigns.len(), 1);
        assert!(data.extra.contains_key("company_info"));
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        assert!(MarketingData::from_json_str("{ not json").is_err());
    }
}

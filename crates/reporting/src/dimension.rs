use std::fmt;
use std::str::FromStr;

use pulse_core::PulseError;
use serde::{Deserialize, Serialize};

/// A reporting dimension campaigns are broken down by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionKind {
    Gender,
    AgeGroup,
    Device,
    Region,
    Week,
}

impl DimensionKind {
    pub const ALL: [DimensionKind; 5] = [
        DimensionKind::Gender,
        DimensionKind::AgeGroup,
        DimensionKind::Device,
        DimensionKind::Region,
        DimensionKind::Week,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gender => "gender",
            Self::AgeGroup => "age_group",
            Self::Device => "device",
            Self::Region => "region",
            Self::Week => "week",
        }
    }

    /// Whether campaign spend/revenue is split across keys rather than
    /// summed from per-entry fields.
    pub fn allocates_money(&self) -> bool {
        matches!(self, Self::Gender | Self::AgeGroup)
    }
}

impl fmt::Display for DimensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DimensionKind {
    type Err = PulseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| PulseError::UnknownDimension(s.to_string()))
    }
}

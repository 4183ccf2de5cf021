use serde::Deserialize;

use crate::error::PulseResult;

/// Reporting configuration. Loaded from environment variables with the
/// prefix `CAMPAIGN_PULSE__`, e.g. `CAMPAIGN_PULSE__PARALLEL_DIMENSIONS=true`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportingConfig {
    /// Aggregate the five dimensions on scoped worker threads.
    #[serde(default = "default_parallel_dimensions")]
    pub parallel_dimensions: bool,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "default_currency_decimals")]
    pub currency_decimals: u32,
    #[serde(default = "default_percent_decimals")]
    pub percent_decimals: u32,
    /// strftime pattern used for week labels ("Oct 1").
    #[serde(default = "default_week_label_format")]
    pub week_label_format: String,
}

// Default functions
fn default_parallel_dimensions() -> bool {
    false
}
fn default_currency_symbol() -> String {
    "$".to_string()
}
fn default_currency_decimals() -> u32 {
    2
}
fn default_percent_decimals() -> u32 {
    2
}
fn default_week_label_format() -> String {
    "%b %-d".to_string()
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            parallel_dimensions: default_parallel_dimensions(),
            currency_symbol: default_currency_symbol(),
            currency_decimals: default_currency_decimals(),
            percent_decimals: default_percent_decimals(),
            week_label_format: default_week_label_format(),
        }
    }
}

impl ReportingConfig {
    /// Load configuration from the environment.
    pub fn load() -> PulseResult<Self> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("CAMPAIGN_PULSE")
                .separator("__")
                .try_parsing(true),
        );
        Self::from_builder(builder)
    }

    pub fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> PulseResult<Self> {
        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}

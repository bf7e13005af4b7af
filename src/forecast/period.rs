use serde::{Deserialize, Serialize};
use std::fmt;

/// A single named forecast window as returned by the NWS forecast endpoints,
/// e.g. "Today" or "Tonight". Scoped to one request; only the winning period
/// survives into a [`TodayForecast`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForecastPeriod {
    pub name: String,
    pub temperature: f64,
    pub temperature_unit: String,
    pub short_forecast: String,
}

/// Coarse temperature category for a Fahrenheit temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TempCategory {
    Hot,
    Moderate,
    Cold,
}

impl fmt::Display for TempCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TempCategory::Hot => "hot",
            TempCategory::Moderate => "moderate",
            TempCategory::Cold => "cold",
        })
    }
}

/// Today's forecast for one coordinate: the short text, the temperature
/// normalized to Fahrenheit, and its [`TempCategory`].
///
/// Constructed once per cache miss and then shared read-only with every
/// cache hit until the entry expires or is evicted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodayForecast {
    pub short_forecast: String,
    pub temperature_f: f64,
    pub category: TempCategory,
}

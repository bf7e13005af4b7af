use crate::forecast::period::ForecastPeriod;
use serde::Deserialize;

/// Top-level fields of a points lookup under the linked-data content type.
#[derive(Debug, Deserialize)]
pub(crate) struct PointsResponse {
    #[serde(default)]
    pub forecast: Option<String>,
    #[serde(rename = "forecastHourly", default)]
    pub forecast_hourly: Option<String>,
}

/// Forecast document with `periods` at the top level.
#[derive(Debug, Deserialize)]
pub(crate) struct ForecastBody {
    #[serde(default)]
    pub periods: Vec<ForecastPeriod>,
}

/// Forecast document nested under a `properties` envelope, the GeoJSON
/// shape some deployments answer with.
#[derive(Debug, Deserialize)]
pub(crate) struct ForecastEnvelope {
    pub properties: ForecastBody,
}

/// The forecast URLs a coordinate resolves to. At least one side is present;
/// a missing side simply never gets fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastEndpoints {
    pub daily: Option<String>,
    pub hourly: Option<String>,
}

use std::time::Duration;
use thiserror::Error;

/// The points lookup failed or yielded no usable forecast URLs.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("Points request failed for {0}")]
    Request(String, #[source] reqwest::Error),

    #[error("Points request for {url} returned status {status}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to read points response body from {0}")]
    BodyRead(String, #[source] reqwest::Error),

    #[error("Failed to decode points response from {0}")]
    Decode(String, #[source] serde_json::Error),

    #[error("Points response from {0} contained no forecast URLs")]
    MissingForecastUrls(String),
}

/// A single forecast fetch failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Forecast request failed for {0}")]
    Request(String, #[source] reqwest::Error),

    #[error("Forecast request for {url} returned status {status}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to read forecast response body from {0}")]
    BodyRead(String, #[source] reqwest::Error),

    #[error("No forecast periods in response from {0}")]
    EmptyPeriods(String),
}

/// Failure of the combined resolve-and-fetch operation.
///
/// A single failed forecast fetch is tolerated and never surfaces here; it
/// only appears as one of the causes inside [`UpstreamError::BothFetchesFailed`].
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("Daily and hourly forecast fetches both failed (daily: {daily:?}, hourly: {hourly:?})")]
    BothFetchesFailed {
        /// Cause of the daily-side failure; `None` when resolution produced
        /// no daily URL so that side never ran.
        daily: Option<FetchError>,
        /// Cause of the hourly-side failure, `None` likewise.
        hourly: Option<FetchError>,
    },

    #[error("No forecast periods available")]
    NoPeriodsAvailable,

    #[error("Upstream operation exceeded its {0:?} deadline")]
    Timeout(Duration),
}

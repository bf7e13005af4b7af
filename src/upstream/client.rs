//! HTTP client for the National Weather Service forecast API.
//!
//! A coordinate is resolved through the `points` endpoint into up to two
//! forecast URLs (daily and hourly), both of which are then fetched
//! concurrently. One side failing is tolerated as long as the other yields
//! periods; the whole operation runs under a single deadline.

use crate::forecast::period::ForecastPeriod;
use crate::forecast::select::choose_today;
use crate::forecast::units::normalize_to_fahrenheit;
use crate::gridcast::LatLon;
use crate::observability::UpstreamMetrics;
use crate::upstream::error::{FetchError, ResolutionError, UpstreamError};
use crate::upstream::models::{ForecastBody, ForecastEndpoints, ForecastEnvelope, PointsResponse};
use futures_util::future::OptionFuture;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout, Instant};

pub(crate) const DEFAULT_BASE_URL: &str = "https://api.weather.gov";
// NWS policy asks for a descriptive, contact-bearing user agent.
pub(crate) const DEFAULT_USER_AGENT: &str = "gridcast/0.1 (contact: maintainers@gridcast.dev)";
pub(crate) const DEFAULT_DEADLINE: Duration = Duration::from_secs(10);

// Caps on the response-body snippets carried inside error values.
const POINTS_SNIPPET_LEN: usize = 2048;
const FORECAST_SNIPPET_LEN: usize = 4096;

/// Client for `api.weather.gov` with connection pooling, the mandatory
/// identifying headers, and an overall per-operation deadline.
pub struct NwsClient {
    http: Client,
    base_url: String,
    deadline: Duration,
    metrics: Arc<dyn UpstreamMetrics>,
}

impl NwsClient {
    pub fn new(
        user_agent: &str,
        base_url: &str,
        deadline: Duration,
        metrics: Arc<dyn UpstreamMetrics>,
    ) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        // The linked-data shape puts forecast URLs and periods at the top
        // level; the GeoJSON envelope is still handled as a parse fallback.
        headers.insert(ACCEPT, HeaderValue::from_static("application/ld+json"));
        let http = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .pool_max_idle_per_host(4)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            deadline,
            metrics,
        })
    }

    /// Resolves a coordinate to its daily and hourly forecast endpoints.
    pub async fn resolve_endpoints(
        &self,
        location: LatLon,
    ) -> Result<ForecastEndpoints, ResolutionError> {
        let url = format!(
            "{}/points/{:.6},{:.6}",
            self.base_url, location.0, location.1
        );
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ResolutionError::Request(url.clone(), e))?;

        let status = response.status();
        if !status.is_success() {
            let body = snippet(response, POINTS_SNIPPET_LEN).await;
            warn!("Points lookup for {} returned status {}", url, status);
            return Err(ResolutionError::Status { url, status, body });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ResolutionError::BodyRead(url.clone(), e))?;
        let points: PointsResponse =
            serde_json::from_str(&body).map_err(|e| ResolutionError::Decode(url.clone(), e))?;

        let endpoints = ForecastEndpoints {
            daily: non_empty(points.forecast),
            hourly: non_empty(points.forecast_hourly),
        };
        if endpoints.daily.is_none() && endpoints.hourly.is_none() {
            return Err(ResolutionError::MissingForecastUrls(url));
        }
        debug!(
            "Resolved {} to daily={:?} hourly={:?}",
            url, endpoints.daily, endpoints.hourly
        );
        Ok(endpoints)
    }

    /// Fetches one forecast document and decodes it into its period list.
    ///
    /// The body is decoded first as the flat shape with top-level `periods`,
    /// then as the `properties`-wrapped envelope. Only when neither yields a
    /// period does the fetch fail.
    pub async fn fetch_periods(&self, url: &str) -> Result<Vec<ForecastPeriod>, FetchError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request(url.to_string(), e))?;

        let status = response.status();
        if !status.is_success() {
            let body = snippet(response, FORECAST_SNIPPET_LEN).await;
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::BodyRead(url.to_string(), e))?;

        if let Ok(flat) = serde_json::from_str::<ForecastBody>(&body) {
            if !flat.periods.is_empty() {
                return Ok(flat.periods);
            }
        }
        if let Ok(wrapped) = serde_json::from_str::<ForecastEnvelope>(&body) {
            if !wrapped.properties.periods.is_empty() {
                return Ok(wrapped.properties.periods);
            }
        }
        Err(FetchError::EmptyPeriods(url.to_string()))
    }

    /// Returns today's short forecast and its temperature in Fahrenheit for
    /// a coordinate.
    ///
    /// The daily and hourly documents are fetched concurrently and one side
    /// failing is tolerated; daily periods win when both are usable. The
    /// whole operation, resolution included, runs under the client deadline,
    /// and hitting it cancels whatever is still in flight.
    pub async fn get_today(&self, location: LatLon) -> Result<(String, f64), UpstreamError> {
        self.metrics.incr_requests();
        let started = Instant::now();
        let result = match timeout(self.deadline, self.today_from_periods(location)).await {
            Ok(result) => result,
            Err(_) => Err(UpstreamError::Timeout(self.deadline)),
        };
        self.metrics.observe_request_duration(started.elapsed());
        result
    }

    async fn today_from_periods(&self, location: LatLon) -> Result<(String, f64), UpstreamError> {
        let endpoints = self.resolve_endpoints(location).await?;

        let daily_fetch: OptionFuture<_> = endpoints
            .daily
            .as_deref()
            .map(|url| self.fetch_periods(url))
            .into();
        let hourly_fetch: OptionFuture<_> = endpoints
            .hourly
            .as_deref()
            .map(|url| self.fetch_periods(url))
            .into();
        let (daily, hourly) = tokio::join!(daily_fetch, hourly_fetch);

        let (daily_periods, daily_err) = split_outcome(daily);
        let (hourly_periods, hourly_err) = split_outcome(hourly);
        if let Some(err) = &daily_err {
            warn!("Daily forecast fetch failed: {}", err);
        }
        if let Some(err) = &hourly_err {
            warn!("Hourly forecast fetch failed: {}", err);
        }

        if daily_periods.is_empty() && hourly_periods.is_empty() {
            return Err(UpstreamError::BothFetchesFailed {
                daily: daily_err,
                hourly: hourly_err,
            });
        }

        for periods in [&daily_periods, &hourly_periods] {
            if let Some(period) = choose_today(periods) {
                let temperature_f =
                    normalize_to_fahrenheit(period.temperature, &period.temperature_unit);
                return Ok((period.short_forecast.clone(), temperature_f));
            }
        }

        // Reached only if every fetched period list is empty, which a
        // successful fetch rules out.
        Err(UpstreamError::NoPeriodsAvailable)
    }
}

fn non_empty(url: Option<String>) -> Option<String> {
    url.filter(|u| !u.is_empty())
}

fn split_outcome(
    outcome: Option<Result<Vec<ForecastPeriod>, FetchError>>,
) -> (Vec<ForecastPeriod>, Option<FetchError>) {
    match outcome {
        Some(Ok(periods)) => (periods, None),
        Some(Err(err)) => (Vec::new(), Some(err)),
        None => (Vec::new(), None),
    }
}

async fn snippet(response: reqwest::Response, limit: usize) -> String {
    let body = response.text().await.unwrap_or_default();
    body.chars().take(limit).collect()
}

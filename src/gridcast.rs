//! This module provides the main entry point for the gridcast client. It
//! answers "what is today's weather like here?" for a latitude/longitude by
//! resolving the coordinate to its National Weather Service forecast grid,
//! selecting today's forecast period, and serving repeated lookups for the
//! same spot from an in-memory TTL cache.

use crate::cache::ttl::{CacheConfig, TtlCache};
use crate::error::GridcastError;
use crate::forecast::period::TodayForecast;
use crate::forecast::units::categorize;
use crate::observability::{NoopUpstreamMetrics, UpstreamMetrics};
use crate::upstream::client::{NwsClient, DEFAULT_BASE_URL, DEFAULT_DEADLINE, DEFAULT_USER_AGENT};
use bon::bon;
use log::debug;
use std::sync::Arc;
use std::time::Duration;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second
/// (index 1). Both values are represented as `f64`.
///
/// # Examples
///
/// ```
/// use gridcast::LatLon;
///
/// let philadelphia = LatLon(40.0, -75.0);
/// assert_eq!(philadelphia.0, 40.0); // Latitude
/// assert_eq!(philadelphia.1, -75.0); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// The main client struct for fetching today's forecast.
///
/// This struct resolves coordinates against the NWS API, tolerates one of
/// the two forecast documents (daily, hourly) failing, and caches each
/// result by rounded coordinate so repeated queries for the same spot skip
/// the upstream round trips entirely.
///
/// Create an instance through [`Gridcast::builder()`]; every knob is
/// optional. Construction must happen inside a Tokio runtime because the
/// cache spawns its background sweeper at that point.
///
/// # Examples
///
/// ```rust
/// # use gridcast::{Gridcast, GridcastError, LatLon};
/// # async fn run() -> Result<(), GridcastError> {
/// let client = Gridcast::builder().build()?;
/// let forecast = client.get_today_forecast(LatLon(40.0, -75.0)).await?;
/// println!(
///     "{} ({:.0} F, {})",
///     forecast.short_forecast, forecast.temperature_f, forecast.category
/// );
/// # Ok(())
/// # }
/// ```
pub struct Gridcast {
    upstream: NwsClient,
    cache: TtlCache<TodayForecast>,
}

#[bon]
impl Gridcast {
    /// Creates a new `Gridcast` client instance.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.user_agent(String)`: Optional. Identifying, contact-bearing
    ///   User-Agent sent with every upstream call, per NWS API policy.
    /// * `.base_url(String)`: Optional. Upstream API root; defaults to
    ///   `https://api.weather.gov`.
    /// * `.request_timeout(Duration)`: Optional. Deadline over one whole
    ///   resolve-and-fetch operation. Defaults to 10 seconds.
    /// * `.cache(CacheConfig)`: Optional. TTL, sweep interval and capacity
    ///   of the forecast cache; see [`CacheConfig::default`].
    /// * `.metrics(Arc<dyn UpstreamMetrics>)`: Optional. Injected metrics
    ///   sink for upstream request counters and timings; defaults to a
    ///   no-op sink.
    ///
    /// # Errors
    ///
    /// Returns [`GridcastError::HttpClientBuild`] if the underlying HTTP
    /// client cannot be constructed (e.g. a malformed user agent).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use gridcast::{CacheConfig, Gridcast, GridcastError};
    /// # use std::time::Duration;
    /// # async fn run() -> Result<(), GridcastError> {
    /// let client = Gridcast::builder()
    ///     .user_agent("my-app/1.0 (contact: ops@example.com)".to_string())
    ///     .cache(CacheConfig {
    ///         ttl: Some(Duration::from_secs(120)),
    ///         ..CacheConfig::default()
    ///     })
    ///     .build()?;
    /// # let _ = client;
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub fn new(
        user_agent: Option<String>,
        base_url: Option<String>,
        request_timeout: Option<Duration>,
        cache: Option<CacheConfig>,
        metrics: Option<Arc<dyn UpstreamMetrics>>,
    ) -> Result<Self, GridcastError> {
        let upstream = NwsClient::new(
            user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT),
            base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
            request_timeout.unwrap_or(DEFAULT_DEADLINE),
            metrics.unwrap_or_else(|| Arc::new(NoopUpstreamMetrics)),
        )
        .map_err(GridcastError::HttpClientBuild)?;
        Ok(Self {
            upstream,
            cache: TtlCache::new(cache.unwrap_or_default()),
        })
    }

    /// Returns today's forecast for a coordinate, serving repeats from the
    /// cache.
    ///
    /// On a cache miss the upstream pipeline runs once and its result is
    /// stored under the rounded-coordinate key before being returned; a hit
    /// returns the stored value untouched, with no upstream traffic. Failed
    /// lookups are never cached, so the next call for the same coordinate
    /// retries upstream. Concurrent misses for one key may each go upstream;
    /// the calls are idempotent reads and last-write-wins is harmless.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::UpstreamError`] verbatim inside
    /// [`GridcastError::Upstream`]: resolution failures, both forecast
    /// fetches failing, an empty period set, or the operation deadline
    /// elapsing. No retries happen at this layer.
    pub async fn get_today_forecast(
        &self,
        location: LatLon,
    ) -> Result<TodayForecast, GridcastError> {
        let key = cache_key(location);
        if let Some(cached) = self.cache.get(&key).await {
            debug!("Cache hit for {}", key);
            return Ok(cached);
        }
        debug!("Cache miss for {}, querying upstream", key);

        let (short_forecast, temperature_f) = self.upstream.get_today(location).await?;
        let forecast = TodayForecast {
            category: categorize(temperature_f),
            short_forecast,
            temperature_f,
        };
        self.cache.set(key, forecast.clone()).await;
        Ok(forecast)
    }
}

/// Derives the cache key for a coordinate.
///
/// Both components are rounded to three decimals before formatting, so
/// near-identical coordinates collapse onto the same entry.
fn cache_key(location: LatLon) -> String {
    let round = |x: f64| (x * 1000.0).round() / 1000.0;
    format!("lat={:.3}:lon={:.3}", round(location.0), round(location.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::period::TempCategory;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn cache_key_rounds_to_three_decimals() {
        assert_eq!(cache_key(LatLon(40.0, -75.0)), "lat=40.000:lon=-75.000");
        assert_eq!(cache_key(LatLon(1.23456, 7.89012)), "lat=1.235:lon=7.890");
        assert_eq!(
            cache_key(LatLon(40.0004, -75.0004)),
            cache_key(LatLon(40.0, -75.0))
        );
    }

    fn test_cache_config() -> CacheConfig {
        CacheConfig {
            ttl: Some(Duration::from_secs(60)),
            sweep_interval: Duration::from_secs(3600),
            max_entries: Some(100),
        }
    }

    fn client_for(server: &MockServer) -> Gridcast {
        Gridcast::builder()
            .base_url(server.uri())
            .cache(test_cache_config())
            .build()
            .unwrap()
    }

    async fn mount_points_for(server: &MockServer, points_path: &str) {
        Mock::given(method("GET"))
            .and(path(points_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "forecast": format!("{}/forecast/daily", server.uri()),
                "forecastHourly": format!("{}/forecast/hourly", server.uri()),
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn celsius_daily_wins_over_failed_hourly() {
        let server = MockServer::start().await;
        mount_points_for(&server, "/points/40.000000,-75.000000").await;
        Mock::given(method("GET"))
            .and(path("/forecast/daily"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "periods": [{
                    "name": "Today",
                    "temperature": 30,
                    "temperatureUnit": "C",
                    "shortForecast": "Hazy Sun",
                }],
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast/hourly"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let forecast = client_for(&server)
            .get_today_forecast(LatLon(40.0, -75.0))
            .await
            .unwrap();
        assert_eq!(forecast.temperature_f, 86.0);
        assert_eq!(forecast.category, TempCategory::Hot);
        assert_eq!(forecast.short_forecast, "Hazy Sun");
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/points/40.000000,-75.000000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "forecast": format!("{}/forecast/daily", server.uri()),
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast/daily"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "periods": [{
                    "name": "Tonight",
                    "temperature": 54,
                    "temperatureUnit": "F",
                    "shortForecast": "Clear",
                }],
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let first = client.get_today_forecast(LatLon(40.0, -75.0)).await.unwrap();
        let second = client.get_today_forecast(LatLon(40.0, -75.0)).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(second.category, TempCategory::Cold);
    }

    #[tokio::test]
    async fn near_identical_coordinates_share_one_entry() {
        let server = MockServer::start().await;
        mount_points_for(&server, "/points/40.000100,-75.000100").await;
        Mock::given(method("GET"))
            .and(path("/forecast/daily"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "periods": [{
                    "name": "Today",
                    "temperature": 70,
                    "temperatureUnit": "F",
                    "shortForecast": "Breezy",
                }],
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast/hourly"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let first = client
            .get_today_forecast(LatLon(40.0001, -75.0001))
            .await
            .unwrap();
        // Rounds to the same key, so no second points lookup happens.
        let second = client
            .get_today_forecast(LatLon(40.00012, -75.00008))
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/points/40.000000,-75.000000"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client
            .get_today_forecast(LatLon(40.0, -75.0))
            .await
            .unwrap_err();
        // The second call reaches upstream again instead of replaying an
        // error from the cache; the expect(2) above verifies it.
        client
            .get_today_forecast(LatLon(40.0, -75.0))
            .await
            .unwrap_err();
    }
}

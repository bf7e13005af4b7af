mod cache;
mod error;
mod forecast;
mod gridcast;
mod observability;
mod upstream;

pub use error::GridcastError;
pub use gridcast::*;

pub use cache::ttl::{CacheConfig, TtlCache};

pub use forecast::period::{ForecastPeriod, TempCategory, TodayForecast};
pub use forecast::select::choose_today;
pub use forecast::units::{categorize, normalize_to_fahrenheit};

pub use observability::{NoopUpstreamMetrics, UpstreamMetrics};

pub use upstream::client::NwsClient;
pub use upstream::error::{FetchError, ResolutionError, UpstreamError};
pub use upstream::models::ForecastEndpoints;

use crate::upstream::error::UpstreamError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridcastError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("Failed to build the upstream HTTP client")]
    HttpClientBuild(#[source] reqwest::Error),
}

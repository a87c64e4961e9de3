//! Error types used by the crate.

use thiserror::Error;

/// PulseMap error type.
///
/// None of these errors is fatal for the dashboard: remote failures are recovered by the
/// [`DataSourceResolver`](crate::source::DataSourceResolver), which degrades to the bundled
/// static dataset.
#[derive(Debug, Error)]
pub enum PulseError {
    /// Network, authentication or query failure while talking to the remote store.
    #[error("remote data source is unavailable: {0}")]
    RemoteUnavailable(String),
    /// Remote store did not answer in time.
    #[error("remote data source did not respond in {0:?}")]
    Timeout(std::time::Duration),
    /// Data could not be decoded.
    #[error("failed to decode data: {0}")]
    Decoding(#[from] serde_json::Error),
    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for PulseError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            return Self::RemoteUnavailable(format!("undecodable response: {value}"));
        }

        Self::RemoteUnavailable(value.to_string())
    }
}

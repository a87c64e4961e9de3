use std::future::Future;
use std::time::Duration;

use pulsemap_types::{FeatureCollection, FeedItem};

use super::{OutbreakSource, StaticSource};
use crate::error::PulseError;
use crate::projection::{project_features, project_feed, OutbreakIndex};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the displayed feature collection comes from.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSourceStatus {
    /// Data has not been resolved yet.
    #[default]
    Loading,
    /// Features come from the remote store.
    Live,
    /// Remote store failed or returned no features, the bundled dataset is shown.
    Static,
}

impl DataSourceStatus {
    /// Text of the status indicator.
    pub fn label(&self) -> &'static str {
        match self {
            DataSourceStatus::Loading => "Loading...",
            DataSourceStatus::Live => "Live Data",
            DataSourceStatus::Static => "Static Data",
        }
    }
}

/// Where the displayed feed comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedOrigin {
    /// Feed was loaded from the remote store (it may be empty).
    Live,
    /// Feed could not be loaded, the bundled feed is shown.
    Static,
}

/// Data produced by [`DataSourceResolver::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedData {
    /// Feature collection to display.
    pub features: FeatureCollection,
    /// Feed items to display, newest first.
    pub feed: Vec<FeedItem>,
    /// Origin of the features.
    pub status: DataSourceStatus,
    /// Origin of the feed.
    pub feed_origin: FeedOrigin,
}

/// Configuration of a [`DataSourceResolver`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ResolverConfig {
    /// Time after which a remote request is treated as failed.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sets time after which a remote request is treated as failed.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets time after which a remote request is treated as failed.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }
}

/// Chooses between remote data and the static fallback.
///
/// The feature collection and the feed are independent failure domains: a failed feed request
/// does not degrade the features and vice versa. Only the feature collection decides the
/// [`DataSourceStatus`].
pub struct DataSourceResolver<S> {
    source: S,
    fallback: StaticSource,
    config: ResolverConfig,
}

impl<S: OutbreakSource> DataSourceResolver<S> {
    /// Creates a new resolver.
    pub fn new(source: S, fallback: StaticSource, config: ResolverConfig) -> Self {
        Self {
            source,
            fallback,
            config,
        }
    }

    /// Creates a resolver falling back to the dataset bundled with the crate.
    pub fn with_bundled_fallback(source: S) -> Result<Self, PulseError> {
        Ok(Self::new(
            source,
            StaticSource::bundled()?,
            ResolverConfig::default(),
        ))
    }

    /// Configuration of the resolver.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Remote source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Static fallback.
    pub fn fallback(&self) -> &StaticSource {
        &self.fallback
    }

    /// Loads features and feed concurrently. Never fails: remote errors are logged and replaced
    /// by the static data.
    pub async fn resolve(&self) -> ResolvedData {
        let (features, feed) = tokio::join!(self.remote_features(), self.remote_feed());

        let (features, status) = match features {
            Ok(features) if !features.is_empty() => {
                log::info!("Loaded {} outbreak features", features.len());
                (features, DataSourceStatus::Live)
            }
            Ok(_) => {
                log::warn!("Remote store returned no features, using static data");
                (self.fallback.features().clone(), DataSourceStatus::Static)
            }
            Err(err) => {
                log::warn!("Failed to load outbreak features, using static data: {err}");
                (self.fallback.features().clone(), DataSourceStatus::Static)
            }
        };

        let (feed, feed_origin) = match feed {
            Ok(feed) => {
                log::info!("Loaded {} feed items", feed.len());
                (feed, FeedOrigin::Live)
            }
            Err(err) => {
                log::warn!("Failed to load feed, using static data: {err}");
                (self.fallback.feed().to_vec(), FeedOrigin::Static)
            }
        };

        ResolvedData {
            features,
            feed,
            status,
            feed_origin,
        }
    }

    async fn remote_features(&self) -> Result<FeatureCollection, PulseError> {
        let rows = self.bounded(self.source.load_feature_rows()).await?;
        Ok(project_features(
            &rows.locations,
            &OutbreakIndex::new(&rows.outbreaks),
        ))
    }

    async fn remote_feed(&self) -> Result<Vec<FeedItem>, PulseError> {
        let rows = self.bounded(self.source.load_feed_rows()).await?;
        Ok(project_feed(
            &rows.reports,
            &OutbreakIndex::new(&rows.outbreaks),
            &rows.locations,
        ))
    }

    async fn bounded<T>(
        &self,
        future: impl Future<Output = Result<T, PulseError>>,
    ) -> Result<T, PulseError> {
        tokio::time::timeout(self.config.timeout, future)
            .await
            .map_err(|_| PulseError::Timeout(self.config.timeout))?
    }
}

//! Outbreak data sources.
//!
//! The remote store is accessed through the [`OutbreakSource`] trait, which returns flat rows.
//! The rows are projected into features and feed items by [`projection`](crate::projection)
//! and [`DataSourceResolver`] decides between the remote data and the bundled
//! [`static dataset`](StaticSource).

use pulsemap_types::{Outbreak, OutbreakLocation, Report};

use crate::error::PulseError;

mod fallback;
mod resolver;
mod rest;

pub use fallback::StaticSource;
pub use resolver::{DataSourceResolver, DataSourceStatus, FeedOrigin, ResolvedData, ResolverConfig};
pub use rest::{RemoteSourceConfig, RestSource};

/// Rows needed to build the feature collection: all locations and their parent outbreaks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRows {
    /// Location rows.
    pub locations: Vec<OutbreakLocation>,
    /// Parent outbreak rows.
    pub outbreaks: Vec<Outbreak>,
}

/// Rows needed to build the feed: most recent reports with their parent outbreaks and the
/// locations of those outbreaks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedRows {
    /// Report rows.
    pub reports: Vec<Report>,
    /// Parent outbreak rows.
    pub outbreaks: Vec<Outbreak>,
    /// Locations of the parent outbreaks, in store order.
    pub locations: Vec<OutbreakLocation>,
}

/// Source of outbreak rows.
#[async_trait::async_trait]
pub trait OutbreakSource {
    /// Loads locations with their parent outbreaks.
    async fn load_feature_rows(&self) -> Result<FeatureRows, PulseError>;
    /// Loads the most recent reports with their parent outbreaks and their locations.
    async fn load_feed_rows(&self) -> Result<FeedRows, PulseError>;
}

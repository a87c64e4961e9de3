use pulsemap_types::{FeatureCollection, FeedItem};

use crate::error::PulseError;
use crate::projection::sort_feed;

const BUNDLED_FEATURES: &str = include_str!("../../data/outbreaks.geojson");
const BUNDLED_FEED: &str = include_str!("../../data/feed.json");

/// Fixed dataset used when the remote store is unreachable or empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticSource {
    features: FeatureCollection,
    feed: Vec<FeedItem>,
}

impl StaticSource {
    /// Creates a static source from already projected data.
    pub fn new(features: FeatureCollection, mut feed: Vec<FeedItem>) -> Self {
        sort_feed(&mut feed);
        Self { features, feed }
    }

    /// Dataset compiled into the crate.
    pub fn bundled() -> Result<Self, PulseError> {
        Self::from_json(BUNDLED_FEATURES, BUNDLED_FEED)
    }

    /// Parses a GeoJSON feature collection and a JSON array of feed items.
    pub fn from_json(features: &str, feed: &str) -> Result<Self, PulseError> {
        let features: FeatureCollection = serde_json::from_str(features)?;
        let feed: Vec<FeedItem> = serde_json::from_str(feed)?;
        log::trace!(
            "Parsed static dataset: {} features, {} feed items",
            features.len(),
            feed.len()
        );

        Ok(Self::new(features, feed))
    }

    /// Static feature collection.
    pub fn features(&self) -> &FeatureCollection {
        &self.features
    }

    /// Static feed, newest first.
    pub fn feed(&self) -> &[FeedItem] {
        &self.feed
    }
}

//! GeoJSON shaped point features derived from outbreak locations.
//!
//! A [`FeatureCollection`] serializes into a standard GeoJSON document, so it can be handed to
//! any rendering surface that consumes GeoJSON sources:
//!
//! ```json
//! {"type": "FeatureCollection", "features": [
//!   {"type": "Feature", "geometry": {"type": "Point", "coordinates": [lon, lat]}, "properties": {...}}
//! ]}
//! ```

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::outbreak::{lenient_severity, OutbreakStatus, Severity};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum FeatureCollectionTag {
    #[default]
    FeatureCollection,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum FeatureTag {
    #[default]
    Feature,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum PointTag {
    #[default]
    Point,
}

/// GeoJSON point geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointGeometry {
    #[serde(rename = "type", default)]
    tag: PointTag,
    /// Position of the point.
    pub coordinates: GeoPoint,
}

impl PointGeometry {
    /// Creates a new point geometry.
    pub fn new(coordinates: GeoPoint) -> Self {
        Self {
            tag: PointTag::Point,
            coordinates,
        }
    }
}

/// Display fields of a feature: the merge of location-level and outbreak-level fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    /// Id of the source location row.
    pub id: String,
    /// Id of the parent outbreak.
    pub outbreak_id: String,
    /// Name of the disease.
    pub disease_name: String,
    /// Severity tier of the outbreak, `None` if unknown.
    #[serde(default, deserialize_with = "lenient_severity")]
    pub severity: Option<Severity>,
    /// Severity score of the location.
    pub severity_score: f64,
    /// Case count at the location.
    pub case_count: u64,
    /// Country of the location.
    pub country: String,
    /// Region of the location.
    #[serde(default)]
    pub region: Option<String>,
    /// Status of the outbreak.
    pub status: OutbreakStatus,
    /// Outbreak summary.
    #[serde(default)]
    pub summary: Option<String>,
}

/// One outbreak location joined with its parent outbreak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutbreakFeature {
    #[serde(rename = "type", default)]
    tag: FeatureTag,
    /// Point geometry of the feature.
    pub geometry: PointGeometry,
    /// Display properties.
    pub properties: FeatureProperties,
}

impl OutbreakFeature {
    /// Creates a new feature at the given position.
    pub fn new(position: GeoPoint, properties: FeatureProperties) -> Self {
        Self {
            tag: FeatureTag::Feature,
            geometry: PointGeometry::new(position),
            properties,
        }
    }

    /// Position of the feature.
    pub fn position(&self) -> GeoPoint {
        self.geometry.coordinates
    }

    /// Id of the parent outbreak.
    pub fn outbreak_id(&self) -> &str {
        &self.properties.outbreak_id
    }
}

/// Ordered set of outbreak features.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default)]
    tag: FeatureCollectionTag,
    /// Features of the collection.
    pub features: Vec<OutbreakFeature>,
}

impl FeatureCollection {
    /// Creates a new collection.
    pub fn new(features: Vec<OutbreakFeature>) -> Self {
        Self {
            tag: FeatureCollectionTag::FeatureCollection,
            features,
        }
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True if the collection has no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterates over the features in their order.
    pub fn iter(&self) -> impl Iterator<Item = &OutbreakFeature> + '_ {
        self.features.iter()
    }

    /// Returns the first feature (in collection order) belonging to the given outbreak.
    pub fn find_by_outbreak(&self, outbreak_id: &str) -> Option<&OutbreakFeature> {
        self.features.iter().find(|f| f.outbreak_id() == outbreak_id)
    }

    /// Returns the feature created from the location with the given id.
    pub fn get(&self, feature_id: &str) -> Option<&OutbreakFeature> {
        self.features.iter().find(|f| f.properties.id == feature_id)
    }
}

impl From<Vec<OutbreakFeature>> for FeatureCollection {
    fn from(value: Vec<OutbreakFeature>) -> Self {
        Self::new(value)
    }
}

impl FromIterator<OutbreakFeature> for FeatureCollection {
    fn from_iter<T: IntoIterator<Item = OutbreakFeature>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

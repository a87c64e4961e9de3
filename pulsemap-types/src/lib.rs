//! Data model of the PulseMap outbreak dashboard.
//!
//! The crate contains two groups of types:
//!
//! * rows as they are stored in the remote relational store ([`Outbreak`], [`OutbreakLocation`]
//!   and [`Report`]), and
//! * read-only shapes derived from those rows that the rest of the system works with:
//!   [`OutbreakFeature`] (GeoJSON point feature), [`FeatureCollection`] and [`FeedItem`].
//!
//! Geographic positions are represented by [`GeoPoint`], which serializes as a GeoJSON position
//! (`[longitude, latitude]`).

pub mod error;
pub mod feature;
mod feed;
pub mod geo;
mod outbreak;
mod report;

pub use feature::{FeatureCollection, FeatureProperties, OutbreakFeature, PointGeometry};
pub use feed::{FeedItem, UNKNOWN_LOCATION};
pub use geo::GeoPoint;
pub use outbreak::{lenient_severity, Outbreak, OutbreakLocation, OutbreakStatus, Severity};
pub use report::{Report, SourceType};

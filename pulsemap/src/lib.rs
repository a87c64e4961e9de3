//! PulseMap is the core of a disease outbreak dashboard. It loads outbreak data from a remote
//! relational store, projects it into map features and a news feed, and keeps the state of the
//! interactive map (layers, selection, camera) consistent with it.
//!
//! # Quick start
//!
//! ```no_run
//! use pulsemap::source::{DataSourceResolver, RemoteSourceConfig, RestSource};
//! use pulsemap::Dashboard;
//!
//! # tokio_test::block_on(async {
//! let source = RestSource::new(RemoteSourceConfig::new("https://example.supabase.co", "anon-key"))?;
//! let resolver = DataSourceResolver::with_bundled_fallback(source)?;
//!
//! let mut dashboard = Dashboard::default();
//! dashboard.load(&resolver).await;
//! println!("{}: {} outbreak locations", dashboard.status().label(), dashboard.features().len());
//! # Ok::<(), pulsemap::error::PulseError>(())
//! # });
//! ```
//!
//! # Main components
//!
//! * [`source`] loads flat rows from the store through the [`OutbreakSource`](source::OutbreakSource)
//!   trait. [`DataSourceResolver`](source::DataSourceResolver) never fails: if the store is
//!   unreachable, slow or empty, the bundled static dataset is used instead.
//! * [`projection`] joins the rows into a GeoJSON [`FeatureCollection`](pulsemap_types::FeatureCollection)
//!   and a list of [`FeedItem`](pulsemap_types::FeedItem)s.
//! * [`layer`], [`selection`], [`camera`] and [`search`] hold the user-facing state, and
//!   [`view_state`] derives what should be drawn from it and pushes it into a
//!   [`MapSurface`](view_state::MapSurface) implemented by the rendering code.
//! * [`Dashboard`] ties all of the above together.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod camera;
mod color;
mod dashboard;
pub mod error;
pub mod layer;
mod messenger;
pub mod projection;
pub mod search;
pub mod selection;
pub mod source;
pub mod view_state;

pub use color::{Color, SeverityPalette};
pub use dashboard::Dashboard;
pub use messenger::{DummyMessenger, Messenger};

// Reexport pulsemap_types
pub use pulsemap_types;

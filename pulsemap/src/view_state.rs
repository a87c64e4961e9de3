//! Derivation of renderable map state and its synchronization with a rendering surface.

use pulsemap_types::{FeatureCollection, GeoPoint, OutbreakFeature, Severity};

use crate::camera::{FlyTo, TransitionToken};
use crate::color::{Color, SeverityPalette};
use crate::layer::{LayerVisibility, MapLayer};

const MIN_MARKER_SIZE: f64 = 16.0;
const MAX_MARKER_SIZE: f64 = 48.0;

/// Size of a hotspot marker in pixels for the given case count, on a log scale clamped to
/// `[16, 48]`.
pub fn marker_size(case_count: u64) -> f64 {
    let size = 10.0 + 8.0 * (case_count as f64 + 1.0).log10();
    size.clamp(MIN_MARKER_SIZE, MAX_MARKER_SIZE)
}

/// Point overlay rendered for one feature while the hotspot layer is on.
#[derive(Debug, Clone, PartialEq)]
pub struct HotspotMarker {
    /// Id of the feature the marker represents.
    pub feature_id: String,
    /// Id of the parent outbreak.
    pub outbreak_id: String,
    /// Position of the marker.
    pub position: GeoPoint,
    /// Diameter in pixels.
    pub size: f64,
    /// Fill and ring color.
    pub color: Color,
    /// Severity the color was chosen for.
    pub severity: Option<Severity>,
    /// Hover tooltip: disease name and country.
    pub tooltip: MarkerTooltip,
}

/// Hover tooltip of a marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerTooltip {
    /// Disease name.
    pub title: String,
    /// Country of the location.
    pub subtitle: String,
}

/// Weighted point of the heat layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPoint {
    /// Position.
    pub position: GeoPoint,
    /// Weight in `[0, 1]`, taken from the severity score.
    pub weight: f64,
}

/// Paint parameters of the heat layer.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapStyle {
    /// Opacity of the whole layer.
    pub opacity: f64,
    intensity_stops: Vec<(f64, f64)>,
    radius_stops: Vec<(f64, f64)>,
    color_ramp: Vec<(f64, Color)>,
}

impl Default for HeatmapStyle {
    fn default() -> Self {
        let low = Color::from_hex("#22c55e");
        let moderate = Color::from_hex("#eab308");
        let severe = Color::from_hex("#ef4444");
        let critical = Color::from_hex("#dc2626");

        Self {
            opacity: 0.6,
            intensity_stops: vec![(0.0, 1.0), (9.0, 3.0)],
            radius_stops: vec![(0.0, 30.0), (4.0, 50.0), (9.0, 80.0)],
            color_ramp: vec![
                (0.0, Color::TRANSPARENT),
                (0.1, low.with_opacity(0.3)),
                (0.3, low.with_opacity(0.6)),
                (0.5, moderate.with_opacity(0.7)),
                (0.7, severe.with_opacity(0.8)),
                (1.0, critical.with_opacity(0.9)),
            ],
        }
    }
}

impl HeatmapStyle {
    /// Intensity multiplier at the given zoom level.
    pub fn intensity(&self, zoom: f64) -> f64 {
        interpolate_stops(&self.intensity_stops, zoom)
    }

    /// Radius of a heat point in pixels at the given zoom level.
    pub fn radius(&self, zoom: f64) -> f64 {
        interpolate_stops(&self.radius_stops, zoom)
    }

    /// Color for the given heat density in `[0, 1]`, linearly blended between the two
    /// enclosing stops of the ramp.
    pub fn color(&self, density: f64) -> Color {
        let Some(&(first_stop, first_color)) = self.color_ramp.first() else {
            return Color::TRANSPARENT;
        };
        if density.is_nan() || density <= first_stop {
            return first_color;
        }

        for pair in self.color_ramp.windows(2) {
            let (x0, c0) = pair[0];
            let (x1, c1) = pair[1];
            if density <= x1 {
                return c0.interpolate(&c1, (density - x0) / (x1 - x0));
            }
        }

        self.color_ramp
            .last()
            .map(|&(_, color)| color)
            .unwrap_or(first_color)
    }

    /// Stops of the color ramp.
    pub fn color_ramp(&self) -> &[(f64, Color)] {
        &self.color_ramp
    }
}

fn interpolate_stops(stops: &[(f64, f64)], x: f64) -> f64 {
    let Some(&(first_x, first_y)) = stops.first() else {
        return 0.0;
    };
    if x <= first_x {
        return first_y;
    }

    for pair in stops.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if x <= x1 {
            return y0 + (y1 - y0) * (x - x0) / (x1 - x0);
        }
    }

    stops.last().map(|&(_, y)| y).unwrap_or(first_y)
}

/// Rendering surface the view state is pushed into.
pub trait MapSurface {
    /// Replaces the data of the outbreak source.
    fn set_source_data(&mut self, data: &FeatureCollection);
    /// Replaces all marker overlays.
    fn set_markers(&mut self, markers: &[HotspotMarker]);
    /// Removes all marker overlays.
    fn clear_markers(&mut self);
    /// Shows or hides a layer.
    fn set_layer_visibility(&mut self, layer: MapLayer, visible: bool);
    /// Starts an animated camera transition. A new call must preempt any transition the
    /// surface is still running.
    fn fly_to(&mut self, request: &FlyTo);
}

/// Derives markers and layer visibility from the feature set and the layer state, and keeps a
/// [`MapSurface`] in sync with them.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    palette: SeverityPalette,
    heatmap_style: HeatmapStyle,
    last_fly_to: Option<TransitionToken>,
}

impl ViewState {
    /// Creates a view state with the given palette.
    pub fn new(palette: SeverityPalette) -> Self {
        Self {
            palette,
            ..Default::default()
        }
    }

    /// Severity palette used for the markers.
    pub fn palette(&self) -> &SeverityPalette {
        &self.palette
    }

    /// Paint parameters of the heat layer.
    pub fn heatmap_style(&self) -> &HeatmapStyle {
        &self.heatmap_style
    }

    /// Hotspot markers for the collection. Empty when the hotspot layer is off.
    pub fn markers(
        &self,
        collection: &FeatureCollection,
        layers: &LayerVisibility,
    ) -> Vec<HotspotMarker> {
        if !layers.is_visible(MapLayer::Hotspots) {
            return vec![];
        }

        collection.iter().map(|f| self.marker(f)).collect()
    }

    fn marker(&self, feature: &OutbreakFeature) -> HotspotMarker {
        let p = &feature.properties;
        HotspotMarker {
            feature_id: p.id.clone(),
            outbreak_id: p.outbreak_id.clone(),
            position: feature.position(),
            size: marker_size(p.case_count),
            color: self.palette.color(p.severity),
            severity: p.severity,
            tooltip: MarkerTooltip {
                title: p.disease_name.clone(),
                subtitle: p.country.clone(),
            },
        }
    }

    /// Whether the heat layer is shown.
    pub fn heatmap_visible(&self, layers: &LayerVisibility) -> bool {
        layers.is_visible(MapLayer::Heatmap)
    }

    /// Weighted points of the heat layer.
    pub fn heat_points(&self, collection: &FeatureCollection) -> Vec<HeatPoint> {
        collection
            .iter()
            .map(|f| HeatPoint {
                position: f.position(),
                weight: if f.properties.severity_score.is_finite() {
                    f.properties.severity_score.clamp(0.0, 1.0)
                } else {
                    0.0
                },
            })
            .collect()
    }

    /// Pushes the derived state into the surface.
    ///
    /// `latest_fly_to` is the most recent camera request
    /// ([`Camera::last_request`](crate::camera::Camera::last_request)). It is sent once, even if
    /// the camera has already finished the transition: syncing again with the same request does
    /// not restart the animation on the surface.
    ///
    /// [`Camera::last_request`]: crate::camera::Camera::last_request
    pub fn sync(
        &mut self,
        surface: &mut impl MapSurface,
        collection: &FeatureCollection,
        layers: &LayerVisibility,
        latest_fly_to: Option<FlyTo>,
    ) {
        surface.set_source_data(collection);
        for (layer, entry) in layers.iter() {
            surface.set_layer_visibility(layer, entry.visible);
        }

        let markers = self.markers(collection, layers);
        if markers.is_empty() {
            surface.clear_markers();
        } else {
            surface.set_markers(&markers);
        }

        if let Some(request) = latest_fly_to {
            if self.last_fly_to.map_or(true, |last| request.token > last) {
                log::debug!("Flying to {:?}", request.target.center);
                surface.fly_to(&request);
                self.last_fly_to = Some(request.token);
            }
        }
    }
}

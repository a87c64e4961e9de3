//! Visual layers of the map and their visibility.

use std::fmt::{Display, Formatter};

/// Named visual layer of the outbreak map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapLayer {
    /// Heat intensity layer weighted by the severity score.
    Heatmap,
    /// Point markers per feature.
    Hotspots,
    /// Spread overlay.
    Spread,
    /// News pins.
    NewsPins,
}

impl MapLayer {
    /// All layers in the order they are listed in the layer controls.
    pub const ALL: [MapLayer; 4] = [
        MapLayer::Heatmap,
        MapLayer::Hotspots,
        MapLayer::Spread,
        MapLayer::NewsPins,
    ];

    /// Stable identifier of the layer on the rendering surface.
    pub fn id(&self) -> &'static str {
        match self {
            MapLayer::Heatmap => "outbreak-heat",
            MapLayer::Hotspots => "outbreak-hotspots",
            MapLayer::Spread => "outbreak-spread",
            MapLayer::NewsPins => "outbreak-news-pins",
        }
    }

    /// Label shown in the layer controls.
    pub fn label(&self) -> &'static str {
        match self {
            MapLayer::Heatmap => "Heat Map",
            MapLayer::Hotspots => "Hotspots",
            MapLayer::Spread => "Spread",
            MapLayer::NewsPins => "News Pins",
        }
    }

    fn index(&self) -> usize {
        match self {
            MapLayer::Heatmap => 0,
            MapLayer::Hotspots => 1,
            MapLayer::Spread => 2,
            MapLayer::NewsPins => 3,
        }
    }
}

impl Display for MapLayer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// State of a single layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerEntry {
    /// Whether the layer is shown.
    pub visible: bool,
    /// Whether the user may toggle the layer. Non-interactive layers are still listed in the
    /// controls, in a disabled state.
    pub interactive: bool,
}

/// Fixed set of independently toggleable layer flags.
///
/// ```
/// use pulsemap::layer::{LayerVisibility, MapLayer};
///
/// let mut layers = LayerVisibility::default();
/// assert!(layers.toggle(MapLayer::Heatmap));
/// assert!(!layers.is_visible(MapLayer::Heatmap));
///
/// // Spread is reserved for a future release and can't be toggled.
/// assert!(!layers.toggle(MapLayer::Spread));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerVisibility([LayerEntry; 4]);

impl Default for LayerVisibility {
    fn default() -> Self {
        Self([
            LayerEntry {
                visible: true,
                interactive: true,
            },
            LayerEntry {
                visible: true,
                interactive: true,
            },
            LayerEntry {
                visible: false,
                interactive: false,
            },
            LayerEntry {
                visible: false,
                interactive: false,
            },
        ])
    }
}

impl LayerVisibility {
    /// Flips visibility of the layer. Returns `true` if the state changed, which only happens
    /// for interactive layers.
    pub fn toggle(&mut self, layer: MapLayer) -> bool {
        let entry = &mut self.0[layer.index()];
        if !entry.interactive {
            log::debug!("Ignoring toggle of non-interactive layer {layer}");
            return false;
        }

        entry.visible = !entry.visible;
        true
    }

    /// Whether the layer is shown.
    pub fn is_visible(&self, layer: MapLayer) -> bool {
        self.0[layer.index()].visible
    }

    /// Whether the user may toggle the layer.
    pub fn is_interactive(&self, layer: MapLayer) -> bool {
        self.0[layer.index()].interactive
    }

    /// Returns a copy with the layer visibility set.
    pub fn with_visible(mut self, layer: MapLayer, visible: bool) -> Self {
        self.0[layer.index()].visible = visible;
        self
    }

    /// Returns a copy with the layer interactivity set.
    pub fn with_interactive(mut self, layer: MapLayer, interactive: bool) -> Self {
        self.set_interactive(layer, interactive);
        self
    }

    /// Sets whether the user may toggle the layer.
    pub fn set_interactive(&mut self, layer: MapLayer, interactive: bool) {
        self.0[layer.index()].interactive = interactive;
    }

    /// State of the given layer.
    pub fn entry(&self, layer: MapLayer) -> LayerEntry {
        self.0[layer.index()]
    }

    /// Iterates over all layers with their state, in control order.
    pub fn iter(&self) -> impl Iterator<Item = (MapLayer, LayerEntry)> + '_ {
        MapLayer::ALL.into_iter().map(|layer| (layer, self.entry(layer)))
    }
}

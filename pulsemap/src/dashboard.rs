use pulsemap_types::{FeatureCollection, FeedItem, GeoPoint};
use web_time::SystemTime;

use crate::camera::{Camera, CameraConfig, CameraView, FlyTo, TransitionToken};
use crate::layer::{LayerVisibility, MapLayer};
use crate::messenger::Messenger;
use crate::search::FeedSearch;
use crate::selection::{OutbreakDetail, Selection};
use crate::source::{DataSourceResolver, DataSourceStatus, FeedOrigin, OutbreakSource, ResolvedData};
use crate::view_state::{HeatPoint, HotspotMarker, MapSurface, ViewState};

/// State of the outbreak dashboard.
///
/// All state is changed through the methods of this struct. Each change requests a redraw from
/// the messenger, if one is set.
pub struct Dashboard {
    features: FeatureCollection,
    feed: Vec<FeedItem>,
    status: DataSourceStatus,
    feed_origin: Option<FeedOrigin>,
    layers: LayerVisibility,
    selection: Selection,
    camera: Camera,
    view_state: ViewState,
    search: FeedSearch,
    messenger: Option<Box<dyn Messenger>>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl Dashboard {
    /// Creates an empty dashboard in the `Loading` state.
    pub fn new(camera_config: CameraConfig) -> Self {
        Self {
            features: FeatureCollection::default(),
            feed: vec![],
            status: DataSourceStatus::Loading,
            feed_origin: None,
            layers: LayerVisibility::default(),
            selection: Selection::default(),
            camera: Camera::new(camera_config),
            view_state: ViewState::default(),
            search: FeedSearch::default(),
            messenger: None,
        }
    }

    /// Replaces the default layer state.
    pub fn with_layers(mut self, layers: LayerVisibility) -> Self {
        self.layers = layers;
        self
    }

    /// Replaces the default view state (marker palette).
    pub fn with_view_state(mut self, view_state: ViewState) -> Self {
        self.view_state = view_state;
        self
    }

    /// Sets the new messenger for the dashboard.
    pub fn set_messenger(&mut self, messenger: Option<impl Messenger + 'static>) {
        self.messenger = messenger.map(|m| Box::new(m) as Box<dyn Messenger>);
    }

    /// Requests redraw of the view.
    pub fn redraw(&self) {
        if let Some(messenger) = &self.messenger {
            messenger.request_redraw();
        }
    }

    /// Resolves the data with the resolver and applies it.
    pub async fn load<S: OutbreakSource>(&mut self, resolver: &DataSourceResolver<S>) {
        let data = resolver.resolve().await;
        self.apply(data);
    }

    /// Replaces the displayed data.
    ///
    /// The selection is kept only if the selected feature is still present in the new
    /// collection, and is updated to the new version of the feature.
    pub fn apply(&mut self, data: ResolvedData) {
        log::debug!(
            "Applying {} features ({}) and {} feed items",
            data.features.len(),
            data.status.label(),
            data.feed.len()
        );

        let selected_id = self.selection.selected().map(|f| f.properties.id.clone());
        if let Some(id) = selected_id {
            match data.features.get(&id) {
                Some(feature) => self.selection.refresh(feature.clone()),
                None => self.selection.clear(),
            }
        }

        self.features = data.features;
        self.feed = data.feed;
        self.status = data.status;
        self.feed_origin = Some(data.feed_origin);
        self.redraw();
    }

    /// Displayed feature collection.
    pub fn features(&self) -> &FeatureCollection {
        &self.features
    }

    /// Full feed, newest first.
    pub fn feed(&self) -> &[FeedItem] {
        &self.feed
    }

    /// Origin of the displayed features.
    pub fn status(&self) -> DataSourceStatus {
        self.status
    }

    /// Origin of the displayed feed. `None` until data is applied.
    pub fn feed_origin(&self) -> Option<FeedOrigin> {
        self.feed_origin
    }

    /// Layer state.
    pub fn layers(&self) -> &LayerVisibility {
        &self.layers
    }

    /// Toggles the layer. Returns `false` if the layer is not interactive.
    pub fn toggle_layer(&mut self, layer: MapLayer) -> bool {
        let changed = self.layers.toggle(layer);
        if changed {
            self.redraw();
        }

        changed
    }

    /// Selects the feature with the given id (marker click) and flies the camera to it.
    ///
    /// Returns `None` and changes nothing if there is no such feature.
    pub fn select_feature(&mut self, feature_id: &str) -> Option<FlyTo> {
        let Some(feature) = self.features.get(feature_id) else {
            log::debug!("Feature {feature_id} is not displayed");
            return None;
        };

        let target = self.selection.select(feature.clone());
        Some(self.fly_to(target))
    }

    /// Selects the first feature of the outbreak (feed item click) and flies the camera to it.
    ///
    /// Returns `None` and changes nothing if the outbreak has no displayed feature.
    pub fn select_feed_item(&mut self, outbreak_id: &str) -> Option<FlyTo> {
        let target = self
            .selection
            .select_outbreak(outbreak_id, &self.features)?;
        Some(self.fly_to(target))
    }

    fn fly_to(&mut self, target: GeoPoint) -> FlyTo {
        let request = self.camera.fly_to(target);
        self.redraw();
        request
    }

    /// Closes the detail panel. The camera stays where it is.
    pub fn close_detail(&mut self) {
        if self.selection.selected().is_some() {
            self.selection.clear();
            self.redraw();
        }
    }

    /// Selection state.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Detail panel contents of the selected feature.
    pub fn detail(&self) -> Option<OutbreakDetail> {
        self.selection.detail()
    }

    /// Sets the search query of the feed.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.search.query() {
            self.search = FeedSearch::new(query);
            self.redraw();
        }
    }

    /// Current search query.
    pub fn search_query(&self) -> &str {
        self.search.query()
    }

    /// Feed items matching the search query.
    pub fn visible_feed(&self) -> Vec<&FeedItem> {
        self.search.apply(&self.feed)
    }

    /// Hotspot markers to draw.
    pub fn markers(&self) -> Vec<HotspotMarker> {
        self.view_state.markers(&self.features, &self.layers)
    }

    /// Whether the heat layer is shown.
    pub fn heatmap_visible(&self) -> bool {
        self.view_state.heatmap_visible(&self.layers)
    }

    /// Weighted points of the heat layer.
    pub fn heat_points(&self) -> Vec<HeatPoint> {
        self.view_state.heat_points(&self.features)
    }

    /// View state (palette and heat layer style).
    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    /// Map camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Current camera view.
    pub fn camera_view(&self) -> CameraView {
        self.camera.view()
    }

    /// Updates the camera before rendering. Returns `true` if the view changed.
    pub fn animate(&mut self) -> bool {
        self.animate_at(SystemTime::now())
    }

    /// Same as [`Dashboard::animate`] with an explicit current time.
    pub fn animate_at(&mut self, now: SystemTime) -> bool {
        let changed = self.camera.animate_at(now);
        if changed {
            self.redraw();
        }

        changed
    }

    /// Reports that the surface finished the transition with the given token.
    pub fn complete_transition(&mut self, token: TransitionToken) -> bool {
        let applied = self.camera.complete(token);
        if applied {
            self.redraw();
        }

        applied
    }

    /// Pushes the current state into the rendering surface.
    pub fn sync(&mut self, surface: &mut impl MapSurface) {
        self.view_state.sync(
            surface,
            &self.features,
            &self.layers,
            self.camera.last_request(),
        );
    }
}

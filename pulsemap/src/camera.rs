//! Map camera and animated fly-to transitions.

use std::time::Duration;

use pulsemap_types::GeoPoint;
use web_time::SystemTime;

const DEFAULT_FLY_TO_ZOOM: f64 = 5.0;
const DEFAULT_FLY_TO_DURATION: Duration = Duration::from_millis(1500);
const MAX_FLY_TO_DURATION: Duration = Duration::from_secs(5);
const DEFAULT_CENTER: GeoPoint = GeoPoint::lonlat(20.0, 10.0);
const DEFAULT_ZOOM: f64 = 2.2;

/// Center and zoom level of the map viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    /// Center of the viewport.
    pub center: GeoPoint,
    /// Zoom level.
    pub zoom: f64,
}

impl CameraView {
    /// Creates a new view.
    pub fn new(center: GeoPoint, zoom: f64) -> Self {
        Self { center, zoom }
    }

    /// Interpolates between `self` (`k == 0`) and `target` (`k == 1`).
    pub fn interpolate(&self, target: &CameraView, k: f64) -> CameraView {
        let k = k.clamp(0.0, 1.0);
        CameraView {
            center: self.center.interpolate(&target.center, k),
            zoom: self.zoom + (target.zoom - self.zoom) * k,
        }
    }
}

/// Configuration of a [`Camera`].
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct CameraConfig {
    initial_view: CameraView,
    fly_to_zoom: f64,
    fly_to_duration: Duration,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            initial_view: CameraView::new(DEFAULT_CENTER, DEFAULT_ZOOM),
            fly_to_zoom: DEFAULT_FLY_TO_ZOOM,
            fly_to_duration: DEFAULT_FLY_TO_DURATION,
        }
    }
}

impl CameraConfig {
    /// View the camera starts with.
    pub fn initial_view(&self) -> CameraView {
        self.initial_view
    }

    /// Sets the view the camera starts with.
    pub fn with_initial_view(mut self, view: CameraView) -> Self {
        self.initial_view = view;
        self
    }

    /// Zoom level of fly-to transitions.
    pub fn fly_to_zoom(&self) -> f64 {
        self.fly_to_zoom
    }

    /// Sets zoom level of fly-to transitions.
    pub fn with_fly_to_zoom(mut self, zoom: f64) -> Self {
        self.fly_to_zoom = zoom;
        self
    }

    /// Sets zoom level of fly-to transitions.
    pub fn set_fly_to_zoom(&mut self, zoom: f64) {
        self.fly_to_zoom = zoom;
    }

    /// Duration of fly-to transitions.
    pub fn fly_to_duration(&self) -> Duration {
        self.fly_to_duration
    }

    /// Sets duration of fly-to transitions. Durations over 5 seconds are capped.
    pub fn with_fly_to_duration(mut self, duration: Duration) -> Self {
        self.set_fly_to_duration(duration);
        self
    }

    /// Sets duration of fly-to transitions. Durations over 5 seconds are capped.
    pub fn set_fly_to_duration(&mut self, duration: Duration) {
        self.fly_to_duration = duration.min(MAX_FLY_TO_DURATION);
    }
}

/// Identifies one fly-to request. Tokens increase monotonically, the most recent one wins.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransitionToken(u64);

/// A camera transition request to be executed by the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyTo {
    /// Token of the request.
    pub token: TransitionToken,
    /// Target view.
    pub target: CameraView,
    /// Duration of the animation.
    pub duration: Duration,
}

#[derive(Debug, Clone)]
struct Transition {
    request: FlyTo,
    start_view: CameraView,
    start_time: SystemTime,
}

/// Camera of the map.
///
/// A transition started with [`Camera::fly_to`] supersedes any transition in flight, so the
/// view always converges on the latest target. Completion of an older transition (for example
/// reported by an animation running on the rendering surface) is ignored.
#[derive(Debug, Clone)]
pub struct Camera {
    config: CameraConfig,
    view: CameraView,
    transition: Option<Transition>,
    last_request: Option<FlyTo>,
    last_token: u64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl Camera {
    /// Creates a camera at the configured initial view.
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            view: config.initial_view(),
            transition: None,
            last_request: None,
            last_token: 0,
        }
    }

    /// Configuration of the camera.
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Current view.
    pub fn view(&self) -> CameraView {
        self.view
    }

    /// Target view of the current transition, or the current view if there is none.
    pub fn target_view(&self) -> CameraView {
        self.transition
            .as_ref()
            .map(|t| t.request.target)
            .unwrap_or(self.view)
    }

    /// The transition in flight.
    pub fn pending(&self) -> Option<FlyTo> {
        self.transition.as_ref().map(|t| t.request)
    }

    /// The most recent fly-to request. Unlike [`Camera::pending`] it is kept after the
    /// transition completes.
    pub fn last_request(&self) -> Option<FlyTo> {
        self.last_request
    }

    /// Starts a transition to `center` at the configured fly-to zoom.
    pub fn fly_to(&mut self, center: GeoPoint) -> FlyTo {
        self.fly_to_at(center, SystemTime::now())
    }

    /// Same as [`Camera::fly_to`] with an explicit start time.
    pub fn fly_to_at(&mut self, center: GeoPoint, now: SystemTime) -> FlyTo {
        self.last_token += 1;
        let request = FlyTo {
            token: TransitionToken(self.last_token),
            target: CameraView::new(center, self.config.fly_to_zoom()),
            duration: self.config.fly_to_duration(),
        };

        if let Some(previous) = &self.transition {
            log::trace!(
                "Transition {:?} superseded by {:?}",
                previous.request.token,
                request.token
            );
        }

        self.last_request = Some(request);
        self.transition = Some(Transition {
            request,
            start_view: self.view,
            start_time: now,
        });

        request
    }

    /// Updates the view according to the transition in flight. Returns `true` if the view
    /// changed.
    pub fn animate(&mut self) -> bool {
        self.animate_at(SystemTime::now())
    }

    /// Same as [`Camera::animate`] with an explicit current time.
    pub fn animate_at(&mut self, now: SystemTime) -> bool {
        let Some(transition) = &self.transition else {
            return false;
        };

        let duration = transition.request.duration.as_secs_f64();
        let k = if duration > 0.0 {
            now.duration_since(transition.start_time)
                .unwrap_or_default()
                .as_secs_f64()
                / duration
        } else {
            1.0
        };

        if k >= 1.0 {
            let token = transition.request.token;
            self.complete(token);
        } else {
            self.view = transition
                .start_view
                .interpolate(&transition.request.target, ease(k));
        }

        true
    }

    /// Finishes the transition with the given token, setting the view to its target.
    ///
    /// Returns `false` and leaves the camera unchanged if the token does not belong to the
    /// latest transition.
    pub fn complete(&mut self, token: TransitionToken) -> bool {
        match &self.transition {
            Some(transition) if transition.request.token == token => {
                self.view = transition.request.target;
                self.transition = None;
                true
            }
            _ => {
                log::trace!("Ignoring completion of stale transition {token:?}");
                false
            }
        }
    }
}

fn ease(k: f64) -> f64 {
    // ease-in-out cubic
    if k < 0.5 {
        4.0 * k * k * k
    } else {
        1.0 - (-2.0 * k + 2.0).powi(3) / 2.0
    }
}

use maybe_sync::{MaybeSend, MaybeSync};

/// Receives notifications when the dashboard state changes and the view should be redrawn.
pub trait Messenger: MaybeSend + MaybeSync {
    /// Requests a redraw of the view.
    fn request_redraw(&self);
}

/// Messenger that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct DummyMessenger;

impl Messenger for DummyMessenger {
    fn request_redraw(&self) {}
}

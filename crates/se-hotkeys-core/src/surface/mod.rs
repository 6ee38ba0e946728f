//! Transient surfaces and the singleton lifecycle that governs them.

mod controller;
mod event;

pub use {
    controller::{RequestPolicy, SurfaceController, SurfacePhase},
    event::{EventSink, SurfaceEvent, SurfaceId},
};

use crate::CoreResult;

/// A live instance of a transient surface.
///
/// Dropping a surface detaches it: the controller stops tracking the
/// instance, but the instance itself is free to finish on its own.
pub trait Surface {
    /// Control message type accepted by this surface.
    type Message;

    /// Identity of this instance, echoed back in every [`SurfaceEvent`].
    fn id(&self) -> SurfaceId;

    /// Deliver a control message.
    fn send(&self, message: Self::Message) -> CoreResult<()>;

    /// Ask the instance to shut down. Best effort.
    fn close(&self);

    /// Bring the instance back in front of the user.
    ///
    /// Called when a request is served by an instance that is already live.
    /// Surfaces with nothing to show do nothing.
    fn reveal(&self) -> CoreResult<()> {
        Ok(())
    }
}

/// Creates surface instances of one kind.
pub trait SurfaceLauncher {
    /// Surface produced by this launcher.
    type Surface: Surface;

    /// Human-readable kind name used in logs.
    fn kind(&self) -> &'static str;

    /// Create a new instance identified by `id`.
    ///
    /// The instance must emit [`SurfaceEvent::Ready`] once it can accept a
    /// control message and [`SurfaceEvent::Closed`] when it goes away.
    fn launch(&mut self, id: SurfaceId) -> CoreResult<Self::Surface>;
}

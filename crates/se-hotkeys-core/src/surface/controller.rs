use crate::{
    CoreResult,
    surface::{Surface, SurfaceEvent, SurfaceId, SurfaceLauncher},
};

use std::mem;

use tracing::{debug, info, instrument, warn};

/// What a new request does when an instance is already tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPolicy {
    /// Detach the tracked instance and launch a new one.
    Replace,
    /// Deliver the message to a live instance and reveal it instead of
    /// launching another. An instance that never became ready, or that no
    /// longer accepts messages, is replaced.
    ReuseLive,
}

/// Observable lifecycle phase of a surface kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfacePhase {
    /// No instance is tracked.
    Absent,
    /// An instance was launched and has not acknowledged readiness yet.
    Creating,
    /// The tracked instance is ready and has received its control message.
    Live,
}

enum SurfaceState<S: Surface> {
    Absent,
    Creating {
        surface: S,
        pending: Option<S::Message>,
    },
    Live {
        surface: S,
    },
}

/// Owns the single tracked instance of one surface kind.
///
/// Control messages are held back until the instance reports
/// [`SurfaceEvent::Ready`] and dropped if it reports
/// [`SurfaceEvent::Closed`] first. Events from instances that are no longer
/// tracked are ignored.
pub struct SurfaceController<L: SurfaceLauncher> {
    launcher: L,
    policy: RequestPolicy,
    state: SurfaceState<L::Surface>,
}

type MessageOf<L> = <<L as SurfaceLauncher>::Surface as Surface>::Message;

impl<L: SurfaceLauncher> SurfaceController<L> {
    /// Create a controller with nothing tracked.
    pub fn new(launcher: L, policy: RequestPolicy) -> Self {
        Self {
            launcher,
            policy,
            state: SurfaceState::Absent,
        }
    }

    /// Request an instance that should receive `message` once ready.
    ///
    /// Returns the id of the instance that will receive the message.
    #[track_caller]
    #[instrument(skip_all, fields(kind = self.launcher.kind()))]
    pub fn request(&mut self, message: MessageOf<L>) -> CoreResult<SurfaceId>
    where
        MessageOf<L>: Clone,
    {
        if self.policy == RequestPolicy::ReuseLive
            && let SurfaceState::Live { surface } = &self.state
        {
            match surface.send(message.clone()) {
                Ok(()) => {
                    if let Err(e) = surface.reveal() {
                        warn!(
                            surface_id = %surface.id(),
                            error = ?e,
                            "Failed to reveal live surface"
                        );
                    }
                    info!(surface_id = %surface.id(), "Reusing live surface");
                    return Ok(surface.id());
                }
                Err(e) => {
                    warn!(
                        surface_id = %surface.id(),
                        error = ?e,
                        "Live surface unreachable, launching a new one"
                    );
                }
            }
        }

        match mem::replace(&mut self.state, SurfaceState::Absent) {
            SurfaceState::Absent => {}
            SurfaceState::Creating { surface, .. } | SurfaceState::Live { surface } => {
                info!(surface_id = %surface.id(), "Detached previous surface");
            }
        }

        let id = SurfaceId::new();
        let surface = self.launcher.launch(id)?;
        self.state = SurfaceState::Creating {
            surface,
            pending: Some(message),
        };

        info!(surface_id = %id, "Surface launched, waiting for ready");

        Ok(id)
    }

    /// Deliver `message` to the tracked instance, if any.
    ///
    /// A creating instance gets it in place of its pending message. Returns
    /// `false` when nothing is tracked.
    #[track_caller]
    pub fn notify(&mut self, message: MessageOf<L>) -> CoreResult<bool> {
        match &mut self.state {
            SurfaceState::Absent => Ok(false),
            SurfaceState::Creating { pending, .. } => {
                *pending = Some(message);
                Ok(true)
            }
            SurfaceState::Live { surface } => {
                surface.send(message)?;
                Ok(true)
            }
        }
    }

    /// Apply a lifecycle event. Returns `true` if it changed the state.
    #[instrument(skip(self), fields(kind = self.launcher.kind()))]
    pub fn handle_event(&mut self, event: SurfaceEvent) -> bool {
        match event {
            SurfaceEvent::Ready(id) => match mem::replace(&mut self.state, SurfaceState::Absent) {
                SurfaceState::Creating { surface, pending } if surface.id() == id => {
                    if let Some(message) = pending
                        && let Err(e) = surface.send(message)
                    {
                        warn!(surface_id = %id, error = ?e, "Failed to deliver pending message");
                    }
                    self.state = SurfaceState::Live { surface };
                    info!(surface_id = %id, "Surface live");
                    true
                }
                other => {
                    self.state = other;
                    debug!(surface_id = %id, "Ignoring ready from untracked surface");
                    false
                }
            },
            SurfaceEvent::Closed(id) => {
                if self.tracked_id() == Some(id) {
                    self.state = SurfaceState::Absent;
                    info!(surface_id = %id, "Surface closed");
                    true
                } else {
                    debug!(surface_id = %id, "Ignoring close from untracked surface");
                    false
                }
            }
        }
    }

    /// Close the tracked instance. No-op when nothing is tracked.
    #[instrument(skip(self), fields(kind = self.launcher.kind()))]
    pub fn teardown(&mut self) -> bool {
        match mem::replace(&mut self.state, SurfaceState::Absent) {
            SurfaceState::Absent => false,
            SurfaceState::Creating { surface, .. } | SurfaceState::Live { surface } => {
                surface.close();
                info!(surface_id = %surface.id(), "Surface torn down");
                true
            }
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SurfacePhase {
        match self.state {
            SurfaceState::Absent => SurfacePhase::Absent,
            SurfaceState::Creating { .. } => SurfacePhase::Creating,
            SurfaceState::Live { .. } => SurfacePhase::Live,
        }
    }

    /// Id of the tracked instance.
    pub fn tracked_id(&self) -> Option<SurfaceId> {
        match &self.state {
            SurfaceState::Absent => None,
            SurfaceState::Creating { surface, .. } | SurfaceState::Live { surface } => {
                Some(surface.id())
            }
        }
    }
}

use std::{fmt, sync::Arc};

use uuid::Uuid;

/// Unique identity of one surface instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(Uuid);

impl SurfaceId {
    /// Allocate a fresh id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SurfaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for SurfaceId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle notifications emitted by a surface instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// The instance can now accept its control message.
    Ready(SurfaceId),
    /// The instance went away.
    Closed(SurfaceId),
}

/// Callback through which surfaces report lifecycle events.
///
/// Invoked from whatever thread the surface runs on.
pub type EventSink = Arc<dyn Fn(SurfaceEvent) + Send + Sync>;

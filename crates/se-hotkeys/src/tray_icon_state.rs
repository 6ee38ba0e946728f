use se_hotkeys_core::SurfacePhase;

/// Tray icon states reflecting what the application is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayIconState {
    /// Nothing is playing.
    Idle,
    /// A playback surface is tracked.
    Playing,
    /// The last operation failed.
    Attention,
}

impl TrayIconState {
    /// State to show for the given failure flag and playback phase.
    ///
    /// A pending failure wins over playback until it is cleared.
    pub fn resolve(attention: bool, playback: SurfacePhase) -> Self {
        match (attention, playback) {
            (true, _) => Self::Attention,
            (false, SurfacePhase::Absent) => Self::Idle,
            (false, SurfacePhase::Creating | SurfacePhase::Live) => Self::Playing,
        }
    }

    /// Tooltip shown for this state.
    pub fn tooltip(self) -> &'static str {
        match self {
            Self::Idle => "SE Hotkeys",
            Self::Playing => "SE Hotkeys - Playing",
            Self::Attention => "SE Hotkeys - Something went wrong, see the log",
        }
    }
}

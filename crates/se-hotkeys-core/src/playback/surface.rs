//! Fire-and-forget playback surface backed by a worker thread.
//!
//! Each instance owns its own output stream on a dedicated thread, because
//! `cpal::Stream` is `!Send` on some platforms. The thread reports
//! [`SurfaceEvent::Ready`] once the device is open and
//! [`SurfaceEvent::Closed`] when it exits.

use crate::{
    CoreResult, SurfaceError,
    playback::{ActivePlayback, DecodedSound, SoundOutput},
    surface::{EventSink, Surface, SurfaceEvent, SurfaceId, SurfaceLauncher},
};

use std::{
    panic::Location,
    path::PathBuf,
    sync::mpsc::{self, Receiver, RecvTimeoutError, Sender},
    thread,
    time::Duration,
};

use error_location::ErrorLocation;
use tracing::{debug, info, info_span, warn};

/// How often an idle or detached worker checks whether playback finished.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Control message accepted by a playback surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackMessage {
    /// Play the given file once. `None` means the slot has no sound bound.
    Play(Option<PathBuf>),
}

enum Control {
    Message(PlaybackMessage),
    Close,
}

/// Handle to a running playback worker.
pub struct PlaybackSurface {
    id: SurfaceId,
    control_tx: Sender<Control>,
}

impl Surface for PlaybackSurface {
    type Message = PlaybackMessage;

    fn id(&self) -> SurfaceId {
        self.id
    }

    #[track_caller]
    fn send(&self, message: PlaybackMessage) -> CoreResult<()> {
        self.control_tx
            .send(Control::Message(message))
            .map_err(|e| SurfaceError::SendFailed {
                reason: format!("Playback worker is gone: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    fn close(&self) {
        let _ = self.control_tx.send(Control::Close);
    }
}

/// Spawns playback workers.
pub struct PlaybackLauncher {
    volume: f32,
    events: EventSink,
}

impl PlaybackLauncher {
    /// Create a launcher playing at `volume` and reporting to `events`.
    pub fn new(volume: f32, events: EventSink) -> Self {
        Self { volume, events }
    }
}

impl SurfaceLauncher for PlaybackLauncher {
    type Surface = PlaybackSurface;

    fn kind(&self) -> &'static str {
        "playback"
    }

    #[track_caller]
    fn launch(&mut self, id: SurfaceId) -> CoreResult<PlaybackSurface> {
        let (control_tx, control_rx) = mpsc::channel();
        let events = self.events.clone();
        let volume = self.volume;

        thread::Builder::new()
            .name(format!("playback-{}", id))
            .spawn(move || run_worker(id, control_rx, volume, events))
            .map_err(|e| SurfaceError::LaunchFailed {
                reason: format!("Failed to spawn playback thread: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(PlaybackSurface { id, control_tx })
    }
}

fn run_worker(id: SurfaceId, control_rx: Receiver<Control>, volume: f32, events: EventSink) {
    let _span = info_span!("playback_surface", surface_id = %id).entered();

    let output = match SoundOutput::open() {
        Ok(output) => output,
        Err(e) => {
            warn!(error = ?e, "No output device, closing");
            events(SurfaceEvent::Closed(id));
            return;
        }
    };

    events(SurfaceEvent::Ready(id));

    let mut playing: Option<ActivePlayback> = None;
    let mut detached = false;

    loop {
        if let Some(active) = &playing
            && active.is_finished()
        {
            debug!("Playback finished");
            break;
        }

        if detached {
            thread::sleep(POLL_INTERVAL);
            continue;
        }

        match control_rx.recv_timeout(POLL_INTERVAL) {
            Ok(Control::Message(PlaybackMessage::Play(path))) => {
                if playing.is_some() {
                    debug!("Already playing, ignoring repeated play");
                    continue;
                }

                let Some(path) = path else {
                    info!("No sound bound to this slot");
                    break;
                };

                match DecodedSound::from_file(&path).and_then(|sound| output.play(sound, volume)) {
                    Ok(active) => {
                        info!(path = ?path, "Playing sound");
                        playing = Some(active);
                    }
                    Err(e) => {
                        warn!(path = ?path, error = ?e, "Failed to play sound");
                        break;
                    }
                }
            }
            Ok(Control::Close) => {
                debug!("Close requested");
                break;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                if playing.is_none() {
                    break;
                }
                debug!("Detached, finishing current sound");
                detached = true;
            }
        }
    }

    drop(playing);
    events(SurfaceEvent::Closed(id));
}

use crate::{
    PlaybackLauncher, PlaybackMessage, Surface, SurfaceEvent, SurfaceId, SurfaceLauncher,
};

use std::{
    path::PathBuf,
    sync::{Arc, Mutex, mpsc},
    time::Duration,
};

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

fn launcher() -> (PlaybackLauncher, mpsc::Receiver<SurfaceEvent>) {
    let (event_tx, event_rx) = mpsc::channel();
    let event_tx = Mutex::new(event_tx);
    let launcher = PlaybackLauncher::new(
        1.0,
        Arc::new(move |event| {
            let _ = event_tx
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .send(event);
        }),
    );
    (launcher, event_rx)
}

/// WHAT: An unbound slot opens, reports ready, then closes
/// WHY: Pressing an unbound chord must not leave a worker behind
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
#[allow(clippy::unwrap_used)]
fn given_output_device_when_playing_nothing_then_ready_then_closed() {
    // Given: A launched playback surface
    let (mut launcher, events) = launcher();
    let id = SurfaceId::new();
    let surface = launcher.launch(id).unwrap();
    assert_eq!(events.recv_timeout(EVENT_TIMEOUT).unwrap(), SurfaceEvent::Ready(id));

    // When: Playing an unbound slot
    surface.send(PlaybackMessage::Play(None)).unwrap();

    // Then: Closed
    assert_eq!(events.recv_timeout(EVENT_TIMEOUT).unwrap(), SurfaceEvent::Closed(id));
}

/// WHAT: A missing sound file closes the surface
/// WHY: Decode failures are logged by the worker, the host only sees Closed
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
#[allow(clippy::unwrap_used)]
fn given_missing_file_when_playing_then_closed() {
    // Given: A ready playback surface
    let (mut launcher, events) = launcher();
    let id = SurfaceId::new();
    let surface = launcher.launch(id).unwrap();
    assert_eq!(events.recv_timeout(EVENT_TIMEOUT).unwrap(), SurfaceEvent::Ready(id));

    // When: Playing a file that does not exist
    surface
        .send(PlaybackMessage::Play(Some(PathBuf::from("/nonexistent/sound.wav"))))
        .unwrap();

    // Then: Closed
    assert_eq!(events.recv_timeout(EVENT_TIMEOUT).unwrap(), SurfaceEvent::Closed(id));
}

/// WHAT: Closing an idle surface ends its worker
/// WHY: Teardown must release the output device
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
#[allow(clippy::unwrap_used)]
fn given_ready_surface_when_closing_then_closed() {
    // Given: A ready playback surface
    let (mut launcher, events) = launcher();
    let id = SurfaceId::new();
    let surface = launcher.launch(id).unwrap();
    assert_eq!(events.recv_timeout(EVENT_TIMEOUT).unwrap(), SurfaceEvent::Ready(id));

    // When: Closing
    surface.close();

    // Then: Closed
    assert_eq!(events.recv_timeout(EVENT_TIMEOUT).unwrap(), SurfaceEvent::Closed(id));
}

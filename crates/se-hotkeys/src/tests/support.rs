//! Fake surfaces and a host fixture shared by the host and dispatcher tests.

use crate::{
    Host, HotkeyActions, HotkeyRegistrar,
    config::{BindingTable, ConfigStore, Slot},
    settings::SettingsMessage,
};

use se_hotkeys_core::{
    CoreResult, PlaybackMessage, Surface, SurfaceError, SurfaceId, SurfaceLauncher,
};

use std::{
    fmt::Debug,
    marker::PhantomData,
    panic::Location,
    path::PathBuf,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use error_location::ErrorLocation;
use tempfile::TempDir;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Record<M> {
    Launched(SurfaceId),
    Sent(SurfaceId, M),
    Closed(SurfaceId),
}

pub(super) struct Journal<M> {
    records: Arc<Mutex<Vec<Record<M>>>>,
    refuse_launches: Arc<AtomicBool>,
}

impl<M> Clone for Journal<M> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            refuse_launches: Arc::clone(&self.refuse_launches),
        }
    }
}

impl<M: Clone> Journal<M> {
    fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            refuse_launches: Arc::new(AtomicBool::new(false)),
        }
    }

    fn push(&self, record: Record<M>) {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(record);
    }

    pub(super) fn records(&self) -> Vec<Record<M>> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub(super) fn launched(&self) -> Vec<SurfaceId> {
        self.records()
            .into_iter()
            .filter_map(|r| match r {
                Record::Launched(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub(super) fn sent(&self) -> Vec<(SurfaceId, M)> {
        self.records()
            .into_iter()
            .filter_map(|r| match r {
                Record::Sent(id, message) => Some((id, message)),
                _ => None,
            })
            .collect()
    }

    /// Make the launcher fail every launch until told otherwise.
    pub(super) fn refuse_launches(&self, refuse: bool) {
        self.refuse_launches.store(refuse, Ordering::SeqCst);
    }
}

pub(super) struct FakeSurface<M> {
    id: SurfaceId,
    journal: Journal<M>,
}

impl<M: Clone + Debug> Surface for FakeSurface<M> {
    type Message = M;

    fn id(&self) -> SurfaceId {
        self.id
    }

    fn send(&self, message: M) -> CoreResult<()> {
        self.journal.push(Record::Sent(self.id, message));
        Ok(())
    }

    fn close(&self) {
        self.journal.push(Record::Closed(self.id));
    }
}

pub(super) struct FakeLauncher<M> {
    journal: Journal<M>,
    _message: PhantomData<M>,
}

impl<M: Clone + Debug> FakeLauncher<M> {
    pub(super) fn new() -> (Self, Journal<M>) {
        let journal = Journal::new();
        (
            Self {
                journal: journal.clone(),
                _message: PhantomData,
            },
            journal,
        )
    }
}

impl<M: Clone + Debug> SurfaceLauncher for FakeLauncher<M> {
    type Surface = FakeSurface<M>;

    fn kind(&self) -> &'static str {
        "fake"
    }

    fn launch(&mut self, id: SurfaceId) -> CoreResult<FakeSurface<M>> {
        if self.journal.refuse_launches.load(Ordering::SeqCst) {
            return Err(SurfaceError::LaunchFailed {
                reason: "refused".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        self.journal.push(Record::Launched(id));
        Ok(FakeSurface {
            id,
            journal: self.journal.clone(),
        })
    }
}

pub(super) type TestHost = Host<FakeLauncher<PlaybackMessage>, FakeLauncher<SettingsMessage>>;

pub(super) struct Fixture {
    pub(super) host: TestHost,
    pub(super) playback: Journal<PlaybackMessage>,
    pub(super) settings: Journal<SettingsMessage>,
    pub(super) actions_rx: watch::Receiver<Arc<HotkeyActions>>,
    pub(super) store: ConfigStore,
    pub(super) _dir: TempDir,
}

#[allow(clippy::unwrap_used)]
pub(super) fn fixture_with(table: Option<&BindingTable>) -> Fixture {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::new(dir.path().join("se_hotkeys_bindings.json"));
    if let Some(table) = table {
        store.save(table).unwrap();
    }

    let (registrar, actions_rx) = HotkeyRegistrar::new();
    let (playback_launcher, playback) = FakeLauncher::new();
    let (settings_launcher, settings) = FakeLauncher::new();

    let host = Host::start(store.clone(), registrar, playback_launcher, settings_launcher).unwrap();

    Fixture {
        host,
        playback,
        settings,
        actions_rx,
        store,
        _dir: dir,
    }
}

pub(super) fn slot(digit: u8) -> Slot {
    Slot::new(digit).unwrap_or(Slot::STOP)
}

pub(super) fn play(path: &str) -> PlaybackMessage {
    PlaybackMessage::Play(Some(PathBuf::from(path)))
}

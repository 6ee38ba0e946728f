use std::{
    collections::BTreeMap,
    fmt,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeMap};
use tracing::warn;

/// Number of digit slots, `0` through `9`.
pub const SLOT_COUNT: usize = 10;

/// A digit slot. Slot `0` is reserved for stopping playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(u8);

impl Slot {
    /// The stop-playback slot.
    pub const STOP: Slot = Slot(0);

    /// Slot for `digit`, if it is `0..=9`.
    pub fn new(digit: u8) -> Option<Self> {
        (usize::from(digit) < SLOT_COUNT).then_some(Self(digit))
    }

    /// All ten slots in digit order.
    pub fn all() -> impl Iterator<Item = Slot> {
        (0..SLOT_COUNT as u8).map(Slot)
    }

    /// The digit this slot stands for.
    pub fn digit(self) -> u8 {
        self.0
    }

    /// Whether this is the stop-playback slot.
    pub fn is_stop(self) -> bool {
        self == Self::STOP
    }

    fn from_key(key: &str) -> Option<Self> {
        match key.as_bytes() {
            [digit @ b'0'..=b'9'] => Self::new(digit - b'0'),
            _ => None,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sound file bound to each digit slot.
///
/// Always holds exactly ten slots. The stop slot never holds a path. Tables
/// are replaced wholesale, so there are no in-place setters.
///
/// Persisted as a JSON object keyed `"0"` to `"9"` with a path string or
/// `null` per key. When reading, missing keys load as unbound, unknown keys
/// and a path on `"0"` are dropped with a warning, and an empty path counts as
/// unbound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingTable {
    slots: [Option<PathBuf>; SLOT_COUNT],
}

impl BindingTable {
    /// Path bound to `slot`, if any.
    pub fn get(&self, slot: Slot) -> Option<&Path> {
        self.slots[usize::from(slot.digit())].as_deref()
    }

    /// A copy of this table with `slot` bound to `path`.
    ///
    /// Binding the stop slot is ignored.
    pub fn with_binding(mut self, slot: Slot, path: impl Into<PathBuf>) -> Self {
        if slot.is_stop() {
            warn!("Ignoring sound bound to the stop slot");
            return self;
        }
        let path = path.into();
        self.slots[usize::from(slot.digit())] = (!path.as_os_str().is_empty()).then_some(path);
        self
    }

    /// All slots with their bound path.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, Option<&Path>)> {
        Slot::all().map(|slot| (slot, self.get(slot)))
    }

    /// Number of slots with a sound bound.
    pub fn bound_count(&self) -> usize {
        self.slots.iter().filter(|path| path.is_some()).count()
    }

    fn from_entries(entries: BTreeMap<String, Option<PathBuf>>) -> Self {
        let mut table = Self::default();

        for (key, path) in entries {
            let Some(slot) = Slot::from_key(&key) else {
                warn!(key = %key, "Ignoring unknown binding key");
                continue;
            };

            match path {
                Some(path) if slot.is_stop() => {
                    warn!(path = ?path, "Ignoring sound bound to the stop slot");
                }
                Some(path) => table = table.with_binding(slot, path),
                None => {}
            }
        }

        table
    }
}

impl Serialize for BindingTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(SLOT_COUNT))?;
        for (slot, path) in self.iter() {
            map.serialize_entry(&slot.to_string(), &path)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for BindingTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<String, Option<PathBuf>>::deserialize(deserializer)?;
        Ok(Self::from_entries(entries))
    }
}

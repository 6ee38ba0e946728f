use crate::config::{BindingTable, SLOT_COUNT, Slot};

use std::{collections::HashMap, path::PathBuf};

use global_hotkey::hotkey::{Code, HotKey, Modifiers};

const DIGIT_CODES: [Code; SLOT_COUNT] = [
    Code::Digit0,
    Code::Digit1,
    Code::Digit2,
    Code::Digit3,
    Code::Digit4,
    Code::Digit5,
    Code::Digit6,
    Code::Digit7,
    Code::Digit8,
    Code::Digit9,
];

/// The `Shift+Ctrl+Alt+<digit>` chord for `slot`.
pub fn chord_hotkey(slot: Slot) -> HotKey {
    HotKey::new(
        Some(Modifiers::SHIFT | Modifiers::CONTROL | Modifiers::ALT),
        DIGIT_CODES[usize::from(slot.digit())],
    )
}

/// Human-readable chord name for logs.
pub fn chord_label(slot: Slot) -> String {
    format!("Shift+Ctrl+Alt+{}", slot)
}

/// What pressing a chord does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotkeyAction {
    /// Play the path captured when the bindings were applied.
    Play {
        /// Slot the chord belongs to.
        slot: Slot,
        /// Sound bound to the slot, `None` if unbound.
        path: Option<PathBuf>,
    },
    /// Stop the tracked playback.
    Stop,
}

/// Snapshot of chord actions keyed by hotkey id.
///
/// Built from a whole [`BindingTable`] and never modified afterwards.
#[derive(Debug, Clone, Default)]
pub struct HotkeyActions {
    by_id: HashMap<u32, HotkeyAction>,
}

impl HotkeyActions {
    /// One action per chord, with paths copied out of `table`.
    pub fn from_table(table: &BindingTable) -> Self {
        let by_id = Slot::all()
            .map(|slot| {
                let action = if slot.is_stop() {
                    HotkeyAction::Stop
                } else {
                    HotkeyAction::Play {
                        slot,
                        path: table.get(slot).map(PathBuf::from),
                    }
                };
                (chord_hotkey(slot).id(), action)
            })
            .collect();

        Self { by_id }
    }

    /// Action for a pressed hotkey, if it is one of ours.
    pub fn get(&self, hotkey_id: u32) -> Option<&HotkeyAction> {
        self.by_id.get(&hotkey_id)
    }

    /// Number of chords with an action.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether no chord has an action.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

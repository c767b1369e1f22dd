//! Settings synchronizer.
//!
//! Detects manual divergence between the live configuration and the preset
//! the active pointer names, and clears the pointer when they no longer
//! match. Divergence is one-directional: editing values back to the preset's
//! stored values does not re-set the pointer; only an explicit apply does.

use chrono::Utc;

use crate::events::Event;
use crate::presets::PresetStore;
use crate::timer::TimerSettings;

#[derive(Debug, Default)]
pub struct SettingsSynchronizer {
    /// Re-entrancy guard. While an apply-like operation is copying preset
    /// values into the live configuration, divergence checks are suppressed;
    /// otherwise the copy itself would be observed as an edit.
    applying: bool,
}

impl SettingsSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the guard. Callers must pair this with [`end_apply`] on every
    /// exit path, including errors.
    ///
    /// [`end_apply`]: SettingsSynchronizer::end_apply
    pub fn begin_apply(&mut self) {
        self.applying = true;
    }

    pub fn end_apply(&mut self) {
        self.applying = false;
    }

    pub fn is_applying(&self) -> bool {
        self.applying
    }

    /// Run the divergence check after an observed configuration change.
    ///
    /// Field-by-field structural comparison against the pointed-to preset;
    /// a pointer naming a preset that no longer exists counts as divergence.
    /// Returns the detach event when the pointer was cleared.
    pub fn reconcile(&self, settings: &TimerSettings, store: &mut PresetStore) -> Option<Event> {
        if self.applying {
            return None;
        }
        let id = store.active_id()?.to_string();
        let matches = store
            .get(&id)
            .map(|preset| preset.settings == *settings)
            .unwrap_or(false);
        if matches {
            return None;
        }
        log::debug!("configuration diverged from preset '{id}', clearing pointer");
        store.clear_active();
        Some(Event::PresetDetached { id, at: Utc::now() })
    }
}

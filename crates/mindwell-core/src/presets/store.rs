//! Ordered preset collection with the active-preset pointer.
//!
//! The store is only ever mutated through its operations; callers copy an
//! applied preset's settings into the engine themselves (the composition
//! layer does this, with the synchronizer's re-entrancy guard held).

use uuid::Uuid;

use super::builtin::{self, CLASSIC_ID};
use super::Preset;
use crate::error::PresetError;
use crate::timer::{DurationConfig, TimerSettings};

/// Partial update for [`PresetStore::update`]. `None` fields are untouched.
#[derive(Debug, Clone, Default)]
pub struct PresetUpdate {
    pub name: Option<String>,
    pub durations: Option<DurationConfig>,
    pub target_focus_count: Option<u32>,
    pub auto_start_rest: Option<bool>,
    pub auto_start_focus: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct PresetStore {
    presets: Vec<Preset>,
    active: Option<String>,
}

impl PresetStore {
    /// Fresh store: the three seeded presets, Classic active.
    pub fn seeded() -> Self {
        Self {
            presets: builtin::seeded_presets(),
            active: Some(CLASSIC_ID.to_string()),
        }
    }

    /// Rebuild a store from persisted parts.
    ///
    /// Any seeded preset missing from the persisted list is appended (never
    /// prepended), so user ordering of their own presets survives.
    pub fn from_parts(mut presets: Vec<Preset>, active: Option<String>) -> Self {
        for seeded in builtin::seeded_presets() {
            if !presets.iter().any(|p| p.id == seeded.id) {
                presets.push(seeded);
            }
        }
        Self { presets, active }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn get(&self, id: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_preset(&self) -> Option<&Preset> {
        self.active.as_deref().and_then(|id| self.get(id))
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Point at a preset. The caller copies the returned settings into the
    /// live configuration.
    pub fn apply(&mut self, id: &str) -> Result<&Preset, PresetError> {
        if self.get(id).is_none() {
            return Err(PresetError::NotFound(id.to_string()));
        }
        self.active = Some(id.to_string());
        Ok(self.get(id).expect("checked above"))
    }

    /// Create a preset from the current configuration and make it active.
    pub fn save_current(&mut self, name: &str, settings: &TimerSettings) -> &Preset {
        let id = Uuid::new_v4().to_string();
        let preset = Preset::new(id.clone(), name, settings.clone());
        self.presets.push(preset);
        self.active = Some(id);
        self.presets.last().expect("just pushed")
    }

    /// Merge fields into a user preset. Seeded presets are immutable.
    ///
    /// Never reapplies to the live configuration, even for the active
    /// preset; the synchronizer reconciles on the next configuration change.
    pub fn update(&mut self, id: &str, update: PresetUpdate) -> Result<(), PresetError> {
        if builtin::is_seeded(id) {
            return Err(PresetError::Immutable(id.to_string()));
        }
        let preset = self
            .presets
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| PresetError::NotFound(id.to_string()))?;

        if let Some(name) = update.name {
            preset.name = name;
        }
        if let Some(durations) = update.durations {
            preset.settings.durations = durations;
        }
        if let Some(count) = update.target_focus_count {
            preset.settings.target_focus_count = count;
        }
        if let Some(flag) = update.auto_start_rest {
            preset.settings.auto_start_rest = flag;
        }
        if let Some(flag) = update.auto_start_focus {
            preset.settings.auto_start_focus = flag;
        }
        preset.settings = preset.settings.clone().normalized();
        Ok(())
    }

    /// Remove a user preset. Deleting the active preset falls back to the
    /// first seeded preset with full apply semantics; the fallback preset is
    /// returned so the caller can copy its settings into the engine.
    pub fn delete(&mut self, id: &str) -> Result<Option<&Preset>, PresetError> {
        if builtin::is_seeded(id) {
            return Err(PresetError::Immutable(id.to_string()));
        }
        let index = self
            .presets
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| PresetError::NotFound(id.to_string()))?;
        let was_active = self.active.as_deref() == Some(id);
        self.presets.remove(index);

        if was_active {
            return self.apply(CLASSIC_ID).map(Some);
        }
        Ok(None)
    }

    /// Clear the active pointer (configuration diverged from every preset).
    pub fn clear_active(&mut self) {
        self.active = None;
    }
}

impl Default for PresetStore {
    fn default() -> Self {
        Self::seeded()
    }
}

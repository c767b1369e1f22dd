//! Composition root wiring the engine, preset store, synchronizer, and
//! persistence port together.
//!
//! The UI layer (or CLI) holds exactly one `Session` and goes through it for
//! every operation. Each mutation is persisted through the port immediately,
//! last-write-wins.

use chrono::Utc;

use crate::error::PresetError;
use crate::events::Event;
use crate::presets::{Preset, PresetStore, PresetUpdate, CLASSIC_ID};
use crate::recorder::{PlaybackControl, SessionSink};
use crate::storage::{keys, load, save, StoragePort};
use crate::sync::SettingsSynchronizer;
use crate::timer::{CountdownEngine, DurationConfig, Phase, TimerSettings, TimerState};

pub struct Session {
    engine: CountdownEngine,
    presets: PresetStore,
    synchronizer: SettingsSynchronizer,
    port: Box<dyn StoragePort>,
}

impl Session {
    /// Boot a session from persisted state.
    ///
    /// Read order: configuration first, then presets and pointer (repairing
    /// any missing seeded preset), then timer state; finally the pointer is
    /// re-validated against the live configuration.
    pub fn load(port: Box<dyn StoragePort>) -> Self {
        let settings: TimerSettings =
            load(port.as_ref(), keys::SETTINGS, TimerSettings::default()).normalized();

        let persisted: Vec<Preset> = load(port.as_ref(), keys::PRESETS, Vec::new());
        let active: Option<String> =
            load(port.as_ref(), keys::ACTIVE_PRESET, Some(CLASSIC_ID.to_string()));
        let presets = PresetStore::from_parts(persisted, active);

        let default_state = TimerState {
            phase: Phase::Focus,
            remaining_secs: settings.duration_for(Phase::Focus),
            running: false,
            focus_completed_in_cycle: 0,
        };
        let state: TimerState = load(port.as_ref(), keys::TIMER_STATE, default_state);
        let engine = CountdownEngine::restore(settings, state);

        let mut session = Self {
            engine,
            presets,
            synchronizer: SettingsSynchronizer::new(),
            port,
        };

        // A stale pointer (preset gone, or values edited before the last
        // shutdown persisted) is cleared rather than trusted.
        if session
            .synchronizer
            .reconcile(session.engine.settings(), &mut session.presets)
            .is_some()
        {
            session.persist_pointer();
        }
        session
    }

    pub fn set_recorder(&mut self, recorder: Box<dyn SessionSink>) {
        self.engine.set_recorder(recorder);
    }

    pub fn set_playback(&mut self, playback: Box<dyn PlaybackControl>) {
        self.engine.set_playback(playback);
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn engine(&self) -> &CountdownEngine {
        &self.engine
    }

    pub fn presets(&self) -> &PresetStore {
        &self.presets
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.engine.phase(),
            remaining_secs: self.engine.remaining_secs(),
            total_secs: self.engine.total_secs(),
            running: self.engine.is_running(),
            focus_completed_in_cycle: self.engine.focus_completed_in_cycle(),
            active_preset: self.presets.active_id().map(str::to_string),
            at: Utc::now(),
        }
    }

    // ── Timer commands ───────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        let event = self.engine.start();
        if event.is_some() {
            self.persist_timer_state();
        }
        event
    }

    pub fn pause(&mut self) -> Option<Event> {
        let event = self.engine.pause();
        if event.is_some() {
            self.persist_timer_state();
        }
        event
    }

    pub fn reset(&mut self) -> Event {
        let event = self.engine.reset();
        self.persist_timer_state();
        event
    }

    pub fn switch_mode(&mut self, phase: Phase) -> Event {
        let event = self.engine.switch_mode(phase);
        self.persist_timer_state();
        event
    }

    /// Drive the countdown. Call once per second while running.
    pub fn tick(&mut self) -> Option<Event> {
        let event = self.engine.tick();
        if event.is_some() {
            // Completion mutated phase, cycle count, and running state.
            self.persist_timer_state();
        }
        event
    }

    // ── Configuration edits ──────────────────────────────────────────

    pub fn set_durations(&mut self, durations: DurationConfig) -> Option<Event> {
        self.edit_settings(|s| s.durations = durations)
    }

    pub fn set_target_focus_count(&mut self, count: u32) -> Option<Event> {
        self.edit_settings(|s| s.target_focus_count = count)
    }

    pub fn set_auto_start_rest(&mut self, enabled: bool) -> Option<Event> {
        self.edit_settings(|s| s.auto_start_rest = enabled)
    }

    pub fn set_auto_start_focus(&mut self, enabled: bool) -> Option<Event> {
        self.edit_settings(|s| s.auto_start_focus = enabled)
    }

    /// Apply an edit to the standalone configuration, then let the
    /// synchronizer decide whether the active preset detaches. Returns the
    /// detach event if it did.
    fn edit_settings(&mut self, edit: impl FnOnce(&mut TimerSettings)) -> Option<Event> {
        let mut settings = self.engine.settings().clone();
        edit(&mut settings);
        self.engine.apply_settings(settings);

        let detached = self
            .synchronizer
            .reconcile(self.engine.settings(), &mut self.presets);

        self.persist_settings();
        self.persist_timer_state();
        if detached.is_some() {
            self.persist_pointer();
        }
        detached
    }

    // ── Preset operations ────────────────────────────────────────────

    /// Apply a preset: point at it and copy its values into the live
    /// configuration. Reseeds the current phase when the timer is paused.
    pub fn apply_preset(&mut self, id: &str) -> Result<Event, PresetError> {
        self.synchronizer.begin_apply();
        let applied = self
            .presets
            .apply(id)
            .map(|p| (p.settings.clone(), p.name.clone()));
        self.synchronizer.end_apply();

        let (settings, name) = match applied {
            Ok(parts) => parts,
            Err(e) => {
                log::warn!("apply failed: {e}");
                return Err(e);
            }
        };
        self.engine.apply_settings(settings);

        self.persist_settings();
        self.persist_timer_state();
        self.persist_presets();
        Ok(Event::PresetApplied {
            id: id.to_string(),
            name,
            at: Utc::now(),
        })
    }

    /// Save the current configuration as a new preset and make it active.
    /// Returns the fresh preset id.
    pub fn save_preset(&mut self, name: &str) -> String {
        self.synchronizer.begin_apply();
        let settings = self.engine.settings().clone();
        let id = self.presets.save_current(name, &settings).id.clone();
        self.synchronizer.end_apply();

        self.persist_presets();
        id
    }

    /// Merge fields into a stored preset. Seeded presets are immutable:
    /// the attempt is logged and dropped, never surfaced as an error.
    pub fn update_preset(&mut self, id: &str, update: PresetUpdate) -> Result<(), PresetError> {
        match self.presets.update(id, update) {
            Ok(()) => {
                self.persist_presets();
                Ok(())
            }
            Err(PresetError::Immutable(id)) => {
                log::warn!("ignoring edit of seeded preset '{id}'");
                Ok(())
            }
            Err(e) => {
                log::warn!("preset update failed: {e}");
                Err(e)
            }
        }
    }

    pub fn rename_preset(&mut self, id: &str, name: &str) -> Result<(), PresetError> {
        self.update_preset(
            id,
            PresetUpdate {
                name: Some(name.to_string()),
                ..PresetUpdate::default()
            },
        )
    }

    /// Delete a user preset. Deleting the active preset reapplies the first
    /// seeded preset end to end. Seeded presets are immutable (warn-and-drop).
    pub fn delete_preset(&mut self, id: &str) -> Result<(), PresetError> {
        self.synchronizer.begin_apply();
        let result = self.presets.delete(id).map(|f| f.map(|p| p.settings.clone()));
        self.synchronizer.end_apply();

        match result {
            Ok(fallback) => {
                if let Some(settings) = fallback {
                    self.engine.apply_settings(settings);
                    self.persist_settings();
                    self.persist_timer_state();
                }
                self.persist_presets();
                Ok(())
            }
            Err(PresetError::Immutable(id)) => {
                log::warn!("ignoring delete of seeded preset '{id}'");
                Ok(())
            }
            Err(e) => {
                log::warn!("preset delete failed: {e}");
                Err(e)
            }
        }
    }

    // ── Persistence ──────────────────────────────────────────────────

    fn persist_timer_state(&mut self) {
        save(self.port.as_mut(), keys::TIMER_STATE, self.engine.state());
    }

    fn persist_settings(&mut self) {
        save(self.port.as_mut(), keys::SETTINGS, self.engine.settings());
    }

    fn persist_pointer(&mut self) {
        let active = self.presets.active_id().map(str::to_string);
        save(self.port.as_mut(), keys::ACTIVE_PRESET, &active);
    }

    fn persist_presets(&mut self) {
        let list: Vec<Preset> = self.presets.presets().to_vec();
        save(self.port.as_mut(), keys::PRESETS, &list);
        self.persist_pointer();
    }
}

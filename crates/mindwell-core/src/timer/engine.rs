//! Countdown engine implementation.
//!
//! The engine is a tick-driven state machine. It does not use internal
//! threads -- the caller is responsible for calling `tick()` once per second
//! while the timer is running.
//!
//! ## State Transitions
//!
//! ```text
//! {Focus, ShortRest, LongRest} x {Running, Paused}
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = CountdownEngine::new(TimerSettings::default());
//! engine.start();
//! // Once per second:
//! engine.tick(); // Returns Some(Event::PhaseCompleted) on natural expiry
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::settings::{Phase, TimerSettings};
use crate::events::Event;
use crate::recorder::{NullSink, PlaybackControl, SessionSink};

/// Serializable timer state, owned exclusively by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub phase: Phase,
    pub remaining_secs: u64,
    pub running: bool,
    /// Focus phases completed since the last long rest.
    pub focus_completed_in_cycle: u32,
}

impl TimerState {
    fn seeded(settings: &TimerSettings) -> Self {
        Self {
            phase: Phase::Focus,
            remaining_secs: settings.duration_for(Phase::Focus),
            running: false,
            focus_completed_in_cycle: 0,
        }
    }
}

/// Core countdown engine.
///
/// Collaborators are injected at construction; the defaults are no-ops so
/// the engine is usable standalone.
pub struct CountdownEngine {
    settings: TimerSettings,
    state: TimerState,
    recorder: Box<dyn SessionSink>,
    playback: Box<dyn PlaybackControl>,
}

impl CountdownEngine {
    /// Create a new engine, paused at the start of a Focus phase.
    pub fn new(settings: TimerSettings) -> Self {
        let settings = settings.normalized();
        let state = TimerState::seeded(&settings);
        Self {
            settings,
            state,
            recorder: Box::new(NullSink),
            playback: Box::new(NullSink),
        }
    }

    /// Restore an engine from persisted state.
    ///
    /// The timer always comes back paused (no clock ran while the process
    /// was down) and `remaining_secs` is clamped to the configured duration
    /// of the restored phase.
    pub fn restore(settings: TimerSettings, state: TimerState) -> Self {
        let settings = settings.normalized();
        let full = settings.duration_for(state.phase);
        let state = TimerState {
            running: false,
            remaining_secs: state.remaining_secs.min(full),
            ..state
        };
        Self {
            settings,
            state,
            recorder: Box::new(NullSink),
            playback: Box::new(NullSink),
        }
    }

    pub fn set_recorder(&mut self, recorder: Box<dyn SessionSink>) {
        self.recorder = recorder;
    }

    pub fn set_playback(&mut self, playback: Box<dyn PlaybackControl>) {
        self.playback = playback;
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.state.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn focus_completed_in_cycle(&self) -> u32 {
        self.state.focus_completed_in_cycle
    }

    /// Full configured duration of the current phase.
    pub fn total_secs(&self) -> u64 {
        self.settings.duration_for(self.state.phase)
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.state.remaining_secs as f64 / total as f64)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.state.running {
            return None; // Already running.
        }
        if self.state.remaining_secs == 0 {
            // A spent phase must be reseeded before it can run again.
            self.reseed();
        }
        self.state.running = true;
        Some(Event::TimerStarted {
            phase: self.state.phase,
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Idempotent: pausing a paused timer is a no-op.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.state.running {
            return None;
        }
        self.state.running = false;
        Some(Event::TimerPaused {
            phase: self.state.phase,
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Stop and reseed the current phase. The phase itself never changes.
    pub fn reset(&mut self) -> Event {
        self.state.running = false;
        self.reseed();
        Event::TimerReset {
            phase: self.state.phase,
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Manual phase change (mode tab click). Always stops the clock and
    /// reseeds for the target phase. `focus_completed_in_cycle` is untouched.
    pub fn switch_mode(&mut self, phase: Phase) -> Event {
        self.state.running = false;
        self.state.phase = phase;
        self.reseed();
        Event::ModeSwitched {
            phase,
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Call once per second while running.
    ///
    /// A stale queued tick that fires after `pause()`/`reset()` is a no-op:
    /// the running flag is checked at fire time.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.state.running {
            return None;
        }
        self.state.remaining_secs = self.state.remaining_secs.saturating_sub(1);
        if self.state.remaining_secs > 0 {
            return None;
        }
        Some(self.complete())
    }

    /// Replace the live settings.
    ///
    /// While paused this also reseeds the current phase so the display
    /// reflects the new duration; a running countdown is never disturbed.
    pub fn apply_settings(&mut self, settings: TimerSettings) {
        self.settings = settings.normalized();
        if !self.state.running {
            self.reseed();
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// On-completion sequence. Fires exactly once per natural expiry; the
    /// clock is stopped before any side effect runs and only re-armed at the
    /// end, so two completions can never interleave.
    fn complete(&mut self) -> Event {
        self.state.running = false;
        let completed = self.state.phase;

        let (next, auto_started) = match completed {
            Phase::Focus => {
                self.state.focus_completed_in_cycle += 1;
                let minutes = self.settings.durations.focus_secs / 60;
                if let Err(e) = self.recorder.record_focus_complete(minutes) {
                    log::warn!("session recorder failed, continuing: {e}");
                }
                let next = if self.state.focus_completed_in_cycle >= self.settings.target_focus_count
                {
                    Phase::LongRest
                } else {
                    Phase::ShortRest
                };
                (next, self.settings.auto_start_rest)
            }
            Phase::ShortRest => {
                // Short rests do not reset the cycle count; it must survive
                // until the long rest that marks the cycle boundary.
                if let Err(e) = self.recorder.record_rest_complete() {
                    log::warn!("session recorder failed, continuing: {e}");
                }
                (Phase::Focus, self.settings.auto_start_focus)
            }
            Phase::LongRest => {
                if let Err(e) = self.recorder.record_rest_complete() {
                    log::warn!("session recorder failed, continuing: {e}");
                }
                self.state.focus_completed_in_cycle = 0;
                (Phase::Focus, self.settings.auto_start_focus)
            }
        };

        if let Err(e) = self.playback.pause_playback() {
            log::warn!("failed to pause playback: {e}");
        }

        // Arm the next phase eagerly so the display shows what comes next,
        // even when it does not auto-start.
        self.state.phase = next;
        self.state.remaining_secs = self.settings.duration_for(next);
        self.state.running = auto_started;

        Event::PhaseCompleted {
            completed,
            next,
            focus_completed_in_cycle: self.state.focus_completed_in_cycle,
            auto_started,
            at: Utc::now(),
        }
    }

    fn reseed(&mut self) {
        self.state.remaining_secs = self.settings.duration_for(self.state.phase);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::{SessionStats, SinkError};
    use crate::timer::DurationConfig;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn short_settings() -> TimerSettings {
        TimerSettings {
            durations: DurationConfig::new(3, 2, 4),
            target_focus_count: 2,
            auto_start_rest: false,
            auto_start_focus: false,
        }
    }

    fn run_to_completion(engine: &mut CountdownEngine) -> Event {
        engine.start();
        loop {
            if let Some(event) = engine.tick() {
                return event;
            }
        }
    }

    #[test]
    fn start_pause_are_idempotent_edges() {
        let mut engine = CountdownEngine::new(short_settings());
        assert!(!engine.is_running());

        assert!(engine.start().is_some());
        assert!(engine.is_running());
        assert!(engine.start().is_none());

        assert!(engine.pause().is_some());
        assert!(!engine.is_running());
        assert!(engine.pause().is_none());
    }

    #[test]
    fn tick_decrements_by_one_while_running() {
        let mut engine = CountdownEngine::new(short_settings());
        engine.start();
        assert_eq!(engine.remaining_secs(), 3);
        assert!(engine.tick().is_none());
        assert_eq!(engine.remaining_secs(), 2);
        assert!(engine.tick().is_none());
        assert_eq!(engine.remaining_secs(), 1);
    }

    #[test]
    fn stale_tick_after_pause_is_noop() {
        let mut engine = CountdownEngine::new(short_settings());
        engine.start();
        engine.tick();
        engine.pause();
        let before = engine.remaining_secs();
        assert!(engine.tick().is_none());
        assert_eq!(engine.remaining_secs(), before);
    }

    #[test]
    fn reset_reseeds_current_phase_and_stops() {
        let mut engine = CountdownEngine::new(short_settings());
        engine.switch_mode(Phase::ShortRest);
        engine.start();
        engine.tick();
        let event = engine.reset();
        assert!(!engine.is_running());
        assert_eq!(engine.phase(), Phase::ShortRest);
        assert_eq!(engine.remaining_secs(), 2);
        assert!(matches!(event, Event::TimerReset { .. }));
    }

    #[test]
    fn switch_mode_stops_and_reseeds_without_touching_cycle() {
        let mut engine = CountdownEngine::new(short_settings());
        run_to_completion(&mut engine);
        assert_eq!(engine.focus_completed_in_cycle(), 1);

        let event = engine.switch_mode(Phase::LongRest);
        assert!(!engine.is_running());
        assert_eq!(engine.phase(), Phase::LongRest);
        assert_eq!(engine.remaining_secs(), 4);
        assert_eq!(engine.focus_completed_in_cycle(), 1);
        assert!(matches!(event, Event::ModeSwitched { .. }));
    }

    #[test]
    fn focus_completion_advances_to_short_rest_paused() {
        let mut engine = CountdownEngine::new(short_settings());
        let event = run_to_completion(&mut engine);
        match event {
            Event::PhaseCompleted {
                completed,
                next,
                focus_completed_in_cycle,
                auto_started,
                ..
            } => {
                assert_eq!(completed, Phase::Focus);
                assert_eq!(next, Phase::ShortRest);
                assert_eq!(focus_completed_in_cycle, 1);
                assert!(!auto_started);
            }
            other => panic!("expected PhaseCompleted, got {other:?}"),
        }
        // Phase advanced eagerly, reseeded, but not running.
        assert_eq!(engine.phase(), Phase::ShortRest);
        assert_eq!(engine.remaining_secs(), 2);
        assert!(!engine.is_running());
    }

    #[test]
    fn nth_focus_completion_goes_to_long_rest() {
        let mut engine = CountdownEngine::new(short_settings());
        // 1st focus -> short rest -> focus.
        run_to_completion(&mut engine);
        run_to_completion(&mut engine);
        assert_eq!(engine.phase(), Phase::Focus);
        assert_eq!(engine.focus_completed_in_cycle(), 1);

        // 2nd focus hits target_focus_count = 2.
        let event = run_to_completion(&mut engine);
        match event {
            Event::PhaseCompleted { next, .. } => assert_eq!(next, Phase::LongRest),
            other => panic!("expected PhaseCompleted, got {other:?}"),
        }
        assert_eq!(engine.phase(), Phase::LongRest);
    }

    #[test]
    fn long_rest_completion_resets_cycle_count() {
        let mut engine = CountdownEngine::new(short_settings());
        run_to_completion(&mut engine); // focus 1
        run_to_completion(&mut engine); // short rest
        run_to_completion(&mut engine); // focus 2 -> long rest
        assert_eq!(engine.focus_completed_in_cycle(), 2);

        run_to_completion(&mut engine); // long rest
        assert_eq!(engine.focus_completed_in_cycle(), 0);
        assert_eq!(engine.phase(), Phase::Focus);
    }

    #[test]
    fn short_rest_completion_keeps_cycle_count() {
        let mut engine = CountdownEngine::new(short_settings());
        run_to_completion(&mut engine); // focus 1 -> short rest
        run_to_completion(&mut engine); // short rest -> focus
        assert_eq!(engine.focus_completed_in_cycle(), 1);
    }

    #[test]
    fn auto_start_flags_arm_the_next_phase() {
        let settings = TimerSettings {
            auto_start_rest: true,
            auto_start_focus: true,
            ..short_settings()
        };
        let mut engine = CountdownEngine::new(settings);
        engine.start();
        while engine.tick().is_none() {}
        assert_eq!(engine.phase(), Phase::ShortRest);
        assert!(engine.is_running());

        while engine.tick().is_none() {}
        assert_eq!(engine.phase(), Phase::Focus);
        assert!(engine.is_running());
    }

    #[test]
    fn start_with_spent_phase_reseeds_first() {
        let state = TimerState {
            phase: Phase::Focus,
            remaining_secs: 0,
            running: false,
            focus_completed_in_cycle: 0,
        };
        let mut engine = CountdownEngine::restore(short_settings(), state);
        assert_eq!(engine.remaining_secs(), 0);
        assert!(engine.start().is_some());
        assert!(engine.is_running());
        assert_eq!(engine.remaining_secs(), 3);
    }

    #[test]
    fn recorder_receives_focus_minutes() {
        let stats = Rc::new(RefCell::new(SessionStats::new()));
        let settings = TimerSettings {
            durations: DurationConfig::new(120, 2, 4),
            ..short_settings()
        };
        let mut engine = CountdownEngine::new(settings);
        engine.set_recorder(Box::new(Rc::clone(&stats)));

        engine.start();
        while engine.tick().is_none() {}
        assert_eq!(stats.borrow().focus_sessions, 1);
        assert_eq!(stats.borrow().focus_minutes, 2);

        engine.start();
        while engine.tick().is_none() {}
        assert_eq!(stats.borrow().rests_completed, 1);
    }

    struct FailingSink;

    impl SessionSink for FailingSink {
        fn record_focus_complete(&mut self, _m: u64) -> Result<(), SinkError> {
            Err("recorder down".into())
        }
        fn record_rest_complete(&mut self) -> Result<(), SinkError> {
            Err("recorder down".into())
        }
    }

    impl crate::recorder::PlaybackControl for FailingSink {
        fn pause_playback(&mut self) -> Result<(), SinkError> {
            Err("player gone".into())
        }
    }

    #[test]
    fn failing_collaborators_never_block_advancement() {
        let mut engine = CountdownEngine::new(short_settings());
        engine.set_recorder(Box::new(FailingSink));
        engine.set_playback(Box::new(FailingSink));

        let event = run_to_completion(&mut engine);
        assert!(matches!(event, Event::PhaseCompleted { .. }));
        assert_eq!(engine.phase(), Phase::ShortRest);
        assert_eq!(engine.remaining_secs(), 2);
    }

    #[test]
    fn apply_settings_reseeds_only_while_paused() {
        let mut engine = CountdownEngine::new(short_settings());
        let longer = TimerSettings {
            durations: DurationConfig::new(10, 2, 4),
            ..short_settings()
        };
        engine.apply_settings(longer.clone());
        assert_eq!(engine.remaining_secs(), 10);

        engine.start();
        engine.tick();
        let even_longer = TimerSettings {
            durations: DurationConfig::new(60, 2, 4),
            ..short_settings()
        };
        engine.apply_settings(even_longer);
        // Running countdown undisturbed.
        assert_eq!(engine.remaining_secs(), 9);
    }

    #[test]
    fn restore_comes_back_paused_and_clamped() {
        let settings = short_settings();
        let state = TimerState {
            phase: Phase::Focus,
            remaining_secs: 999,
            running: true,
            focus_completed_in_cycle: 1,
        };
        let engine = CountdownEngine::restore(settings, state);
        assert!(!engine.is_running());
        assert_eq!(engine.remaining_secs(), 3);
        assert_eq!(engine.focus_completed_in_cycle(), 1);
    }

    proptest! {
        // Monotonic countdown: n ticks remove exactly n seconds until expiry.
        #[test]
        fn countdown_is_monotonic(duration in 2u64..600, ticks in 1u64..600) {
            let settings = TimerSettings {
                durations: DurationConfig::new(duration, 2, 4),
                ..short_settings()
            };
            let mut engine = CountdownEngine::new(settings);
            engine.start();
            let mut completions = 0;
            for _ in 0..ticks.min(duration) {
                if engine.tick().is_some() {
                    completions += 1;
                }
            }
            if ticks >= duration {
                prop_assert_eq!(completions, 1);
            } else {
                prop_assert_eq!(completions, 0);
                prop_assert_eq!(engine.remaining_secs(), duration - ticks);
            }
        }

        // Pause stops time: ticks while paused never change remaining.
        #[test]
        fn paused_timer_ignores_ticks(duration in 2u64..600, ticks in 1u64..100) {
            let settings = TimerSettings {
                durations: DurationConfig::new(duration, 2, 4),
                ..short_settings()
            };
            let mut engine = CountdownEngine::new(settings);
            engine.start();
            engine.tick();
            engine.pause();
            let before = engine.remaining_secs();
            for _ in 0..ticks {
                prop_assert!(engine.tick().is_none());
            }
            prop_assert_eq!(engine.remaining_secs(), before);
        }
    }
}

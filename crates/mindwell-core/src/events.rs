use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every observable state change in the core produces an Event.
/// The UI layer polls or subscribes; the CLI prints them as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Manual mode-tab change. Never fires on natural expiry.
    ModeSwitched {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A phase ran down to zero. The next phase is already armed and
    /// may or may not be running depending on the auto-start flags.
    PhaseCompleted {
        completed: Phase,
        next: Phase,
        focus_completed_in_cycle: u32,
        auto_started: bool,
        at: DateTime<Utc>,
    },
    PresetApplied {
        id: String,
        name: String,
        at: DateTime<Utc>,
    },
    /// The live configuration diverged from the active preset and the
    /// pointer was cleared.
    PresetDetached {
        id: String,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        remaining_secs: u64,
        total_secs: u64,
        running: bool,
        focus_completed_in_cycle: u32,
        active_preset: Option<String>,
        at: DateTime<Utc>,
    },
}

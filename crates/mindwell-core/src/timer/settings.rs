use serde::{Deserialize, Serialize};

/// The purpose of the current countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Focus,
    ShortRest,
    LongRest,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Focus => "Focus",
            Phase::ShortRest => "Short Rest",
            Phase::LongRest => "Long Rest",
        }
    }
}

/// Named phase lengths in whole seconds.
///
/// All three values must be positive; [`DurationConfig::normalized`] clamps
/// anything below one second up to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationConfig {
    pub focus_secs: u64,
    pub short_rest_secs: u64,
    pub long_rest_secs: u64,
}

impl DurationConfig {
    pub fn new(focus_secs: u64, short_rest_secs: u64, long_rest_secs: u64) -> Self {
        Self {
            focus_secs,
            short_rest_secs,
            long_rest_secs,
        }
        .normalized()
    }

    /// Clamp every phase length to at least one second.
    pub fn normalized(self) -> Self {
        Self {
            focus_secs: self.focus_secs.max(1),
            short_rest_secs: self.short_rest_secs.max(1),
            long_rest_secs: self.long_rest_secs.max(1),
        }
    }

    pub fn for_phase(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Focus => self.focus_secs,
            Phase::ShortRest => self.short_rest_secs,
            Phase::LongRest => self.long_rest_secs,
        }
    }
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self {
            focus_secs: default_focus_secs(),
            short_rest_secs: default_short_rest_secs(),
            long_rest_secs: default_long_rest_secs(),
        }
    }
}

/// The standalone editable configuration the engine reads from.
///
/// Applying a preset copies the preset's values into this struct, so the
/// engine always has exactly one source of truth for durations and cycle
/// parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    #[serde(default)]
    pub durations: DurationConfig,
    /// Focus phases per cycle before a long rest.
    #[serde(default = "default_target_focus_count")]
    pub target_focus_count: u32,
    #[serde(default = "default_true")]
    pub auto_start_rest: bool,
    #[serde(default = "default_true")]
    pub auto_start_focus: bool,
}

impl TimerSettings {
    /// Clamp durations and the focus target into their valid ranges.
    pub fn normalized(self) -> Self {
        Self {
            durations: self.durations.normalized(),
            target_focus_count: self.target_focus_count.max(1),
            ..self
        }
    }

    pub fn duration_for(&self, phase: Phase) -> u64 {
        self.durations.for_phase(phase)
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            durations: DurationConfig::default(),
            target_focus_count: default_target_focus_count(),
            auto_start_rest: true,
            auto_start_focus: true,
        }
    }
}

// Default functions
fn default_focus_secs() -> u64 {
    25 * 60
}
fn default_short_rest_secs() -> u64 {
    5 * 60
}
fn default_long_rest_secs() -> u64 {
    15 * 60
}
fn default_target_focus_count() -> u32 {
    4
}
fn default_true() -> bool {
    true
}

mod builtin;
mod store;

pub use builtin::{is_seeded, seeded_ids, seeded_presets, CLASSIC_ID, DEEP_WORK_ID, SPRINT_ID};
pub use store::{PresetStore, PresetUpdate};

use serde::{Deserialize, Serialize};

use crate::timer::TimerSettings;

/// A named, reusable bundle of durations and cycle parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub settings: TimerSettings,
}

impl Preset {
    pub fn new(id: impl Into<String>, name: impl Into<String>, settings: TimerSettings) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            settings: settings.normalized(),
        }
    }

    /// Whether this is one of the three built-in presets.
    pub fn is_seeded(&self) -> bool {
        builtin::is_seeded(&self.id)
    }
}

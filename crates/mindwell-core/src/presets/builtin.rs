//! The three seeded presets shipped by default.
//!
//! Seeded presets always exist, cannot be renamed or deleted, and anchor the
//! fallback path when the active user preset disappears.

use super::Preset;
use crate::timer::{DurationConfig, TimerSettings};

pub const CLASSIC_ID: &str = "classic";
pub const DEEP_WORK_ID: &str = "deep-work";
pub const SPRINT_ID: &str = "sprint";

/// Returns the seeded presets in their canonical order.
pub fn seeded_presets() -> Vec<Preset> {
    vec![classic(), deep_work(), sprint()]
}

pub fn seeded_ids() -> [&'static str; 3] {
    [CLASSIC_ID, DEEP_WORK_ID, SPRINT_ID]
}

pub fn is_seeded(id: &str) -> bool {
    seeded_ids().contains(&id)
}

/// The traditional 25/5/15 pomodoro split.
fn classic() -> Preset {
    Preset::new(
        CLASSIC_ID,
        "Classic",
        TimerSettings {
            durations: DurationConfig::new(25 * 60, 5 * 60, 15 * 60),
            target_focus_count: 4,
            auto_start_rest: true,
            auto_start_focus: true,
        },
    )
}

/// Long focus blocks for cognitively demanding work.
fn deep_work() -> Preset {
    Preset::new(
        DEEP_WORK_ID,
        "Deep Work",
        TimerSettings {
            durations: DurationConfig::new(50 * 60, 10 * 60, 30 * 60),
            target_focus_count: 3,
            auto_start_rest: true,
            auto_start_focus: false,
        },
    )
}

/// Short cycles for quick tasks and warm-ups.
fn sprint() -> Preset {
    Preset::new(
        SPRINT_ID,
        "Sprint",
        TimerSettings {
            durations: DurationConfig::new(15 * 60, 3 * 60, 10 * 60),
            target_focus_count: 4,
            auto_start_rest: true,
            auto_start_focus: true,
        },
    )
}

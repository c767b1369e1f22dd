mod engine;
mod settings;

pub use engine::{CountdownEngine, TimerState};
pub use settings::{DurationConfig, Phase, TimerSettings};

//! # Mindwell Core Library
//!
//! Core business logic for the Mindwell focus timer: the countdown engine,
//! preset management, settings synchronization, and persistence. The CLI
//! binary and any GUI shell are thin layers over this crate.
//!
//! ## Architecture
//!
//! - **Countdown Engine**: a tick-driven state machine; the caller invokes
//!   `tick()` once per second while the timer runs
//! - **Preset Store**: named duration/cycle bundles with three immutable
//!   seeded presets and an active-preset pointer
//! - **Settings Synchronizer**: clears the pointer when the live
//!   configuration is edited away from the active preset
//! - **Persistence Port**: best-effort JSON key-value storage; reads never
//!   fail (they fall back to defaults) and writes never surface errors
//!
//! ## Key Components
//!
//! - [`CountdownEngine`]: core timer state machine
//! - [`Session`]: composition root the embedding layer holds
//! - [`PresetStore`]: preset collection and active pointer
//! - [`StoragePort`]: persistence seam

pub mod error;
pub mod events;
pub mod presets;
pub mod recorder;
pub mod session;
pub mod storage;
pub mod sync;
pub mod timer;

pub use error::{CoreError, PresetError, Result};
pub use events::Event;
pub use presets::{Preset, PresetStore, PresetUpdate};
pub use recorder::{NullSink, PlaybackControl, SessionSink, SessionStats};
pub use session::Session;
pub use storage::{FileStore, MemoryStore, StoragePort};
pub use sync::SettingsSynchronizer;
pub use timer::{CountdownEngine, DurationConfig, Phase, TimerSettings, TimerState};

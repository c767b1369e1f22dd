//! Collaborator seams for phase-completion side effects.
//!
//! The engine reports completed phases to a [`SessionSink`] and asks a
//! [`PlaybackControl`] to pause music on every natural expiry. Both are
//! best-effort: a failing collaborator is logged by the engine and never
//! blocks phase advancement.

use serde::{Deserialize, Serialize};

/// Boxed error for collaborator failures. The engine only logs these.
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// Receives phase-completion events for analytics aggregation.
pub trait SessionSink {
    fn record_focus_complete(&mut self, duration_minutes: u64) -> Result<(), SinkError>;
    fn record_rest_complete(&mut self) -> Result<(), SinkError>;
}

/// Music-player collaborator. Pausing is fire-and-forget.
pub trait PlaybackControl {
    fn pause_playback(&mut self) -> Result<(), SinkError>;
}

/// Default no-op collaborator used when nothing is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl SessionSink for NullSink {
    fn record_focus_complete(&mut self, _duration_minutes: u64) -> Result<(), SinkError> {
        Ok(())
    }

    fn record_rest_complete(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl PlaybackControl for NullSink {
    fn pause_playback(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Simple in-memory aggregate of recorded completions.
///
/// Serializable so the CLI can persist it between invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub focus_sessions: u32,
    pub focus_minutes: u64,
    pub rests_completed: u32,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Shared handle so a caller can keep reading the aggregate while the
/// engine owns the sink. The core is single-threaded by design.
impl SessionSink for std::rc::Rc<std::cell::RefCell<SessionStats>> {
    fn record_focus_complete(&mut self, duration_minutes: u64) -> Result<(), SinkError> {
        self.borrow_mut().record_focus_complete(duration_minutes)
    }

    fn record_rest_complete(&mut self) -> Result<(), SinkError> {
        self.borrow_mut().record_rest_complete()
    }
}

impl SessionSink for SessionStats {
    fn record_focus_complete(&mut self, duration_minutes: u64) -> Result<(), SinkError> {
        self.focus_sessions += 1;
        self.focus_minutes += duration_minutes;
        Ok(())
    }

    fn record_rest_complete(&mut self) -> Result<(), SinkError> {
        self.rests_completed += 1;
        Ok(())
    }
}

//! Dictation capability interface.
//!
//! Speech recognition is an optional, externally owned capability: the
//! engine is probed explicitly rather than looked up dynamically, and a
//! listening session is a handle with explicit stop/cancel. At most one
//! session is active at a time. Listening is fully decoupled from the
//! submit flow: stopping dictation never cancels an in-flight submission
//! and vice versa.

use std::sync::Arc;
use tokio::sync::mpsc;

/// Result of probing the engine before offering the feature in the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable { reason: String },
}

/// Events emitted by a listening session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictationEvent {
    /// A recognized speech segment, ready to append to the note text.
    Segment(String),
    /// The session finished (engine end-of-speech or explicit stop).
    Ended,
    /// The engine failed mid-session.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DictationError {
    #[error("speech recognition is not available: {reason}")]
    Unavailable { reason: String },

    #[error("a dictation session is already listening")]
    AlreadyListening,

    #[error("dictation engine failure: {0}")]
    Engine(String),
}

/// A speech-recognition engine. Implementations are externally owned;
/// the TUI only ever talks to this trait.
pub trait DictationCapability: Send + Sync {
    /// Probe whether the engine can listen at all.
    fn availability(&self) -> Availability;

    /// Begin a listening session. Recognized segments flow into `sink`
    /// until the session ends, fails, or is stopped.
    fn begin(
        &self,
        locale: &str,
        sink: mpsc::UnboundedSender<DictationEvent>,
    ) -> Result<Box<dyn DictationSession>, DictationError>;
}

/// Handle to one active listening session.
pub trait DictationSession: Send {
    /// Finish gracefully: the engine flushes any final segment, then
    /// emits `Ended`.
    fn stop(self: Box<Self>);

    /// Discard: no further segments are emitted.
    fn cancel(self: Box<Self>);
}

// ============================================================================
// CONTROLLER
// ============================================================================

/// Owns the capability and enforces the one-active-session rule.
pub struct DictationController {
    capability: Arc<dyn DictationCapability>,
    locale: String,
    active: Option<Box<dyn DictationSession>>,
}

impl DictationController {
    pub fn new(capability: Arc<dyn DictationCapability>, locale: impl Into<String>) -> Self {
        Self {
            capability,
            locale: locale.into(),
            active: None,
        }
    }

    pub fn availability(&self) -> Availability {
        self.capability.availability()
    }

    pub fn is_listening(&self) -> bool {
        self.active.is_some()
    }

    /// Start listening. Errors if a session is already active or the
    /// engine is unavailable.
    pub fn start(
        &mut self,
        sink: mpsc::UnboundedSender<DictationEvent>,
    ) -> Result<(), DictationError> {
        if self.active.is_some() {
            return Err(DictationError::AlreadyListening);
        }

        let session = self.capability.begin(&self.locale, sink)?;
        self.active = Some(session);
        Ok(())
    }

    /// Stop gracefully, flushing any final segment.
    pub fn stop(&mut self) {
        if let Some(session) = self.active.take() {
            session.stop();
        }
    }

    /// Cancel, discarding pending speech.
    pub fn cancel(&mut self) {
        if let Some(session) = self.active.take() {
            session.cancel();
        }
    }

    /// The engine reported the session over; drop our handle.
    pub fn session_ended(&mut self) {
        self.active = None;
    }
}

// ============================================================================
// NULL IMPLEMENTATION
// ============================================================================

/// Stand-in when no speech engine is configured. Probes as unavailable
/// and refuses to begin a session.
pub struct NullDictation;

impl DictationCapability for NullDictation {
    fn availability(&self) -> Availability {
        Availability::Unavailable {
            reason: "no speech engine configured".to_string(),
        }
    }

    fn begin(
        &self,
        _locale: &str,
        _sink: mpsc::UnboundedSender<DictationEvent>,
    ) -> Result<Box<dyn DictationSession>, DictationError> {
        Err(DictationError::Unavailable {
            reason: "no speech engine configured".to_string(),
        })
    }
}

//! Event types for the TUI event loop.

use crate::dictation::DictationEvent;
use crate::search::SearchSeq;
use crossterm::event::KeyEvent;
use parley_api::types::ClientSummary;

#[derive(Debug, Clone)]
pub enum TuiEvent {
    Input(KeyEvent),
    Tick,
    Resize { width: u16, height: u16 },
    /// The debounce timer for one search generation fired.
    DebounceElapsed { seq: SearchSeq },
    /// A dispatched search resolved. Carries the token it was issued under.
    SearchCompleted {
        seq: SearchSeq,
        result: Result<Vec<ClientSummary>, String>,
    },
    /// The in-flight submission resolved.
    SubmitCompleted { result: Result<String, String> },
    Dictation(DictationEvent),
}

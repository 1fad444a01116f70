//! Application state and the session state machine.
//!
//! Phase progression:
//! `Idle -> Searching -> ResultsShown -> Selected -> Composing -> Submitting -> (Idle | Error)`
//!
//! All transitions are synchronous methods on [`App`]; anything that needs
//! I/O is returned to the event loop as an [`Effect`] so the state machine
//! stays deterministic and directly testable.

use crate::dictation::{DictationController, DictationEvent};
use crate::keys::Action;
use crate::notifications::{Notification, NotificationLevel};
use crate::search::{SearchSeq, SearchSequence};
use crate::theme::Theme;
use parley_api::types::ClientSummary;
use parley_core::PartyId;

// ============================================================================
// PHASES AND SIDE EFFECTS
// ============================================================================

/// Where the session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Searching,
    ResultsShown,
    Selected,
    Composing,
    Submitting,
    Error,
}

/// I/O the event loop must perform on behalf of a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start (or restart) the debounce timer for this token.
    ScheduleDebounce { seq: SearchSeq },
    /// Fire the HTTP search for this token.
    DispatchSearch { seq: SearchSeq, query: String },
    /// Fire the HTTP submission.
    Submit(SubmitRequest),
    ToggleDictation,
    CancelDictation,
    Quit,
}

/// The two submission shapes the composer can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRequest {
    /// Note attached directly to the client.
    Comment { client_id: PartyId, comment: String },
    /// New project plus its first note.
    ProjectWithNote {
        client_id: PartyId,
        project_name: String,
        note_content: String,
    },
}

// ============================================================================
// VIEW STATE
// ============================================================================

#[derive(Debug, Default)]
pub struct SearchState {
    pub input: String,
    pub results: Vec<ClientSummary>,
    pub highlighted: usize,
    sequence: SearchSequence,
}

/// Which composer field receives typed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerFocus {
    Note,
    ProjectName,
}

#[derive(Debug)]
pub struct ComposerState {
    pub note: String,
    pub project_name: String,
    pub focus: ComposerFocus,
}

impl ComposerState {
    fn new() -> Self {
        Self {
            note: String::new(),
            project_name: String::new(),
            focus: ComposerFocus::Note,
        }
    }
}

// ============================================================================
// APP
// ============================================================================

pub struct App {
    pub theme: Theme,
    pub phase: SessionPhase,
    pub search: SearchState,
    pub selected: Option<ClientSummary>,
    pub composer: ComposerState,
    pub dictation: DictationController,
    pub notifications: Vec<Notification>,
}

impl App {
    pub fn new(theme: Theme, dictation: DictationController) -> Self {
        Self {
            theme,
            phase: SessionPhase::Idle,
            search: SearchState::default(),
            selected: None,
            composer: ComposerState::new(),
            dictation,
            notifications: Vec::new(),
        }
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification::new(level, message));
    }

    // ------------------------------------------------------------------
    // Key handling
    // ------------------------------------------------------------------

    /// Apply one mapped key action; returns the I/O the loop must run.
    pub fn handle_action(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::Quit => Some(Effect::Quit),
            Action::Reset => {
                self.reset();
                None
            }
            Action::Submit => self.begin_submit().map(Effect::Submit),
            Action::ToggleDictation => Some(Effect::ToggleDictation),
            Action::CancelDictation => Some(Effect::CancelDictation),
            Action::FocusNext => {
                if self.selected.is_some() {
                    self.composer.focus = match self.composer.focus {
                        ComposerFocus::Note => ComposerFocus::ProjectName,
                        ComposerFocus::ProjectName => ComposerFocus::Note,
                    };
                }
                None
            }
            Action::MoveUp => {
                self.move_highlight(-1);
                None
            }
            Action::MoveDown => {
                self.move_highlight(1);
                None
            }
            Action::Confirm => {
                if self.selected.is_none() {
                    self.select_highlighted();
                } else if self.composer.focus == ComposerFocus::Note {
                    self.edit_composer(|note| note.push('\n'));
                }
                None
            }
            Action::Backspace => {
                if self.selected.is_none() {
                    self.edit_query(|input| {
                        input.pop();
                    })
                } else {
                    self.edit_composer_field(|field| {
                        field.pop();
                    });
                    None
                }
            }
            Action::Type(c) => {
                if self.selected.is_none() {
                    self.edit_query(|input| input.push(c))
                } else {
                    self.edit_composer_field(|field| field.push(c));
                    None
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Search: debounce + stale guard
    // ------------------------------------------------------------------

    /// Mutate the query text. Every edit supersedes the pending debounce
    /// timer and any in-flight search.
    fn edit_query(&mut self, mutate: impl FnOnce(&mut String)) -> Option<Effect> {
        mutate(&mut self.search.input);
        let seq = self.search.sequence.bump();

        if self.search.input.trim().is_empty() {
            // Cleared input: drop results now; the bump above guarantees a
            // late response for the old text cannot repopulate them.
            self.search.results.clear();
            self.search.highlighted = 0;
            self.phase = SessionPhase::Idle;
            return None;
        }

        Some(Effect::ScheduleDebounce { seq })
    }

    /// A debounce timer fired. Dispatches only if its token is still the
    /// newest, so a burst of keystrokes yields exactly one search.
    pub fn on_debounce_elapsed(&mut self, seq: SearchSeq) -> Option<Effect> {
        if !self.search.sequence.is_current(seq) {
            return None;
        }

        let query = self.search.input.trim().to_string();
        if query.is_empty() {
            return None;
        }

        self.phase = SessionPhase::Searching;
        Some(Effect::DispatchSearch { seq, query })
    }

    /// A dispatched search resolved. Stale tokens are discarded whole, so
    /// results always reflect the newest query regardless of arrival order.
    pub fn on_search_completed(
        &mut self,
        seq: SearchSeq,
        result: Result<Vec<ClientSummary>, String>,
    ) {
        if !self.search.sequence.is_current(seq) {
            return;
        }

        match result {
            Ok(results) => {
                self.search.results = results;
                self.search.highlighted = 0;
                if self.phase == SessionPhase::Searching {
                    self.phase = SessionPhase::ResultsShown;
                }
            }
            Err(message) => {
                self.notify(NotificationLevel::Error, message);
                if self.phase == SessionPhase::Searching {
                    self.phase = SessionPhase::Idle;
                }
            }
        }
    }

    fn move_highlight(&mut self, delta: isize) {
        if self.search.results.is_empty() {
            return;
        }
        let len = self.search.results.len() as isize;
        let next = (self.search.highlighted as isize + delta).rem_euclid(len);
        self.search.highlighted = next as usize;
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Select the highlighted result: clears the query and result list and
    /// moves to `Selected`.
    pub fn select_highlighted(&mut self) {
        let Some(client) = self.search.results.get(self.search.highlighted).cloned() else {
            return;
        };

        self.selected = Some(client);
        self.search.input.clear();
        self.search.results.clear();
        self.search.highlighted = 0;
        // Invalidate any search still in flight for the old query.
        self.search.sequence.bump();
        self.phase = SessionPhase::Selected;
    }

    // ------------------------------------------------------------------
    // Composer
    // ------------------------------------------------------------------

    fn edit_composer(&mut self, mutate: impl FnOnce(&mut String)) {
        mutate(&mut self.composer.note);
        if matches!(self.phase, SessionPhase::Selected | SessionPhase::Error) {
            self.phase = SessionPhase::Composing;
        }
    }

    fn edit_composer_field(&mut self, mutate: impl FnOnce(&mut String)) {
        match self.composer.focus {
            ComposerFocus::Note => self.edit_composer(mutate),
            ComposerFocus::ProjectName => {
                mutate(&mut self.composer.project_name);
                if matches!(self.phase, SessionPhase::Selected | SessionPhase::Error) {
                    self.phase = SessionPhase::Composing;
                }
            }
        }
    }

    /// Append a recognized speech segment to the note text. Dictation is
    /// independent of the submit flow; segments may arrive at any time.
    pub fn on_dictation_event(&mut self, event: DictationEvent) {
        match event {
            DictationEvent::Segment(text) => {
                if !self.composer.note.is_empty() && !self.composer.note.ends_with(' ') {
                    self.composer.note.push(' ');
                }
                self.composer.note.push_str(&text);
                if matches!(self.phase, SessionPhase::Selected | SessionPhase::Error) {
                    self.phase = SessionPhase::Composing;
                }
            }
            DictationEvent::Ended => {
                self.dictation.session_ended();
                self.notify(NotificationLevel::Info, "Dictation ended.");
            }
            DictationEvent::Failed(message) => {
                self.dictation.session_ended();
                self.notify(
                    NotificationLevel::Error,
                    format!("Dictation failed: {}", message),
                );
            }
        }
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    /// Validate the composer and move to `Submitting`. A non-empty project
    /// name turns the submission into the combined project+note flow.
    pub fn begin_submit(&mut self) -> Option<SubmitRequest> {
        if self.phase == SessionPhase::Submitting {
            return None;
        }

        let Some(client) = self.selected.clone() else {
            self.notify(NotificationLevel::Warning, "Select a client first.");
            return None;
        };

        let note = self.composer.note.trim().to_string();
        if note.is_empty() {
            self.notify(NotificationLevel::Warning, "Write a note before submitting.");
            return None;
        }

        self.phase = SessionPhase::Submitting;

        let project_name = self.composer.project_name.trim().to_string();
        Some(if project_name.is_empty() {
            SubmitRequest::Comment {
                client_id: client.id,
                comment: note,
            }
        } else {
            SubmitRequest::ProjectWithNote {
                client_id: client.id,
                project_name,
                note_content: note,
            }
        })
    }

    /// The in-flight submission resolved. Success discards the session;
    /// failure keeps the composed note so the user can edit and retry.
    pub fn on_submit_completed(&mut self, result: Result<String, String>) {
        match result {
            Ok(message) => {
                self.notify(NotificationLevel::Success, message);
                self.reset();
            }
            Err(message) => {
                self.notify(NotificationLevel::Error, message);
                self.phase = SessionPhase::Error;
            }
        }
    }

    // ------------------------------------------------------------------
    // Reset
    // ------------------------------------------------------------------

    /// Discard all transient session state and return to `Idle`.
    ///
    /// The search sequence is bumped, not recreated: a response still in
    /// flight from before the reset must stay stale forever.
    pub fn reset(&mut self) {
        self.search.input.clear();
        self.search.results.clear();
        self.search.highlighted = 0;
        self.search.sequence.bump();
        self.selected = None;
        self.composer = ComposerState::new();
        self.dictation.cancel();
        self.phase = SessionPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictation::NullDictation;
    use std::sync::Arc;

    fn app() -> App {
        App::new(
            Theme::default_theme(),
            DictationController::new(Arc::new(NullDictation), "es-ES"),
        )
    }

    fn client(id: i64, name: &str) -> ClientSummary {
        ClientSummary {
            id: PartyId::new(id),
            name: name.to_string(),
        }
    }

    fn type_str(app: &mut App, text: &str) -> Vec<Effect> {
        text.chars()
            .filter_map(|c| app.handle_action(Action::Type(c)))
            .collect()
    }

    /// Drive a full search round for `query` and apply `results`.
    fn complete_search(app: &mut App, query: &str, results: Vec<ClientSummary>) {
        let effects = type_str(app, query);
        let Effect::ScheduleDebounce { seq } = effects.last().unwrap() else {
            panic!("expected a debounce to be scheduled");
        };
        let dispatch = app.on_debounce_elapsed(*seq).unwrap();
        let Effect::DispatchSearch { seq, .. } = dispatch else {
            panic!("expected a dispatch");
        };
        app.on_search_completed(seq, Ok(results));
    }

    // ------------------------------------------------------------------
    // Debounce
    // ------------------------------------------------------------------

    #[test]
    fn test_keystroke_burst_dispatches_exactly_one_search() {
        let mut app = app();

        // "ab", "abc", "abcd" typed inside one debounce window: each
        // keystroke schedules a timer that supersedes the previous one.
        let effects = type_str(&mut app, "abcd");
        assert_eq!(effects.len(), 4);

        let seqs: Vec<_> = effects
            .iter()
            .map(|e| match e {
                Effect::ScheduleDebounce { seq } => *seq,
                other => panic!("unexpected effect: {:?}", other),
            })
            .collect();

        // Superseded timers fire into nothing.
        assert_eq!(app.on_debounce_elapsed(seqs[0]), None);
        assert_eq!(app.on_debounce_elapsed(seqs[1]), None);
        assert_eq!(app.on_debounce_elapsed(seqs[2]), None);

        // Only the final token dispatches, with the final text.
        let dispatch = app.on_debounce_elapsed(seqs[3]);
        assert_eq!(
            dispatch,
            Some(Effect::DispatchSearch {
                seq: seqs[3],
                query: "abcd".to_string(),
            })
        );
        assert_eq!(app.phase, SessionPhase::Searching);
    }

    #[test]
    fn test_clearing_input_goes_idle_and_schedules_nothing() {
        let mut app = app();
        type_str(&mut app, "a");

        let effect = app.handle_action(Action::Backspace);
        assert_eq!(effect, None);
        assert_eq!(app.phase, SessionPhase::Idle);
        assert!(app.search.results.is_empty());
    }

    // ------------------------------------------------------------------
    // Stale-response guard
    // ------------------------------------------------------------------

    #[test]
    fn test_stale_response_cannot_overwrite_newer_results() {
        let mut app = app();

        // Search for "ab" dispatches...
        let effects = type_str(&mut app, "ab");
        let &Effect::ScheduleDebounce { seq: seq_ab } = effects.last().unwrap() else {
            panic!();
        };
        assert!(app.on_debounce_elapsed(seq_ab).is_some());

        // ...then the user keeps typing and "abc" dispatches too.
        let effects = type_str(&mut app, "c");
        let &Effect::ScheduleDebounce { seq: seq_abc } = effects.last().unwrap() else {
            panic!();
        };
        assert!(app.on_debounce_elapsed(seq_abc).is_some());

        // "abc" resolves first; "ab" limps in afterwards.
        app.on_search_completed(seq_abc, Ok(vec![client(1, "abc match")]));
        app.on_search_completed(seq_ab, Ok(vec![client(2, "ab match")]));

        // Visible results reflect "abc", not "ab".
        assert_eq!(app.search.results.len(), 1);
        assert_eq!(app.search.results[0].name, "abc match");
    }

    #[test]
    fn test_response_after_selection_is_discarded() {
        let mut app = app();
        complete_search(&mut app, "john", vec![client(1, "John Doe")]);

        // Capture an in-flight token, then select before it resolves.
        let effects = type_str(&mut app, "x");
        let &Effect::ScheduleDebounce { seq } = effects.last().unwrap() else {
            panic!();
        };
        // Selection requires results; restore them for the test.
        app.search.results = vec![client(1, "John Doe")];
        app.select_highlighted();

        app.on_search_completed(seq, Ok(vec![client(9, "stray")]));
        assert!(app.search.results.is_empty());
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    #[test]
    fn test_selection_clears_query_and_results() {
        let mut app = app();
        complete_search(
            &mut app,
            "john",
            vec![client(1, "John Doe"), client(2, "Johnny")],
        );
        assert_eq!(app.phase, SessionPhase::ResultsShown);

        app.handle_action(Action::MoveDown);
        app.handle_action(Action::Confirm);

        assert_eq!(app.phase, SessionPhase::Selected);
        assert_eq!(app.selected.as_ref().unwrap().name, "Johnny");
        assert!(app.search.input.is_empty());
        assert!(app.search.results.is_empty());
    }

    #[test]
    fn test_typing_after_selection_composes_note() {
        let mut app = app();
        complete_search(&mut app, "john", vec![client(1, "John Doe")]);
        app.handle_action(Action::Confirm);

        type_str(&mut app, "hola");
        assert_eq!(app.phase, SessionPhase::Composing);
        assert_eq!(app.composer.note, "hola");
        // The search input stayed empty - typing went to the note.
        assert!(app.search.input.is_empty());
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    fn selected_app_with_note(note: &str) -> App {
        let mut app = app();
        complete_search(&mut app, "john", vec![client(1, "John Doe")]);
        app.handle_action(Action::Confirm);
        type_str(&mut app, note);
        app
    }

    #[test]
    fn test_submit_without_project_is_a_comment() {
        let mut app = selected_app_with_note("called about invoice");

        let request = app.begin_submit().unwrap();
        assert_eq!(
            request,
            SubmitRequest::Comment {
                client_id: PartyId::new(1),
                comment: "called about invoice".to_string(),
            }
        );
        assert_eq!(app.phase, SessionPhase::Submitting);
    }

    #[test]
    fn test_submit_with_project_name_uses_combined_flow() {
        let mut app = selected_app_with_note("kickoff notes");
        app.handle_action(Action::FocusNext);
        type_str(&mut app, "Renovation");

        let request = app.begin_submit().unwrap();
        assert_eq!(
            request,
            SubmitRequest::ProjectWithNote {
                client_id: PartyId::new(1),
                project_name: "Renovation".to_string(),
                note_content: "kickoff notes".to_string(),
            }
        );
    }

    #[test]
    fn test_submit_requires_selection_and_note() {
        let mut app = app();
        assert_eq!(app.begin_submit(), None);
        assert_eq!(
            app.notifications.last().unwrap().level,
            NotificationLevel::Warning
        );

        let mut app = selected_app_with_note("   ");
        assert_eq!(app.begin_submit(), None);
    }

    #[test]
    fn test_double_submit_is_ignored_while_in_flight() {
        let mut app = selected_app_with_note("note");
        assert!(app.begin_submit().is_some());
        assert_eq!(app.begin_submit(), None);
    }

    #[test]
    fn test_submit_success_resets_to_idle() {
        let mut app = selected_app_with_note("note");
        app.begin_submit().unwrap();

        app.on_submit_completed(Ok("Comment sent.".to_string()));

        assert_eq!(app.phase, SessionPhase::Idle);
        assert!(app.selected.is_none());
        assert!(app.composer.note.is_empty());
        assert_eq!(
            app.notifications.last().unwrap().level,
            NotificationLevel::Success
        );
    }

    #[test]
    fn test_submit_failure_keeps_note_for_retry() {
        let mut app = selected_app_with_note("note");
        app.begin_submit().unwrap();

        app.on_submit_completed(Err("server returned 500".to_string()));

        assert_eq!(app.phase, SessionPhase::Error);
        assert_eq!(app.composer.note, "note");
        assert!(app.selected.is_some());

        // Editing recovers from the error phase...
        type_str(&mut app, "!");
        assert_eq!(app.phase, SessionPhase::Composing);
        // ...and a retry can go out.
        assert!(app.begin_submit().is_some());
    }

    // ------------------------------------------------------------------
    // Dictation
    // ------------------------------------------------------------------

    #[test]
    fn test_dictation_segments_append_with_separator() {
        let mut app = selected_app_with_note("Spoke with client.");

        app.on_dictation_event(DictationEvent::Segment("They want".to_string()));
        app.on_dictation_event(DictationEvent::Segment("a quote".to_string()));

        assert_eq!(app.composer.note, "Spoke with client. They want a quote");
    }

    #[test]
    fn test_dictation_segment_during_submission_does_not_disturb_it() {
        let mut app = selected_app_with_note("note");
        app.begin_submit().unwrap();

        app.on_dictation_event(DictationEvent::Segment("late words".to_string()));

        // The submission keeps running; the words land in the composer.
        assert_eq!(app.phase, SessionPhase::Submitting);
        assert!(app.composer.note.contains("late words"));
    }

    // ------------------------------------------------------------------
    // Reset
    // ------------------------------------------------------------------

    #[test]
    fn test_reset_discards_all_transient_state() {
        let mut app = selected_app_with_note("note");
        app.handle_action(Action::FocusNext);
        type_str(&mut app, "Renovation");

        app.handle_action(Action::Reset);

        assert_eq!(app.phase, SessionPhase::Idle);
        assert!(app.selected.is_none());
        assert!(app.composer.note.is_empty());
        assert!(app.composer.project_name.is_empty());
        assert!(app.search.input.is_empty());
    }

    #[test]
    fn test_response_from_before_reset_stays_stale() {
        let mut app = app();
        let effects = type_str(&mut app, "ab");
        let &Effect::ScheduleDebounce { seq } = effects.last().unwrap() else {
            panic!();
        };
        assert!(app.on_debounce_elapsed(seq).is_some());

        app.reset();
        app.on_search_completed(seq, Ok(vec![client(1, "ghost")]));

        assert!(app.search.results.is_empty());
    }
}

//! Parley TUI entry point.

use parley_tui::api_client::ApiClient;
use parley_tui::config::TuiConfig;
use parley_tui::dictation::{Availability, DictationController, DictationEvent, NullDictation};
use parley_tui::events::TuiEvent;
use parley_tui::keys::map_key;
use parley_tui::notifications::NotificationLevel;
use parley_tui::state::{App, Effect, SubmitRequest};
use parley_tui::theme::Theme;
use parley_tui::views;

use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let config = TuiConfig::load()?;
    let api = ApiClient::new(&config)?;
    let dictation =
        DictationController::new(Arc::new(NullDictation), config.dictation_locale.clone());

    let mut app = App::new(Theme::default_theme(), dictation);
    if let Availability::Unavailable { reason } = app.dictation.availability() {
        app.notify(
            NotificationLevel::Info,
            format!("Dictation unavailable: {}", reason),
        );
    }

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard {};

    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);
    let (dictation_tx, mut dictation_rx) = mpsc::unbounded_channel::<DictationEvent>();

    spawn_input_reader(event_tx.clone());

    // Forward dictation events into the main loop.
    {
        let tx = event_tx.clone();
        tokio::spawn(async move {
            while let Some(ev) = dictation_rx.recv().await {
                if tx.send(TuiEvent::Dictation(ev)).await.is_err() {
                    break;
                }
            }
        });
    }

    let mut ctx = LoopCtx {
        api,
        event_tx,
        dictation_tx,
        debounce: Duration::from_millis(config.debounce_ms),
        debounce_timer: None,
    };

    let tick_rate = Duration::from_millis(config.tick_interval_ms);
    let mut ticker = tokio::time::interval(tick_rate);

    loop {
        terminal.draw(|f| views::render(f, &app))?;

        let event = tokio::select! {
            _ = ticker.tick() => TuiEvent::Tick,
            Some(event) = event_rx.recv() => event,
        };

        if handle_event(&mut app, &mut ctx, event) {
            break;
        }
    }

    Ok(())
}

// ============================================================================
// EVENT LOOP
// ============================================================================

struct LoopCtx {
    api: ApiClient,
    event_tx: mpsc::Sender<TuiEvent>,
    dictation_tx: mpsc::UnboundedSender<DictationEvent>,
    debounce: Duration,
    debounce_timer: Option<JoinHandle<()>>,
}

/// Apply one event. Returns true when the loop should exit.
fn handle_event(app: &mut App, ctx: &mut LoopCtx, event: TuiEvent) -> bool {
    match event {
        TuiEvent::Input(key) => {
            if let Some(action) = map_key(key) {
                if let Some(effect) = app.handle_action(action) {
                    return run_effect(app, ctx, effect);
                }
            }
        }
        TuiEvent::DebounceElapsed { seq } => {
            if let Some(effect) = app.on_debounce_elapsed(seq) {
                return run_effect(app, ctx, effect);
            }
        }
        TuiEvent::SearchCompleted { seq, result } => app.on_search_completed(seq, result),
        TuiEvent::SubmitCompleted { result } => app.on_submit_completed(result),
        TuiEvent::Dictation(ev) => app.on_dictation_event(ev),
        TuiEvent::Tick | TuiEvent::Resize { .. } => {}
    }
    false
}

fn run_effect(app: &mut App, ctx: &mut LoopCtx, effect: Effect) -> bool {
    match effect {
        Effect::Quit => return true,

        Effect::ScheduleDebounce { seq } => {
            // The token check makes a stale timer harmless, but aborting it
            // keeps the task count flat during fast typing.
            if let Some(handle) = ctx.debounce_timer.take() {
                handle.abort();
            }

            let tx = ctx.event_tx.clone();
            let delay = ctx.debounce;
            ctx.debounce_timer = Some(tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let _ = tx.send(TuiEvent::DebounceElapsed { seq }).await;
            }));
        }

        Effect::DispatchSearch { seq, query } => {
            let api = ctx.api.clone();
            let tx = ctx.event_tx.clone();
            tokio::spawn(async move {
                let result = api
                    .search_clients(&query)
                    .await
                    .map_err(|e| e.to_string());
                let _ = tx.send(TuiEvent::SearchCompleted { seq, result }).await;
            });
        }

        Effect::Submit(request) => {
            let api = ctx.api.clone();
            let tx = ctx.event_tx.clone();
            tokio::spawn(async move {
                let result = match request {
                    SubmitRequest::Comment { client_id, comment } => api
                        .create_comment(client_id, &comment)
                        .await
                        .map(|r| r.message)
                        .map_err(|e| e.to_string()),
                    SubmitRequest::ProjectWithNote {
                        client_id,
                        project_name,
                        note_content,
                    } => api
                        .create_project_with_note(client_id, &project_name, &note_content)
                        .await
                        .map(|r| format!("Project {} created with note.", r.project_id))
                        .map_err(|e| e.to_string()),
                };
                let _ = tx.send(TuiEvent::SubmitCompleted { result }).await;
            });
        }

        Effect::ToggleDictation => {
            if app.dictation.is_listening() {
                app.dictation.stop();
            } else if let Err(err) = app.dictation.start(ctx.dictation_tx.clone()) {
                app.notify(NotificationLevel::Warning, err.to_string());
            }
        }

        Effect::CancelDictation => app.dictation.cancel(),
    }
    false
}

// ============================================================================
// TERMINAL PLUMBING
// ============================================================================

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(evt) = event::read() {
                match evt {
                    CrosstermEvent::Key(key) => {
                        let _ = sender.blocking_send(TuiEvent::Input(key));
                    }
                    CrosstermEvent::Resize(width, height) => {
                        let _ = sender.blocking_send(TuiEvent::Resize { width, height });
                    }
                    _ => {}
                }
            }
        }
    });
}

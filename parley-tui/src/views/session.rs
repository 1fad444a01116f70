//! The search / select / compose / submit session view.

use crate::dictation::Availability;
use crate::notifications::Notification;
use crate::state::{App, ComposerFocus, SessionPhase};
use crate::theme::notification_color;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search input
            Constraint::Min(6),    // results or composer
            Constraint::Length(1), // notification toast
            Constraint::Length(1), // help line
        ])
        .split(f.size());

    render_search_input(f, app, chunks[0]);

    if app.selected.is_some() {
        render_composer(f, app, chunks[1]);
    } else {
        render_results(f, app, chunks[1]);
    }

    render_toast(f, app, chunks[2]);
    render_help(f, app, chunks[3]);
}

fn render_search_input(f: &mut Frame<'_>, app: &App, area: Rect) {
    let searching = app.phase == SessionPhase::Searching;

    let title = if searching {
        "Search clients (searching...)"
    } else {
        "Search clients"
    };

    let border = if app.selected.is_none() {
        app.theme.border_focus
    } else {
        app.theme.border
    };

    let input = Paragraph::new(app.search.input.as_str())
        .style(Style::default().fg(app.theme.text))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
    f.render_widget(input, area);
}

fn render_results(f: &mut Frame<'_>, app: &App, area: Rect) {
    if app.search.results.is_empty() {
        let hint = if app.search.input.trim().is_empty() {
            "Type to search for a client."
        } else if app.phase == SessionPhase::Searching {
            "Searching..."
        } else {
            "No results."
        };

        let empty = Paragraph::new(hint)
            .style(Style::default().fg(app.theme.text_dim))
            .block(Block::default().title("Results").borders(Borders::ALL));
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .search
        .results
        .iter()
        .map(|client| ListItem::new(format!("{}  #{}", client.name, client.id)))
        .collect();

    let mut state = ListState::default();
    state.select(Some(app.search.highlighted));

    let list = List::new(items)
        .block(Block::default().title("Results").borders(Borders::ALL))
        .highlight_style(Style::default().fg(app.theme.primary))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut state);
}

fn render_composer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // selected client
            Constraint::Length(3), // project name
            Constraint::Min(3),    // note
        ])
        .split(area);

    let client_name = app
        .selected
        .as_ref()
        .map(|c| c.name.as_str())
        .unwrap_or_default();
    let header = Paragraph::new(Line::from(vec![
        Span::styled("Client: ", Style::default().fg(app.theme.text_dim)),
        Span::styled(client_name, Style::default().fg(app.theme.primary)),
    ]));
    f.render_widget(header, chunks[0]);

    let project_border = if app.composer.focus == ComposerFocus::ProjectName {
        app.theme.border_focus
    } else {
        app.theme.border
    };
    let project = Paragraph::new(app.composer.project_name.as_str())
        .style(Style::default().fg(app.theme.text))
        .block(
            Block::default()
                .title("New project (optional)")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(project_border)),
        );
    f.render_widget(project, chunks[1]);

    let note_title = note_title(app);
    let note_border = if app.composer.focus == ComposerFocus::Note {
        app.theme.border_focus
    } else {
        app.theme.border
    };
    let note = Paragraph::new(app.composer.note.as_str())
        .style(Style::default().fg(app.theme.text))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(note_title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(note_border)),
        );
    f.render_widget(note, chunks[2]);
}

fn note_title(app: &App) -> String {
    let mut title = String::from("Note");

    if app.dictation.is_listening() {
        title.push_str(" [listening]");
    }
    if app.phase == SessionPhase::Submitting {
        title.push_str(" [submitting...]");
    }

    title
}

fn render_toast(f: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(Notification { level, message, .. }) = app.notifications.last() else {
        return;
    };

    let toast = Paragraph::new(message.as_str())
        .style(Style::default().fg(notification_color(*level, &app.theme)));
    f.render_widget(toast, area);
}

fn render_help(f: &mut Frame<'_>, app: &App, area: Rect) {
    let dictation_hint = match app.dictation.availability() {
        Availability::Available => "^D dictate  ^X cancel dictation  ",
        Availability::Unavailable { .. } => "",
    };

    let help = format!(
        "Enter select  Tab field  ^S submit  {}Esc reset  ^C quit",
        dictation_hint
    );
    let line = Paragraph::new(help).style(Style::default().fg(app.theme.text_dim));
    f.render_widget(line, area);
}

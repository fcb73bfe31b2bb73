use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use calpane::app::{AppState, Mode, Notice};
use calpane::session::SessionState;

use crate::tui::{dialogs, event_list};

pub fn ui(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    let header_text = match app.gate.state() {
        SessionState::Resolving => "calpane".to_string(),
        SessionState::SignedOut => "calpane (signed out)".to_string(),
        SessionState::SignedIn(session) => format!("Welcome, {}", session.user_email),
    };

    let header = Paragraph::new(header_text)
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    match app.gate.state() {
        SessionState::Resolving => render_loading(f, app, chunks[1]),
        SessionState::SignedOut => render_sign_in(f, app, chunks[1]),
        SessionState::SignedIn(_) => render_events_pane(f, app, chunks[1]),
    }

    render_status_bar(f, app, chunks[2]);

    if app.show_help {
        dialogs::help::render(f, app);
    }

    if app.event_form.is_some() {
        dialogs::event_form::render(f, app);
    }
}

fn render_loading(f: &mut Frame, app: &AppState, area: ratatui::layout::Rect) {
    let loading = Paragraph::new("Loading...")
        .style(Style::default().fg(app.theme.dim))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(loading, area);
}

fn render_sign_in(f: &mut Frame, app: &AppState, area: ratatui::layout::Rect) {
    let mut lines = vec![Line::from("")];

    match &app.auth_prompt {
        None => {
            lines.push(Line::from(vec![
                Span::styled("Enter", Style::default().fg(app.theme.accent)),
                Span::raw(" = Sign in with Google | "),
                Span::styled("q", Style::default().fg(app.theme.accent)),
                Span::raw(" = Quit"),
            ]));
        }
        Some(prompt) => {
            lines.push(Line::from("Open this URL in your browser and authorize access:"));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                prompt.auth_url.clone(),
                Style::default().fg(app.theme.accent),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::raw("Authorization code: "),
                Span::styled(
                    prompt.code_input.clone(),
                    Style::default().fg(app.theme.selected_fg),
                ),
            ]));
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("Enter", Style::default().fg(app.theme.accent)),
                Span::raw(" = Submit code | "),
                Span::styled("Esc", Style::default().fg(app.theme.accent)),
                Span::raw(" = Cancel"),
            ]));
        }
    }

    let pane = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Sign In "));
    f.render_widget(pane, area);
}

fn render_events_pane(f: &mut Frame, app: &AppState, area: ratatui::layout::Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let filter_active = app.mode == Mode::Filter;
    let filter_style = if filter_active {
        Style::default().fg(app.theme.accent)
    } else {
        Style::default().fg(app.theme.dim)
    };

    let filter_line = Line::from(vec![
        Span::styled("Filter date: ", filter_style),
        Span::raw(app.store.filter_date().to_string()),
        Span::styled(
            if filter_active {
                "  (YYYY-MM-DD, Enter/Esc = done)"
            } else {
                "  (f = edit)"
            },
            Style::default().fg(app.theme.dim),
        ),
    ]);

    let filter_bar = Paragraph::new(filter_line)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(filter_bar, chunks[0]);

    event_list::render(f, app, chunks[1]);
}

fn render_status_bar(f: &mut Frame, app: &AppState, area: ratatui::layout::Rect) {
    let (status_text, status_style) = match &app.notice {
        Some(Notice::Error(message)) => {
            (message.clone(), Style::default().fg(app.theme.error))
        }
        Some(Notice::Info(message)) => {
            (message.clone(), Style::default().fg(app.theme.success))
        }
        None if app.in_flight => (
            "Working...".to_string(),
            Style::default().fg(app.theme.dim),
        ),
        None => (
            "a = Add | e = Export CSV | f = Filter | r = Refresh | s = Sign out | ? = Help | q = Quit"
                .to_string(),
            Style::default().fg(app.theme.status_bar),
        ),
    };

    let status = Paragraph::new(status_text)
        .style(status_style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, area);
}

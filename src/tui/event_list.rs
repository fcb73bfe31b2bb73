use chrono::Local;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use calpane::app::AppState;
use calpane::calendar::Event;

fn start_label(event: &Event) -> String {
    let start = event.effective_start().with_timezone(&Local);
    if event.is_all_day() {
        format!("{} (all day)", start.format("%Y-%m-%d"))
    } else {
        start.format("%Y-%m-%d %H:%M").to_string()
    }
}

pub fn render(f: &mut Frame, app: &AppState, area: ratatui::layout::Rect) {
    let filtered = app.store.filtered();
    let title = format!(
        " Your Events ({} of {}) ",
        filtered.len(),
        app.store.events().len()
    );

    let mut lines = Vec::new();

    if filtered.is_empty() {
        lines.push(Line::from(Span::styled(
            "No events",
            Style::default().fg(app.theme.dim),
        )));
    } else {
        for event in filtered {
            lines.push(Line::from(Span::styled(
                event.display_title().to_string(),
                Style::default()
                    .fg(app.theme.selected_fg)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                format!("  {}", start_label(event)),
                Style::default().fg(app.theme.dim),
            )));
            lines.push(Line::from(""));
        }
    }

    let content = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(content, area);
}

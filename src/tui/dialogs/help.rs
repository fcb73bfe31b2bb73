use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use calpane::app::AppState;

pub fn render(f: &mut Frame, app: &AppState) {
    let area = f.size();
    let width = 50.min(area.width);
    let height = 14.min(area.height);
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;

    let help_area = ratatui::layout::Rect {
        x,
        y,
        width,
        height,
    };

    f.render_widget(Clear, help_area);

    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<8}", k), Style::default().fg(app.theme.accent)),
            Span::raw(desc),
        ])
    };

    let lines = vec![
        Line::from(Span::styled(
            "Keys",
            Style::default()
                .fg(app.theme.title)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        key("a", "Add a new event"),
        key("e", "Export the filtered list to CSV"),
        key("f or /", "Edit the date filter"),
        key("r", "Refresh events from the calendar"),
        key("s", "Sign out"),
        key("?", "Toggle this help"),
        key("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc, q or ? to close",
            Style::default().fg(app.theme.dim),
        )),
    ];

    let help = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Help "));
    f.render_widget(help, help_area);
}

use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use calpane::app::{AppState, FormField};

pub fn render(f: &mut Frame, app: &AppState) {
    let Some(form) = &app.event_form else {
        return;
    };

    let area = f.size();
    let form_width = 70;
    let form_height = 14;
    let x = (area.width.saturating_sub(form_width)) / 2;
    let y = (area.height.saturating_sub(form_height)) / 2;

    let form_area = ratatui::layout::Rect {
        x,
        y,
        width: form_width,
        height: form_height,
    };

    f.render_widget(Clear, form_area);

    let active_color = app.theme.accent;
    let inactive_color = app.theme.dim;
    let field_color = |field: FormField| {
        if form.active_field == field {
            active_color
        } else {
            inactive_color
        }
    };

    let form_text = vec![
        Line::from(Span::styled(
            "Add New Event",
            Style::default()
                .fg(app.theme.title)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Event Name: ", Style::default().fg(field_color(FormField::Summary))),
            Span::raw(&form.summary),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "Description: ",
                Style::default().fg(field_color(FormField::Description)),
            ),
            Span::raw(&form.description),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Start Time: ", Style::default().fg(field_color(FormField::Start))),
            Span::raw(&form.start_input),
            Span::styled(" (YYYY-MM-DDTHH:MM)", Style::default().fg(inactive_color)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("End Time: ", Style::default().fg(field_color(FormField::End))),
            Span::raw(&form.end_input),
            Span::styled(" (YYYY-MM-DDTHH:MM)", Style::default().fg(inactive_color)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Tab", Style::default().fg(app.theme.accent)),
            Span::raw(" = Next field | "),
            Span::styled("Enter", Style::default().fg(app.theme.success)),
            Span::raw(" = Submit | "),
            Span::styled("Esc", Style::default().fg(app.theme.error)),
            Span::raw(" = Cancel"),
        ]),
    ];

    let form_paragraph = Paragraph::new(form_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" New Event ")
                .style(Style::default().bg(Color::Black)),
        )
        .alignment(Alignment::Left);

    f.render_widget(form_paragraph, form_area);
}

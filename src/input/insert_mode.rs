use crossterm::event::KeyCode;

use crate::app::{AppState, FormField};

const DATETIME_INPUT_MAX: usize = 19;

fn is_datetime_char(c: char) -> bool {
    c.is_ascii_digit() || c == '-' || c == ':' || c == 'T'
}

pub fn handle_key(key: KeyCode, state: &mut AppState) {
    let Some(form) = state.event_form.as_mut() else {
        return;
    };

    match key {
        KeyCode::Tab => form.next_field(),
        KeyCode::BackTab => form.prev_field(),
        KeyCode::Backspace => {
            match form.active_field {
                FormField::Summary => {
                    form.summary.pop();
                }
                FormField::Description => {
                    form.description.pop();
                }
                FormField::Start => {
                    form.start_input.pop();
                }
                FormField::End => {
                    form.end_input.pop();
                }
            }
        }
        KeyCode::Char(c) => match form.active_field {
            FormField::Summary => {
                form.summary.push(c);
            }
            FormField::Description => {
                form.description.push(c);
            }
            FormField::Start => {
                if is_datetime_char(c) && form.start_input.len() < DATETIME_INPUT_MAX {
                    form.start_input.push(c);
                }
            }
            FormField::End => {
                if is_datetime_char(c) && form.end_input.len() < DATETIME_INPUT_MAX {
                    form.end_input.push(c);
                }
            }
        },
        _ => {}
    }
}

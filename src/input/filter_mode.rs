use crossterm::event::KeyCode;

use crate::app::AppState;

const FILTER_INPUT_MAX: usize = 10;

/// Filter input re-derives the filtered view on every keystroke, the
/// same way the list reacts to a date picker changing.
pub fn handle_key(key: KeyCode, state: &mut AppState) {
    match key {
        KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => {
            if state.store.filter_date().len() < FILTER_INPUT_MAX {
                state.store.push_filter_char(c);
            }
        }
        KeyCode::Backspace => {
            state.store.pop_filter_char();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{Event, EventTime};
    use chrono::{TimeZone, Utc};

    fn timed(id: &str, day: u32) -> Event {
        let start = Utc.with_ymd_and_hms(2024, 5, day, 9, 0, 0).unwrap();
        Event {
            id: id.to_string(),
            summary: None,
            description: None,
            start: EventTime::Timed(start),
            end: EventTime::Timed(start),
        }
    }

    fn state_with_events() -> AppState {
        let mut state = AppState::new();
        state.store.apply_fetch(vec![timed("a", 1), timed("b", 2)]);
        state
    }

    #[test]
    fn typing_narrows_the_view_immediately() {
        let mut state = state_with_events();

        for c in "2024-05-01".chars() {
            handle_key(KeyCode::Char(c), &mut state);
        }

        assert_eq!(state.store.filtered().len(), 1);
        assert_eq!(state.store.filter_date(), "2024-05-01");
    }

    #[test]
    fn backspace_widens_the_view_again() {
        let mut state = state_with_events();
        state.store.set_filter("2024-05-01");

        handle_key(KeyCode::Backspace, &mut state);

        assert_eq!(state.store.filter_date(), "2024-05-0");
        assert_eq!(state.store.filtered().len(), 2);
    }

    #[test]
    fn non_date_characters_are_ignored() {
        let mut state = state_with_events();

        handle_key(KeyCode::Char('x'), &mut state);

        assert_eq!(state.store.filter_date(), "");
    }

    #[test]
    fn filter_input_is_length_limited() {
        let mut state = state_with_events();
        state.store.set_filter("2024-05-01");

        handle_key(KeyCode::Char('1'), &mut state);

        assert_eq!(state.store.filter_date(), "2024-05-01");
    }
}

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

use crate::remote::EventDraft;
use crate::session::SessionGate;
use crate::store::EventStore;
use crate::ui::theme::Theme;

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Normal,
    Filter,
    Insert,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// Sign-in flow state on the signed-out screen.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthPrompt {
    pub auth_url: String,
    pub code_input: String,
}

impl AuthPrompt {
    pub fn new(auth_url: String) -> Self {
        Self {
            auth_url,
            code_input: String::new(),
        }
    }
}

pub const FORM_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Error, PartialEq)]
pub enum DraftError {
    #[error("Invalid date/time '{0}', expected YYYY-MM-DDTHH:MM")]
    InvalidDateTime(String),
}

/// Transient input state for composing a new event. Lives only while
/// the dialog is open: closed -> open -> (submit | cancel) -> closed.
#[derive(Debug, Clone, PartialEq)]
pub struct EventForm {
    pub summary: String,
    pub description: String,
    pub start_input: String,
    pub end_input: String,
    pub active_field: FormField,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormField {
    Summary,
    Description,
    Start,
    End,
}

impl EventForm {
    /// Fresh defaults: empty name and description, current-moment start and end.
    pub fn new() -> Self {
        let now = Local::now().format(FORM_DATETIME_FORMAT).to_string();
        Self {
            summary: String::new(),
            description: String::new(),
            start_input: now.clone(),
            end_input: now,
            active_field: FormField::Summary,
        }
    }

    pub fn next_field(&mut self) {
        self.active_field = match self.active_field {
            FormField::Summary => FormField::Description,
            FormField::Description => FormField::Start,
            FormField::Start => FormField::End,
            FormField::End => FormField::Summary,
        };
    }

    pub fn prev_field(&mut self) {
        self.active_field = match self.active_field {
            FormField::Summary => FormField::End,
            FormField::Description => FormField::Summary,
            FormField::Start => FormField::Description,
            FormField::End => FormField::Start,
        };
    }

    /// Start and end are interpreted in the local timezone and converted
    /// to UTC. A reversed pair is not validated here; the server gets it
    /// as entered.
    pub fn to_draft(&self) -> Result<EventDraft, DraftError> {
        Ok(EventDraft {
            summary: self.summary.clone(),
            description: self.description.clone(),
            start: parse_datetime_input(&self.start_input)?,
            end: parse_datetime_input(&self.end_input)?,
        })
    }
}

impl Default for EventForm {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_datetime_input(input: &str) -> Result<DateTime<Utc>, DraftError> {
    let naive = NaiveDateTime::parse_from_str(input, FORM_DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| DraftError::InvalidDateTime(input.to_string()))?;

    let local = Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| DraftError::InvalidDateTime(input.to_string()))?;

    Ok(local.with_timezone(&Utc))
}

pub struct AppState {
    pub mode: Mode,
    pub gate: SessionGate,
    pub store: EventStore,
    pub event_form: Option<EventForm>,
    pub notice: Option<Notice>,
    pub in_flight: bool,
    pub show_help: bool,
    pub theme: Theme,
    pub auth_prompt: Option<AuthPrompt>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            mode: Mode::Normal,
            gate: SessionGate::new(),
            store: EventStore::new(),
            event_form: None,
            notice: None,
            in_flight: false,
            show_help: false,
            theme: Theme::default(),
            auth_prompt: None,
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn open_event_form(&mut self) {
        if self.gate.session().is_none() {
            return;
        }
        self.event_form = Some(EventForm::new());
        self.mode = Mode::Insert;
    }

    pub fn close_event_form(&mut self) {
        self.event_form = None;
        self.mode = Mode::Normal;
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice::Info(message.into()));
    }

    pub fn alert(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice::Error(message.into()));
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;

    fn signed_in_state() -> AppState {
        let mut state = AppState::new();
        state.gate.establish(Session {
            user_email: "user@example.com".to_string(),
            access_token: "tok".to_string(),
        });
        state
    }

    #[test]
    fn new_app_starts_in_normal_mode() {
        let app = AppState::new();
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn new_app_has_no_form_open() {
        let app = AppState::new();
        assert!(app.event_form.is_none());
    }

    #[test]
    fn opening_the_form_requires_a_session() {
        let mut app = AppState::new();
        app.gate.clear();

        app.open_event_form();

        assert!(app.event_form.is_none());
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn opening_the_form_enters_insert_mode() {
        let mut app = signed_in_state();

        app.open_event_form();

        assert!(app.event_form.is_some());
        assert_eq!(app.mode, Mode::Insert);
    }

    #[test]
    fn fresh_form_has_empty_name_and_description() {
        let form = EventForm::new();

        assert!(form.summary.is_empty());
        assert!(form.description.is_empty());
        assert_eq!(form.active_field, FormField::Summary);
    }

    #[test]
    fn fresh_form_defaults_parse_to_a_draft() {
        let form = EventForm::new();

        assert!(form.to_draft().is_ok());
    }

    #[test]
    fn reopening_the_form_discards_the_previous_draft() {
        let mut app = signed_in_state();
        app.open_event_form();
        app.event_form.as_mut().unwrap().summary = "Old draft".to_string();

        app.close_event_form();
        app.open_event_form();

        assert!(app.event_form.as_ref().unwrap().summary.is_empty());
    }

    #[test]
    fn field_cycle_wraps_around() {
        let mut form = EventForm::new();

        form.next_field();
        form.next_field();
        form.next_field();
        form.next_field();

        assert_eq!(form.active_field, FormField::Summary);
    }

    #[test]
    fn prev_field_from_first_wraps_to_last() {
        let mut form = EventForm::new();

        form.prev_field();

        assert_eq!(form.active_field, FormField::End);
    }

    #[test]
    fn unparseable_datetime_is_a_draft_error() {
        let mut form = EventForm::new();
        form.start_input = "next tuesday".to_string();

        assert!(matches!(
            form.to_draft(),
            Err(DraftError::InvalidDateTime(_))
        ));
    }

    #[test]
    fn reversed_start_end_pair_is_sent_as_is() {
        let mut form = EventForm::new();
        form.start_input = "2024-05-01T15:00".to_string();
        form.end_input = "2024-05-01T09:00".to_string();

        let draft = form.to_draft().unwrap();

        assert!(draft.end < draft.start);
    }

    #[test]
    fn seconds_are_accepted_in_datetime_input() {
        let mut form = EventForm::new();
        form.start_input = "2024-05-01T09:00:30".to_string();

        assert!(form.to_draft().is_ok());
    }
}

use thiserror::Error;

use crate::calendar::Event;
use crate::remote::api::{ApiError, CalendarApi, EventDraft, GoogleCalendarClient};
use crate::session::Session;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("API error: {0}")]
    ApiError(#[from] ApiError),
}

/// Resolved local IANA timezone identifier, stamped onto created events.
pub fn local_timezone_id() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|e| {
        tracing::warn!("Could not resolve local timezone, using UTC: {}", e);
        "UTC".to_string()
    })
}

/// Thin orchestration over the calendar API. The session is threaded in
/// per call; nothing is cached across calls.
pub struct CalendarService {
    api: Box<dyn CalendarApi>,
}

impl CalendarService {
    pub fn new() -> Self {
        Self {
            api: Box::new(GoogleCalendarClient::new()),
        }
    }

    pub fn with_api(api: Box<dyn CalendarApi>) -> Self {
        Self { api }
    }

    pub async fn fetch_events(&self, session: &Session) -> Result<Vec<Event>, ServiceError> {
        let events = self.api.fetch_events(&session.access_token).await?;
        Ok(events)
    }

    pub async fn create_event(
        &self,
        session: &Session,
        draft: &EventDraft,
    ) -> Result<(), ServiceError> {
        let time_zone = local_timezone_id();
        self.api
            .create_event(&session.access_token, draft, &time_zone)
            .await?;
        Ok(())
    }
}

impl Default for CalendarService {
    fn default() -> Self {
        Self::new()
    }
}

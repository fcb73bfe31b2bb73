use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calendar::{Event, EventTime};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Rate limit exceeded")]
    RateLimited,
    #[error("Authentication failed")]
    AuthenticationFailed,
}

/// Payload for a calendar write. Start and end are taken from the form
/// as entered; a reversed pair goes to the server as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub summary: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    start: Option<ApiEventTime>,
    end: Option<ApiEventTime>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiEventTime {
    #[serde(rename = "dateTime", skip_serializing_if = "Option::is_none")]
    date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(rename = "timeZone", skip_serializing_if = "Option::is_none")]
    time_zone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventListResponse {
    items: Option<Vec<ApiEvent>>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalendarApi: Send + Sync {
    async fn fetch_events(&self, access_token: &str) -> Result<Vec<Event>, ApiError>;

    async fn create_event(
        &self,
        access_token: &str,
        draft: &EventDraft,
        time_zone: &str,
    ) -> Result<(), ApiError>;
}

pub struct GoogleCalendarClient {
    base_url: String,
    client: reqwest::Client,
}

impl GoogleCalendarClient {
    pub fn new() -> Self {
        Self {
            base_url: "https://www.googleapis.com/calendar/v3".to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn events_url(&self) -> String {
        format!(
            "{}/calendars/{}/events",
            self.base_url,
            crate::calendar::DEFAULT_CALENDAR_ID
        )
    }
}

impl Default for GoogleCalendarClient {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_event_time(raw: &ApiEventTime) -> Option<EventTime> {
    if let Some(date_time) = &raw.date_time {
        let instant = DateTime::parse_from_rfc3339(date_time).ok()?;
        return Some(EventTime::Timed(instant.with_timezone(&Utc)));
    }
    if let Some(date) = &raw.date {
        let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
        return Some(EventTime::AllDay(day));
    }
    None
}

/// An item without an id or without a usable start is malformed input:
/// it is skipped, never a crash. A missing end mirrors the start.
fn convert_event(raw: ApiEvent) -> Option<Event> {
    let id = raw.id?;
    let start = raw.start.as_ref().and_then(parse_event_time)?;
    let end = raw.end.as_ref().and_then(parse_event_time).unwrap_or(start);

    Some(Event {
        id,
        summary: raw.summary,
        description: raw.description,
        start,
        end,
    })
}

#[async_trait]
impl CalendarApi for GoogleCalendarClient {
    async fn fetch_events(&self, access_token: &str) -> Result<Vec<Event>, ApiError> {
        let url = self.events_url();
        tracing::info!("Fetching events from primary calendar");

        let response = self
            .client
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        tracing::info!("Fetch events response status: {}", status);

        if status == 401 {
            tracing::error!("Authentication failed when fetching events");
            return Err(ApiError::AuthenticationFailed);
        }

        if status == 429 {
            tracing::warn!("Rate limit exceeded");
            return Err(ApiError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await?;
            tracing::error!("Failed to fetch events. Status: {}, Body: {}", status, body);
            return Err(ApiError::RequestError(format!("Status {}: {}", status, body)));
        }

        let event_list: EventListResponse = response.json().await?;
        let raw_items = event_list.items.unwrap_or_default();
        let total = raw_items.len();

        let events: Vec<Event> = raw_items.into_iter().filter_map(convert_event).collect();

        if events.len() < total {
            tracing::warn!("Skipped {} malformed events", total - events.len());
        }
        tracing::info!("Fetched {} events successfully", events.len());

        Ok(events)
    }

    async fn create_event(
        &self,
        access_token: &str,
        draft: &EventDraft,
        time_zone: &str,
    ) -> Result<(), ApiError> {
        let url = self.events_url();
        let payload = ApiEvent {
            id: None,
            summary: Some(draft.summary.clone()),
            description: Some(draft.description.clone()),
            start: Some(ApiEventTime {
                date_time: Some(draft.start.to_rfc3339()),
                date: None,
                time_zone: Some(time_zone.to_string()),
            }),
            end: Some(ApiEventTime {
                date_time: Some(draft.end.to_rfc3339()),
                date: None,
                time_zone: Some(time_zone.to_string()),
            }),
        };

        tracing::info!("Creating event: {} at {}", draft.summary, draft.start);

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        tracing::info!("Create event response status: {}", status);

        if status == 401 {
            tracing::error!("Authentication failed when creating event");
            return Err(ApiError::AuthenticationFailed);
        }

        if !status.is_success() {
            let body = response.text().await?;
            tracing::error!("Failed to create event. Status: {}, Body: {}", status, body);
            return Err(ApiError::RequestError(format!("Status {}: {}", status, body)));
        }

        Ok(())
    }
}

pub mod api;
pub mod service;

pub use api::{ApiError, CalendarApi, EventDraft, GoogleCalendarClient};
pub use service::{CalendarService, ServiceError};

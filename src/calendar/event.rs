use chrono::{DateTime, NaiveDate, Utc};

pub const NO_TITLE: &str = "No Title";

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
}

/// Upstream events come in two shapes: timed ones carry a `dateTime`,
/// all-day ones carry a `date`. Consumers treat them interchangeably
/// through the effective-timestamp projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventTime {
    Timed(DateTime<Utc>),
    AllDay(NaiveDate),
}

impl EventTime {
    pub fn effective(&self) -> DateTime<Utc> {
        match self {
            EventTime::Timed(instant) => *instant,
            EventTime::AllDay(date) => date
                .and_hms_opt(0, 0, 0)
                .unwrap_or_default()
                .and_utc(),
        }
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, EventTime::AllDay(_))
    }
}

impl Event {
    pub fn effective_start(&self) -> DateTime<Utc> {
        self.start.effective()
    }

    pub fn display_title(&self) -> &str {
        match self.summary.as_deref() {
            Some(summary) if !summary.is_empty() => summary,
            _ => NO_TITLE,
        }
    }

    pub fn is_all_day(&self) -> bool {
        self.start.is_all_day()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn timed_event(id: &str, start: DateTime<Utc>) -> Event {
        Event {
            id: id.to_string(),
            summary: Some(format!("Event {}", id)),
            description: None,
            start: EventTime::Timed(start),
            end: EventTime::Timed(start + chrono::Duration::hours(1)),
        }
    }

    #[test]
    fn timed_event_projects_its_instant() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let event = timed_event("e1", start);

        assert_eq!(event.effective_start(), start);
    }

    #[test]
    fn all_day_event_projects_to_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let time = EventTime::AllDay(date);

        assert_eq!(
            time.effective(),
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn missing_summary_falls_back_to_no_title() {
        let mut event = timed_event("e1", Utc::now());
        event.summary = None;

        assert_eq!(event.display_title(), NO_TITLE);
    }

    #[test]
    fn empty_summary_falls_back_to_no_title() {
        let mut event = timed_event("e1", Utc::now());
        event.summary = Some(String::new());

        assert_eq!(event.display_title(), NO_TITLE);
    }

    #[test]
    fn present_summary_is_displayed() {
        let event = timed_event("e1", Utc::now());

        assert_eq!(event.display_title(), "Event e1");
    }

    #[test]
    fn all_day_flag_follows_start_shape() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let event = Event {
            id: "e1".to_string(),
            summary: None,
            description: None,
            start: EventTime::AllDay(date),
            end: EventTime::AllDay(date),
        };

        assert!(event.is_all_day());
    }
}

pub mod event;

pub use event::{Event, EventTime, NO_TITLE};

pub const DEFAULT_CALENDAR_ID: &str = "primary";

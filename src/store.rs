use crate::calendar::Event;

/// Session-local cache of remote events plus the derived filtered view.
/// The remote calendar is the source of truth: contents are replaced
/// wholesale by a fetch, never patched in place.
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
    filtered: Vec<Event>,
    filter_date: String,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the store contents with a fetched result set, sorted by
    /// descending effective timestamp (input order preserved among ties).
    /// An empty result set leaves the previous contents untouched and
    /// only records a diagnostic. Returns whether the store was replaced.
    pub fn apply_fetch(&mut self, mut items: Vec<Event>) -> bool {
        if items.is_empty() {
            tracing::info!(
                "No events found in response, keeping {} cached",
                self.events.len()
            );
            return false;
        }

        items.sort_by(|a, b| b.effective_start().cmp(&a.effective_start()));
        self.events = items;
        self.recompute();
        true
    }

    /// An empty string resets the view to the full list.
    pub fn set_filter(&mut self, date: &str) {
        self.filter_date = date.to_string();
        self.recompute();
    }

    pub fn push_filter_char(&mut self, c: char) {
        let mut date = self.filter_date.clone();
        date.push(c);
        self.set_filter(&date);
    }

    pub fn pop_filter_char(&mut self) {
        let mut date = self.filter_date.clone();
        date.pop();
        self.set_filter(&date);
    }

    pub fn filter_date(&self) -> &str {
        &self.filter_date
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn filtered(&self) -> &[Event] {
        &self.filtered
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.filtered.clear();
        self.filter_date.clear();
    }

    fn recompute(&mut self) {
        if self.filter_date.is_empty() {
            self.filtered = self.events.clone();
        } else {
            self.filtered = self
                .events
                .iter()
                .filter(|event| {
                    event
                        .effective_start()
                        .to_rfc3339()
                        .starts_with(&self.filter_date)
                })
                .cloned()
                .collect();
        }
    }
}

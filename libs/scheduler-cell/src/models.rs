use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_utils::timestamp;

/// json-server style ids come back as numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventId {
    Number(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(default)]
    pub id: Option<EventId>,
    pub title: String,
    #[serde(with = "timestamp")]
    pub start: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub end: DateTime<Utc>,
}

/// Body of `POST /appointments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCalendarEvent {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventDraft {
    pub title: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl EventDraft {
    /// `None` unless title, start and end are all present.
    pub fn complete(&self) -> Option<NewCalendarEvent> {
        if self.title.is_empty() {
            return None;
        }
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(NewCalendarEvent {
                title: self.title.clone(),
                start,
                end,
            }),
            _ => None,
        }
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use shared_utils::html::display_instant;

use crate::models::{CalendarEvent, EventDraft};
use crate::view::SchedulerState;

pub const MISSING_FIELDS_ALERT: &str =
    "Please provide a title and select a time slot for the appointment.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchedulerScreen {
    pub draft: EventDraft,
    pub alert: Option<&'static str>,
    pub days: Vec<CalendarDay>,
}

/// Events starting on one calendar day (UTC), earliest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub events: Vec<EventEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventEntry {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub label: String,
}

fn entry(event: &CalendarEvent) -> EventEntry {
    EventEntry {
        title: event.title.clone(),
        start: event.start,
        end: event.end,
        label: format!("{} - {}", display_instant(&event.start), event.end.format("%H:%M")),
    }
}

pub fn render(state: &SchedulerState) -> SchedulerScreen {
    let mut events: Vec<&CalendarEvent> = state.events.iter().collect();
    events.sort_by_key(|event| (event.start, event.end));

    let mut days: Vec<CalendarDay> = Vec::new();
    for event in events {
        let date = event.start.date_naive();
        match days.last_mut() {
            Some(day) if day.date == date => day.events.push(entry(event)),
            _ => days.push(CalendarDay {
                date,
                events: vec![entry(event)],
            }),
        }
    }

    SchedulerScreen {
        draft: state.draft.clone(),
        alert: state.show_alert.then_some(MISSING_FIELDS_ALERT),
        days,
    }
}

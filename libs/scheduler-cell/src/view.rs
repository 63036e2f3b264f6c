use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::error::SchedulerError;
use crate::models::{CalendarEvent, EventDraft};
use crate::screen::{render, SchedulerScreen};
use crate::services::SchedulerApiClient;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchedulerState {
    pub events: Vec<CalendarEvent>,
    pub draft: EventDraft,
    pub show_alert: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// Title or time range missing; nothing was sent.
    Invalid,
    Created,
    Failed,
}

/// Calendar of appointments plus a draft for creating a new one.
pub struct SchedulerView {
    client: SchedulerApiClient,
    state: RwLock<SchedulerState>,
}

impl SchedulerView {
    pub fn new(client: SchedulerApiClient) -> Self {
        Self {
            client,
            state: RwLock::new(SchedulerState::default()),
        }
    }

    /// Creates the view and loads the current appointments.
    pub async fn mount(client: SchedulerApiClient) -> Self {
        let view = Self::new(client);
        view.load_appointments().await;
        info!("Scheduler view mounted");
        view
    }

    pub async fn state(&self) -> SchedulerState {
        self.state.read().await.clone()
    }

    pub async fn screen(&self) -> SchedulerScreen {
        render(&*self.state.read().await)
    }

    pub async fn load_appointments(&self) {
        match self.client.list_appointments().await {
            Ok(events) => {
                debug!("Loaded {} appointments", events.len());
                self.state.write().await.events = events;
            }
            Err(e) => error!("Error fetching appointments: {}", e),
        }
    }

    pub async fn set_title(&self, title: &str) {
        self.state.write().await.draft.title = title.to_string();
    }

    pub async fn select_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) {
        let mut state = self.state.write().await;
        state.draft.start = Some(start);
        state.draft.end = Some(end);
    }

    /// On success the draft is cleared but a previously raised alert stays visible.
    pub async fn create_appointment(&self) -> CreateOutcome {
        let event = {
            let mut state = self.state.write().await;
            match state.draft.complete() {
                Some(event) => event,
                None => {
                    state.show_alert = true;
                    return CreateOutcome::Invalid;
                }
            }
        };

        match self.client.create_appointment(&event).await {
            Ok(created) => {
                debug!("Appointment created: {:?}", created);
                self.load_appointments().await;
                self.state.write().await.draft = EventDraft::default();
                CreateOutcome::Created
            }
            Err(e @ SchedulerError::ApiError { .. }) => {
                warn!("Appointment was not created: {}", e);
                CreateOutcome::Failed
            }
            Err(e) => {
                error!("Error creating appointment: {}", e);
                CreateOutcome::Failed
            }
        }
    }
}

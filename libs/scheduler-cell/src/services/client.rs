use reqwest::{Client, Response};
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::error::SchedulerError;
use crate::models::{CalendarEvent, NewCalendarEvent};

/// Client for the appointments REST server backing the calendar.
#[derive(Clone)]
pub struct SchedulerApiClient {
    client: Client,
    base_url: String,
}

impl SchedulerApiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.scheduler_api_url.trim_end_matches('/').to_string(),
        }
    }

    fn appointments_url(&self) -> String {
        format!("{}/appointments", self.base_url)
    }

    async fn check_status(response: Response) -> Result<Response, SchedulerError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        error!("Scheduler API error ({}): {}", status, body);
        Err(SchedulerError::ApiError {
            status: status.as_u16(),
            body,
        })
    }

    pub async fn list_appointments(&self) -> Result<Vec<CalendarEvent>, SchedulerError> {
        let url = self.appointments_url();
        debug!("Fetching appointments from {}", url);

        let response = self.client.get(&url).send().await?;
        let events = Self::check_status(response).await?
            .json::<Vec<CalendarEvent>>()
            .await?;

        Ok(events)
    }

    /// Returns the created record when the server echoes one back.
    pub async fn create_appointment(
        &self,
        event: &NewCalendarEvent,
    ) -> Result<Option<CalendarEvent>, SchedulerError> {
        let url = self.appointments_url();
        debug!("Creating appointment '{}' at {}", event.title, url);

        let response = self.client.post(&url).json(event).send().await?;
        let response = Self::check_status(response).await?;

        let body = response.text().await?;
        Ok(serde_json::from_str::<CalendarEvent>(&body).ok())
    }
}

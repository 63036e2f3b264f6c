use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Scheduler request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Scheduler API returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Invalid time value: {0}")]
    InvalidTime(String),
}

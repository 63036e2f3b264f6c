use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, PartialEq)]
pub enum BookingError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Unsupported species: {0}")]
    InvalidSpecies(String),

    #[error("Slot {0} is not one of the offered slots")]
    UnknownSlot(DateTime<Utc>),

    #[error("Veterinarian {0} is not in the directory")]
    UnknownVet(Uuid),

    #[error("No active session")]
    NoSession,
}

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_utils::timestamp;

use crate::error::BookingError;

/// A single bookable instant.
pub type Slot = DateTime<Utc>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Dog,
    Cat,
}

impl Species {
    pub const ALL: [Species; 2] = [Species::Dog, Species::Cat];

    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Dog => "dog",
            Species::Cat => "cat",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Species::Dog => "Dog",
            Species::Cat => "Cat",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dog" => Ok(Species::Dog),
            "cat" => Ok(Species::Cat),
            other => Err(BookingError::InvalidSpecies(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeField {
    Name,
    Species,
    Breed,
    ReasonForVisit,
}

/// Unsaved pet information held by the booking view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PetIntakeDraft {
    pub name: String,
    pub species: Option<Species>,
    pub breed: String,
    pub reason_for_visit: String,
}

impl PetIntakeDraft {
    pub fn set_field(&mut self, field: IntakeField, value: &str) -> Result<(), BookingError> {
        match field {
            IntakeField::Name => self.name = value.to_string(),
            IntakeField::Species => {
                self.species = if value.trim().is_empty() {
                    None
                } else {
                    Some(value.parse()?)
                };
            }
            IntakeField::Breed => self.breed = value.to_string(),
            IntakeField::ReasonForVisit => self.reason_for_visit = value.to_string(),
        }
        Ok(())
    }

    /// Name, species and reason are required; breed is optional.
    pub fn validate(&self) -> Result<(), BookingError> {
        let mut missing = Vec::new();

        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.species.is_none() {
            missing.push("species");
        }
        if self.reason_for_visit.trim().is_empty() {
            missing.push("reason_for_visit");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(BookingError::MissingFields(missing))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Veterinarian {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetName {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentAppointment {
    #[serde(default, with = "timestamp::option")]
    pub appointment_datetime: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pets: Option<PetName>,
}

/// Treatment row joined with its appointment and pet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Treatment {
    pub id: Uuid,
    #[serde(with = "timestamp")]
    pub treatment_date: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub appointments: Option<TreatmentAppointment>,
}

impl Treatment {
    pub fn pet_name(&self) -> Option<&str> {
        self.appointments
            .as_ref()
            .and_then(|appointment| appointment.pets.as_ref())
            .map(|pet| pet.name.as_str())
    }

    pub fn appointment_datetime(&self) -> Option<DateTime<Utc>> {
        self.appointments
            .as_ref()
            .and_then(|appointment| appointment.appointment_datetime)
    }
}

/// Insert payload for the `appointments` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub pet_id: String,
    pub vet_id: Uuid,
    pub appointment_datetime: DateTime<Utc>,
    pub reason_for_visit: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotQuery {
    pub vet_id: Option<Uuid>,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

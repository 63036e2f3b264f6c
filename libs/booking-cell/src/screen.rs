use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use auth_cell::Access;
use shared_utils::html::display_instant;

use crate::models::{PetIntakeDraft, Slot};
use crate::view::BookingState;

pub const OWNER_TITLE: &str = "Book an Appointment";
pub const ADMIN_TITLE: &str = "Admin Dashboard";

/// What the booking view shows for a given state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum BookingScreen {
    /// No session. Only the login placeholder is shown.
    Login,
    /// Session present, role lookup still in flight.
    Loading,
    Dashboard(Dashboard),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub title: &'static str,
    pub intake: Option<PetIntakeDraft>,
    pub slots: Option<Vec<SlotOption>>,
    pub vet_picker: Option<Vec<VetOption>>,
    pub can_book: bool,
    pub treatments: Vec<TreatmentEntry>,
    pub admin_panel: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotOption {
    pub instant: Slot,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VetOption {
    pub id: Uuid,
    pub name: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreatmentEntry {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub pet_name: Option<String>,
    pub appointment_datetime: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub notes: Option<String>,
}

pub fn render(state: &BookingState) -> BookingScreen {
    if state.session.is_none() {
        return BookingScreen::Login;
    }

    let is_admin = match state.access {
        Access::Unknown => return BookingScreen::Loading,
        Access::Admin => true,
        Access::Owner => false,
    };

    let treatments = state
        .treatments
        .iter()
        .map(|treatment| TreatmentEntry {
            id: treatment.id,
            date: treatment.treatment_date,
            pet_name: treatment.pet_name().map(str::to_string),
            appointment_datetime: treatment.appointment_datetime(),
            description: treatment.description.clone(),
            notes: treatment.notes.clone(),
        })
        .collect();

    if is_admin {
        return BookingScreen::Dashboard(Dashboard {
            title: ADMIN_TITLE,
            intake: None,
            slots: None,
            vet_picker: None,
            can_book: false,
            treatments,
            admin_panel: true,
        });
    }

    let slots = (!state.available_slots.is_empty()).then(|| {
        state
            .available_slots
            .iter()
            .map(|slot| SlotOption {
                instant: *slot,
                label: display_instant(slot),
                selected: state.selected_slot == Some(*slot),
            })
            .collect()
    });

    let vet_picker = state.selected_slot.map(|_| {
        state
            .vets
            .iter()
            .map(|vet| VetOption {
                id: vet.id,
                name: vet.name.clone(),
                selected: state.selected_vet == Some(vet.id),
            })
            .collect()
    });

    BookingScreen::Dashboard(Dashboard {
        title: OWNER_TITLE,
        intake: Some(state.intake.clone()),
        slots,
        vet_picker,
        can_book: state.can_book(),
        treatments,
        admin_panel: false,
    })
}

use std::sync::Arc;

use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use shared_models::error::AppError;

use crate::error::BookingError;
use crate::html::render_page;
use crate::models::{PetIntakeDraft, Species};
use crate::screen::BookingScreen;
use crate::view::{BookingOutcome, BookingView};

const BOOKING_PAGE: &str = "/booking";

#[derive(Debug, Default, Deserialize)]
pub struct IntakeForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub species: String,
    #[serde(default)]
    pub breed: String,
    #[serde(default)]
    pub reason_for_visit: String,
}

impl IntakeForm {
    pub fn into_draft(self) -> Result<PetIntakeDraft, BookingError> {
        let species = if self.species.trim().is_empty() {
            None
        } else {
            Some(self.species.parse::<Species>()?)
        };

        Ok(PetIntakeDraft {
            name: self.name,
            species,
            breed: self.breed,
            reason_for_visit: self.reason_for_visit,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SlotForm {
    pub slot: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct VetForm {
    #[serde(default)]
    pub vet_id: String,
}

async fn page_with_notice(view: &BookingView, status: StatusCode, notice: &str) -> Response {
    let screen = view.screen().await;
    (status, Html(render_page(&screen, Some(notice)))).into_response()
}

fn rejected(error: BookingError) -> AppError {
    match error {
        BookingError::NoSession => AppError::Auth(error.to_string()),
        other => AppError::BadRequest(other.to_string()),
    }
}

pub async fn booking_page(State(view): State<Arc<BookingView>>) -> Html<String> {
    let screen = view.screen().await;
    Html(render_page(&screen, None))
}

pub async fn booking_screen(State(view): State<Arc<BookingView>>) -> Json<BookingScreen> {
    Json(view.screen().await)
}

pub async fn submit_intake(
    State(view): State<Arc<BookingView>>,
    Form(form): Form<IntakeForm>,
) -> Result<Response, AppError> {
    let draft = match form.into_draft() {
        Ok(draft) => draft,
        Err(e) => return Ok(page_with_notice(&view, StatusCode::BAD_REQUEST, &e.to_string()).await),
    };
    view.set_intake(draft).await;

    match view.submit_intake().await {
        Ok(slots) => {
            debug!("Intake accepted, {} slots offered", slots.len());
            Ok(Redirect::to(BOOKING_PAGE).into_response())
        }
        Err(e @ BookingError::MissingFields(_)) => {
            Ok(page_with_notice(&view, StatusCode::BAD_REQUEST, &e.to_string()).await)
        }
        Err(e) => Err(rejected(e)),
    }
}

pub async fn select_slot(
    State(view): State<Arc<BookingView>>,
    Form(form): Form<SlotForm>,
) -> Result<Redirect, AppError> {
    view.select_slot(form.slot).await.map_err(rejected)?;
    Ok(Redirect::to(BOOKING_PAGE))
}

pub async fn select_vet(
    State(view): State<Arc<BookingView>>,
    Form(form): Form<VetForm>,
) -> Result<Redirect, AppError> {
    let vet_id = match form.vet_id.trim() {
        "" => None,
        raw => Some(
            Uuid::parse_str(raw)
                .map_err(|_| AppError::BadRequest(format!("Invalid veterinarian id: {}", raw)))?,
        ),
    };

    view.select_vet(vet_id).await.map_err(rejected)?;
    Ok(Redirect::to(BOOKING_PAGE))
}

/// Booking failures are only logged; the page keeps the selections for another try.
pub async fn submit_booking(State(view): State<Arc<BookingView>>) -> Redirect {
    match view.submit_booking().await {
        BookingOutcome::Booked { vet_id, slot } => debug!("Booked vet {} at {}", vet_id, slot),
        BookingOutcome::NotReady => debug!("Booking requested before slot and vet were chosen"),
        BookingOutcome::Failed => debug!("Booking attempt failed"),
    }
    Redirect::to(BOOKING_PAGE)
}

pub async fn logout(State(view): State<Arc<BookingView>>) -> Redirect {
    view.logout().await;
    Redirect::to(BOOKING_PAGE)
}

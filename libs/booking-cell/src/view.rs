use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use auth_cell::{Access, AuthService, RoleService};
use shared_config::AppConfig;
use shared_models::auth::Session;

use crate::error::BookingError;
use crate::models::{
    IntakeField, NewAppointment, PetIntakeDraft, Slot, SlotQuery, Treatment, Veterinarian,
};
use crate::screen::{render, BookingScreen};
use crate::services::availability::normalize_slots;
use crate::services::{
    AppointmentService, AvailabilityProvider, ClinicDirectoryService, MockAvailabilityProvider,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookingState {
    #[serde(skip)]
    pub session: Option<Session>,
    pub access: Access,
    pub intake: PetIntakeDraft,
    pub available_slots: Vec<Slot>,
    pub selected_slot: Option<Slot>,
    pub vets: Vec<Veterinarian>,
    pub selected_vet: Option<Uuid>,
    pub treatments: Vec<Treatment>,
}

impl BookingState {
    pub fn can_book(&self) -> bool {
        self.selected_slot.is_some() && self.selected_vet.is_some()
    }

    /// Same user as `session`, whatever the token.
    fn belongs_to(&self, session: &Session) -> bool {
        self.session
            .as_ref()
            .map(|current| current.user_id() == session.user_id())
            .unwrap_or(false)
    }

    fn holds_session(&self, session: &Session) -> bool {
        self.session
            .as_ref()
            .map(|current| current.access_token == session.access_token)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookingOutcome {
    /// Slot or vet missing; nothing was sent.
    NotReady,
    Booked { vet_id: Uuid, slot: Slot },
    /// The insert failed; selections are kept for another attempt.
    Failed,
}

/// Collaborators of the booking view.
pub struct BookingServices {
    pub auth: Arc<AuthService>,
    pub roles: RoleService,
    pub directory: ClinicDirectoryService,
    pub appointments: AppointmentService,
    pub availability: Arc<dyn AvailabilityProvider>,
    pub placeholder_pet_id: String,
    pub slot_window: Duration,
}

impl BookingServices {
    pub fn new(config: &AppConfig, auth: Arc<AuthService>) -> Self {
        let supabase = auth.supabase().clone();

        Self {
            roles: RoleService::with_client(supabase.clone()),
            directory: ClinicDirectoryService::with_client(supabase.clone()),
            appointments: AppointmentService::with_client(supabase),
            availability: Arc::new(MockAvailabilityProvider::default()),
            placeholder_pet_id: config.placeholder_pet_id.clone(),
            slot_window: Duration::days(config.slot_window_days),
            auth,
        }
    }

    pub fn with_availability(mut self, provider: Arc<dyn AvailabilityProvider>) -> Self {
        self.availability = provider;
        self
    }
}

struct ViewInner {
    services: BookingServices,
    state: RwLock<BookingState>,
}

impl ViewInner {
    async fn apply_session(&self, session: Option<Session>) {
        let session = match session {
            Some(session) => session,
            None => {
                debug!("Session cleared, resetting booking view");
                *self.state.write().await = BookingState::default();
                return;
            }
        };

        {
            let mut state = self.state.write().await;
            if !state.belongs_to(&session) {
                debug!("Session switched to user {}, resetting booking view", session.user_id());
                *state = BookingState {
                    session: Some(session.clone()),
                    ..BookingState::default()
                };
            } else {
                if !state.holds_session(&session) {
                    state.access = Access::Unknown;
                }
                state.session = Some(session.clone());
            }
        }

        futures::join!(
            self.derive_access(&session),
            self.load_reference_data(&session),
        );
    }

    /// A failed lookup falls back to the owner view.
    async fn derive_access(&self, session: &Session) {
        let access = match self
            .services
            .roles
            .lookup_access(session.user_id(), &session.access_token)
            .await
        {
            Ok(access) => access,
            Err(e) => {
                error!("Error checking admin status: {}", e);
                Access::Owner
            }
        };

        let mut state = self.state.write().await;
        if state.holds_session(session) {
            state.access = access;
        }
    }

    async fn load_reference_data(&self, session: &Session) {
        let token = session.access_token.as_str();
        let (vets, treatments) = futures::join!(
            self.services.directory.fetch_veterinarians(token),
            self.services.directory.fetch_treatment_history(token),
        );

        let mut state = self.state.write().await;
        if !state.holds_session(session) {
            return;
        }

        match vets {
            Ok(vets) => state.vets = vets,
            Err(e) => error!("Error fetching vets: {}", e),
        }
        match treatments {
            Ok(treatments) => state.treatments = treatments,
            Err(e) => error!("Error fetching previous treatments: {}", e),
        }
    }

    async fn refresh_treatments(&self, session: &Session) {
        match self
            .services
            .directory
            .fetch_treatment_history(&session.access_token)
            .await
        {
            Ok(treatments) => {
                let mut state = self.state.write().await;
                if state.holds_session(session) {
                    state.treatments = treatments;
                }
            }
            Err(e) => error!("Error fetching previous treatments: {}", e),
        }
    }
}

/// Pet intake, slot and vet selection, booking and treatment history for one user.
///
/// Holds a session-change subscription from [`BookingView::mount`] until
/// [`BookingView::teardown`] (or drop).
pub struct BookingView {
    inner: Arc<ViewInner>,
    listener: Option<JoinHandle<()>>,
}

impl BookingView {
    pub async fn mount(services: BookingServices) -> Self {
        let inner = Arc::new(ViewInner {
            services,
            state: RwLock::new(BookingState::default()),
        });

        // Subscribe before reading so a change in between is not lost
        let mut subscription = inner.services.auth.on_auth_state_change();

        let session = inner.services.auth.get_session().await;
        inner.apply_session(session).await;

        let listener_inner = Arc::clone(&inner);
        let listener = tokio::spawn(async move {
            while let Some(change) = subscription.next().await {
                debug!("Auth state changed: {:?}", change.event);
                listener_inner.apply_session(change.session).await;
            }
            subscription.unsubscribe();
        });

        info!("Booking view mounted");
        Self {
            inner,
            listener: Some(listener),
        }
    }

    /// Releases the session subscription and waits for the listener to stop.
    pub async fn teardown(mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
            if let Err(e) = listener.await {
                if !e.is_cancelled() {
                    warn!("Booking view listener ended abnormally: {}", e);
                }
            }
        }
        info!("Booking view torn down");
    }

    pub async fn state(&self) -> BookingState {
        self.inner.state.read().await.clone()
    }

    pub async fn screen(&self) -> BookingScreen {
        render(&*self.inner.state.read().await)
    }

    pub async fn update_intake(&self, field: IntakeField, value: &str) -> Result<(), BookingError> {
        self.inner.state.write().await.intake.set_field(field, value)
    }

    pub async fn set_intake(&self, draft: PetIntakeDraft) {
        self.inner.state.write().await.intake = draft;
    }

    /// Validates the draft and replaces the candidate slots.
    pub async fn submit_intake(&self) -> Result<Vec<Slot>, BookingError> {
        let query = {
            let state = self.inner.state.read().await;
            if state.session.is_none() {
                return Err(BookingError::NoSession);
            }
            state.intake.validate()?;

            let from = Utc::now();
            SlotQuery {
                vet_id: state.selected_vet,
                from,
                to: from + self.inner.services.slot_window,
            }
        };

        let slots = match self.inner.services.availability.get_slots(&query).await {
            Ok(slots) => normalize_slots(slots),
            Err(e) => {
                error!("Error fetching available slots: {}", e);
                Vec::new()
            }
        };

        let mut state = self.inner.state.write().await;
        if let Some(selected) = state.selected_slot {
            if !slots.contains(&selected) {
                state.selected_slot = None;
            }
        }
        state.available_slots = slots.clone();

        debug!("Offering {} slots", slots.len());
        Ok(slots)
    }

    pub async fn select_slot(&self, slot: Slot) -> Result<(), BookingError> {
        let mut state = self.inner.state.write().await;
        if !state.available_slots.contains(&slot) {
            return Err(BookingError::UnknownSlot(slot));
        }
        state.selected_slot = Some(slot);
        Ok(())
    }

    /// `None` clears the selection.
    pub async fn select_vet(&self, vet_id: Option<Uuid>) -> Result<(), BookingError> {
        let mut state = self.inner.state.write().await;
        if let Some(id) = vet_id {
            if !state.vets.iter().any(|vet| vet.id == id) {
                return Err(BookingError::UnknownVet(id));
            }
        }
        state.selected_vet = vet_id;
        Ok(())
    }

    pub async fn submit_booking(&self) -> BookingOutcome {
        let (session, appointment) = {
            let state = self.inner.state.read().await;
            let (slot, vet_id, session) =
                match (state.selected_slot, state.selected_vet, state.session.clone()) {
                    (Some(slot), Some(vet_id), Some(session)) => (slot, vet_id, session),
                    _ => return BookingOutcome::NotReady,
                };

            let appointment = NewAppointment {
                pet_id: self.inner.services.placeholder_pet_id.clone(),
                vet_id,
                appointment_datetime: slot,
                reason_for_visit: state.intake.reason_for_visit.clone(),
            };
            (session, appointment)
        };

        match self
            .inner
            .services
            .appointments
            .create_appointment(&appointment, &session.access_token)
            .await
        {
            Ok(()) => {
                self.inner.refresh_treatments(&session).await;
                BookingOutcome::Booked {
                    vet_id: appointment.vet_id,
                    slot: appointment.appointment_datetime,
                }
            }
            Err(e) => {
                error!("Error booking appointment: {}", e);
                BookingOutcome::Failed
            }
        }
    }

    pub async fn logout(&self) {
        match self.inner.services.auth.sign_out().await {
            Ok(()) => self.inner.apply_session(None).await,
            Err(e) => error!("Error logging out: {}", e),
        }
    }
}

impl Drop for BookingView {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}

use anyhow::Result;
use reqwest::Method;
use tracing::{debug, info};

use shared_database::supabase::SupabaseClient;

use crate::models::NewAppointment;

pub struct AppointmentService {
    supabase: SupabaseClient,
}

impl AppointmentService {
    pub fn with_client(supabase: SupabaseClient) -> Self {
        Self { supabase }
    }

    /// Single insert into `appointments`. Any 2xx counts as booked; the row is not read back.
    /// No overlap check is made.
    pub async fn create_appointment(
        &self,
        appointment: &NewAppointment,
        auth_token: &str,
    ) -> Result<()> {
        debug!(
            "Booking vet {} at {} for pet {}",
            appointment.vet_id, appointment.appointment_datetime, appointment.pet_id
        );

        self.supabase.execute(
            Method::POST,
            "/rest/v1/appointments",
            Some(auth_token),
            Some(serde_json::to_value(appointment)?),
        ).await?;

        info!("Appointment booked for vet {}", appointment.vet_id);
        Ok(())
    }
}

use anyhow::Result;
use reqwest::Method;
use tracing::debug;

use shared_database::supabase::SupabaseClient;

use crate::models::{Treatment, Veterinarian};

const TREATMENT_HISTORY_SELECT: &str =
    "*,appointments(appointment_datetime,pets(name))";

/// Read-only lookups the booking view needs: vets and treatment history.
pub struct ClinicDirectoryService {
    supabase: SupabaseClient,
}

impl ClinicDirectoryService {
    pub fn with_client(supabase: SupabaseClient) -> Self {
        Self { supabase }
    }

    pub async fn fetch_veterinarians(&self, auth_token: &str) -> Result<Vec<Veterinarian>> {
        debug!("Fetching veterinarians");

        let vets: Vec<Veterinarian> = self.supabase.request(
            Method::GET,
            "/rest/v1/veterinarians?select=*",
            Some(auth_token),
            None,
        ).await?;

        debug!("Fetched {} veterinarians", vets.len());
        Ok(vets)
    }

    /// Newest treatment first. Sorted again locally as well as via `order`,
    /// so the ordering holds even if the server drops the parameter.
    pub async fn fetch_treatment_history(&self, auth_token: &str) -> Result<Vec<Treatment>> {
        debug!("Fetching treatment history");

        let path = format!(
            "/rest/v1/treatments?select={}&order=treatment_date.desc",
            TREATMENT_HISTORY_SELECT
        );
        let mut treatments: Vec<Treatment> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        treatments.sort_by(|a, b| b.treatment_date.cmp(&a.treatment_date));
        Ok(treatments)
    }
}

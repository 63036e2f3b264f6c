use anyhow::{Result, anyhow};
use reqwest::Method;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Access, OwnerRole};

pub struct RoleService {
    supabase: SupabaseClient,
}

impl RoleService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub fn with_client(supabase: SupabaseClient) -> Self {
        Self { supabase }
    }

    /// Looks up the owner's clinic role. No row means a regular owner.
    pub async fn lookup_access(&self, user_id: &str, auth_token: &str) -> Result<Access> {
        debug!("Looking up role for user: {}", user_id);

        let path = format!("/rest/v1/owners?id=eq.{}&select=role", user_id);
        let rows: Vec<OwnerRole> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        if rows.len() > 1 {
            return Err(anyhow!("Expected at most one owner row for {}, got {}", user_id, rows.len()));
        }

        let role = rows.first().and_then(|row| row.role.as_deref());
        Ok(Access::from_role(role))
    }
}

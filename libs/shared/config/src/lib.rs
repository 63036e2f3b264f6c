use std::env;
use std::net::SocketAddr;
use tracing::warn;

pub const DEFAULT_SCHEDULER_API_URL: &str = "http://localhost:3001";
pub const DEFAULT_PLACEHOLDER_PET_ID: &str = "PLACEHOLDER_PET_ID";
pub const DEFAULT_SLOT_WINDOW_DAYS: i64 = 14;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    /// Access token of a previously established session, if any.
    pub supabase_access_token: Option<String>,
    pub scheduler_api_url: String,
    pub portal_addr: SocketAddr,
    /// Pet reference written into every booking until pet records are created up front.
    pub placeholder_pet_id: String,
    pub slot_window_days: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            supabase_access_token: None,
            scheduler_api_url: DEFAULT_SCHEDULER_API_URL.to_string(),
            portal_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            placeholder_pet_id: DEFAULT_PLACEHOLDER_PET_ID.to_string(),
            slot_window_days: DEFAULT_SLOT_WINDOW_DAYS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            supabase_access_token: env::var("SUPABASE_ACCESS_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),
            scheduler_api_url: env::var("SCHEDULER_API_URL")
                .unwrap_or_else(|_| {
                    warn!("SCHEDULER_API_URL not set, using default");
                    defaults.scheduler_api_url.clone()
                }),
            portal_addr: match env::var("PORTAL_ADDR") {
                Ok(raw) => raw.parse().unwrap_or_else(|_| {
                    warn!("PORTAL_ADDR '{}' is not a socket address, using default", raw);
                    defaults.portal_addr
                }),
                Err(_) => defaults.portal_addr,
            },
            placeholder_pet_id: env::var("PLACEHOLDER_PET_ID")
                .unwrap_or_else(|_| defaults.placeholder_pet_id.clone()),
            slot_window_days: match env::var("SLOT_WINDOW_DAYS") {
                Ok(raw) => match raw.parse::<i64>() {
                    Ok(days) if days > 0 => days,
                    _ => {
                        warn!("SLOT_WINDOW_DAYS '{}' is not a positive number, using default", raw);
                        defaults.slot_window_days
                    }
                },
                Err(_) => defaults.slot_window_days,
            },
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
    }
}

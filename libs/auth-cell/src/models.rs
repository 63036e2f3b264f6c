use serde::{Deserialize, Serialize};

use shared_models::auth::Session;

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthChangeEvent {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthStateChange {
    pub event: AuthChangeEvent,
    pub session: Option<Session>,
}

/// What the signed-in user may see. `Unknown` while the role lookup is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    #[default]
    Unknown,
    Owner,
    Admin,
}

impl Access {
    pub fn from_role(role: Option<&str>) -> Self {
        match role {
            Some(ADMIN_ROLE) => Access::Admin,
            _ => Access::Owner,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Access::Unknown)
    }
}

/// Row shape of `owners?select=role`.
#[derive(Debug, Clone, Deserialize)]
pub struct OwnerRole {
    #[serde(default)]
    pub role: Option<String>,
}

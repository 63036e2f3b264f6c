use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{Session, User};

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub scheduler_api_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            scheduler_api_url: "http://localhost:3001".to_string(),
        }
    }
}

impl TestConfig {
    /// Points both backends at mock servers.
    pub fn with_urls(supabase_url: impl Into<String>, scheduler_api_url: impl Into<String>) -> Self {
        Self {
            supabase_url: supabase_url.into(),
            scheduler_api_url: scheduler_api_url.into(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            scheduler_api_url: self.scheduler_api_url.clone(),
            ..AppConfig::default()
        }
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: "owner@example.com".to_string(),
            role: "owner".to_string(),
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn owner(email: &str) -> Self {
        Self::new(email, "owner")
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, "admin")
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            role: Some("authenticated".to_string()),
            metadata: None,
            created_at: Some(Utc::now()),
        }
    }

    pub fn to_session(&self) -> Session {
        Session::new(self.access_token(), self.to_user())
    }

    pub fn access_token(&self) -> String {
        format!("test-access-token-{}", self.id)
    }
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn user_response(user: &TestUser) -> serde_json::Value {
        json!({
            "id": user.id,
            "aud": "authenticated",
            "role": "authenticated",
            "email": user.email,
            "user_metadata": {},
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    /// Row set returned by `owners?id=eq.{id}&select=role`.
    pub fn owner_role_response(role: &str) -> serde_json::Value {
        json!([{ "role": role }])
    }

    pub fn veterinarian(id: Uuid, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "specialty": "General Practice",
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn treatment(treatment_date: &str, pet_name: &str, description: &str) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "appointment_id": Uuid::new_v4(),
            "treatment_date": treatment_date,
            "description": description,
            "notes": format!("Follow up for {}", pet_name),
            "appointments": {
                "appointment_datetime": treatment_date,
                "pets": { "name": pet_name }
            }
        })
    }

    pub fn appointment_response(pet_id: &str, vet_id: Uuid, appointment_datetime: &str) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "pet_id": pet_id,
            "vet_id": vet_id,
            "appointment_datetime": appointment_datetime,
            "reason_for_visit": "checkup",
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "message": message,
            "code": code,
            "details": null,
            "hint": null
        })
    }
}

use anyhow::{Result, anyhow};
use tokio::sync::{RwLock, broadcast};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::auth::Session;

use crate::models::{AuthChangeEvent, AuthStateChange};

const SUBSCRIPTION_CAPACITY: usize = 16;

/// Holds the current session and notifies subscribers whenever it changes.
pub struct AuthService {
    supabase: SupabaseClient,
    persisted_token: Option<String>,
    current_session: RwLock<Option<Session>>,
    sender: broadcast::Sender<AuthStateChange>,
}

impl AuthService {
    pub fn new(config: &AppConfig) -> Self {
        let (sender, _) = broadcast::channel(SUBSCRIPTION_CAPACITY);

        Self {
            supabase: SupabaseClient::new(config),
            persisted_token: config.supabase_access_token.clone(),
            current_session: RwLock::new(None),
            sender,
        }
    }

    pub fn supabase(&self) -> &SupabaseClient {
        &self.supabase
    }

    pub async fn get_session(&self) -> Option<Session> {
        self.current_session.read().await.clone()
    }

    /// Resolves the persisted access token (if any) into a session.
    pub async fn restore_session(&self) -> Option<Session> {
        let token = match &self.persisted_token {
            Some(token) => token.clone(),
            None => {
                debug!("No persisted session to restore");
                return None;
            }
        };

        match self.supabase.get_user(&token).await {
            Ok(user) => {
                info!("Restored session for user {}", user.id);
                let session = Session::new(token, user);
                self.replace_session(AuthChangeEvent::InitialSession, Some(session.clone())).await;
                Some(session)
            }
            Err(e) => {
                warn!("Could not restore persisted session: {}", e);
                None
            }
        }
    }

    pub async fn set_session(&self, session: Session) {
        debug!("Session established for user {}", session.user_id());
        self.replace_session(AuthChangeEvent::SignedIn, Some(session)).await;
    }

    pub async fn refresh_session(&self, session: Session) {
        self.replace_session(AuthChangeEvent::TokenRefreshed, Some(session)).await;
    }

    pub async fn sign_out(&self) -> Result<()> {
        let session = self.get_session().await
            .ok_or_else(|| anyhow!("No active session to sign out"))?;

        self.supabase.sign_out(&session.access_token).await?;

        info!("User {} signed out", session.user_id());
        self.replace_session(AuthChangeEvent::SignedOut, None).await;
        Ok(())
    }

    pub fn on_auth_state_change(&self) -> SessionSubscription {
        SessionSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    async fn replace_session(&self, event: AuthChangeEvent, session: Option<Session>) {
        {
            let mut current = self.current_session.write().await;
            *current = session.clone();
        }

        if self.sender.send(AuthStateChange { event, session }).is_err() {
            debug!("No subscribers for auth event {:?}", event);
        }
    }
}

/// Live registration for session changes; released when dropped.
pub struct SessionSubscription {
    receiver: broadcast::Receiver<AuthStateChange>,
}

impl SessionSubscription {
    /// Waits for the next change. `None` once the auth service is gone.
    pub async fn next(&mut self) -> Option<AuthStateChange> {
        loop {
            match self.receiver.recv().await {
                Ok(change) => return Some(change),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Session subscriber lagged, skipped {} changes", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    pub fn unsubscribe(self) {
        debug!("Session subscription released");
    }
}

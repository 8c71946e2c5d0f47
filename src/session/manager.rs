//! Session management
//!
//! One [`PortalSession`] per viewer: identity, view filters and the
//! assistant conversation. All mutation goes through [`SessionManager`].

use crate::assistant::types::{AssistantReply, ChatMessage, Conversation, TurnPending};
use crate::catalogue::policy;
use crate::catalogue::types::Role;
use crate::session::auth::{AuthRejection, CredentialVerifier};
use crate::session::types::*;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Session-level failures
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session '{0}' not found")]
    NotFound(String),

    #[error(transparent)]
    Auth(#[from] AuthRejection),

    #[error("A reply is still pending for this session")]
    Busy,
}

impl From<TurnPending> for SessionError {
    fn from(_: TurnPending) -> Self {
        Self::Busy
    }
}

/// A viewer's session
#[derive(Debug)]
pub struct PortalSession {
    pub id: String,
    pub identity: Identity,
    pub view: ViewState,
    pub conversation: Conversation,
    pub created_at: i64,
    last_activity: i64,
}

impl PortalSession {
    /// New anonymous session with default filters and a fresh conversation
    pub fn new() -> Self {
        let now = now_ms();
        Self {
            id: Uuid::new_v4().to_string(),
            identity: Identity::Anonymous,
            view: ViewState::default(),
            conversation: Conversation::new(),
            created_at: now,
            last_activity: now,
        }
    }

    pub fn touch(&mut self) {
        self.last_activity = now_ms();
    }

    pub fn last_activity(&self) -> i64 {
        self.last_activity
    }

    pub fn info(&self) -> SessionInfo {
        let role = self.identity.role();
        SessionInfo {
            id: self.id.clone(),
            identity: self.identity.clone(),
            effective_role: self.identity.effective_role(),
            can_create: policy::can_create(role),
            allowed_categories: policy::allowed_categories(role).to_vec(),
            view: self.view.clone(),
            reply_pending: self.conversation.is_pending(),
            created_at: self.created_at,
            last_activity: self.last_activity,
        }
    }
}

impl Default for PortalSession {
    fn default() -> Self {
        Self::new()
    }
}

/// What a viewer is currently looking at
#[derive(Debug, Clone)]
pub struct Viewer {
    pub identity: Identity,
    pub view: ViewState,
}

/// An accepted assistant turn, ready to be sent to the bridge
#[derive(Debug, Clone)]
pub struct PendingTurn {
    /// Turns preceding the new user message
    pub history: Vec<ChatMessage>,
    /// Role used for the tone hint
    pub role: Role,
}

/// Session manager
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, PortalSession>>>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            verifier,
        }
    }

    /// Create an anonymous session
    pub async fn create(&self) -> SessionInfo {
        let session = PortalSession::new();
        let info = session.info();
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session);

        tracing::info!("Created session {}", info.id);
        info
    }

    pub async fn info(&self, id: &str) -> Result<SessionInfo, SessionError> {
        self.sessions
            .read()
            .await
            .get(id)
            .map(PortalSession::info)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    /// Identity and filters for a query, refreshing the activity clock
    pub async fn viewer(&self, id: &str) -> Result<Viewer, SessionError> {
        self.with_session(id, |s| Viewer {
            identity: s.identity.clone(),
            view: s.view.clone(),
        })
        .await
    }

    /// Verify credentials and authenticate the session.
    ///
    /// On rejection the session keeps its current identity.
    pub async fn login(
        &self,
        id: &str,
        username: &str,
        password: &str,
    ) -> Result<SessionInfo, SessionError> {
        if !self.sessions.read().await.contains_key(id) {
            return Err(SessionError::NotFound(id.to_string()));
        }

        let account = match self.verifier.verify(username, password).await {
            Ok(account) => account,
            Err(rejection) => {
                tracing::warn!(
                    session = id,
                    verifier = self.verifier.name(),
                    "Login rejected"
                );
                return Err(rejection.into());
            }
        };

        let info = self
            .with_session(id, |s| {
                s.identity = Identity::Authenticated {
                    role: account.role,
                    display_name: account.display_name.clone(),
                };
                s.info()
            })
            .await?;

        tracing::info!(session = id, role = %account.role, "Session authenticated");
        Ok(info)
    }

    /// Return to anonymous browsing; the active category goes back to "all"
    pub async fn logout(&self, id: &str) -> Result<SessionInfo, SessionError> {
        let info = self
            .with_session(id, |s| {
                s.identity = Identity::Anonymous;
                s.view.active_category = Default::default();
                s.info()
            })
            .await?;

        tracing::info!(session = id, "Session logged out");
        Ok(info)
    }

    pub async fn update_view(
        &self,
        id: &str,
        request: UpdateViewRequest,
    ) -> Result<SessionInfo, SessionError> {
        self.with_session(id, |s| {
            request.apply(&mut s.view);
            s.info()
        })
        .await
    }

    /// Reset search term and active category
    pub async fn clear_view(&self, id: &str) -> Result<SessionInfo, SessionError> {
        self.with_session(id, |s| {
            s.view.clear();
            s.info()
        })
        .await
    }

    pub async fn conversation(&self, id: &str) -> Result<Vec<ChatMessage>, SessionError> {
        self.sessions
            .read()
            .await
            .get(id)
            .map(|s| s.conversation.messages().to_vec())
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    /// Record the user's message and mark the session busy
    pub async fn begin_turn(&self, id: &str, text: &str) -> Result<PendingTurn, SessionError> {
        self.with_session(id, |s| -> Result<PendingTurn, SessionError> {
            let history = s.conversation.begin_turn(text)?;
            Ok(PendingTurn {
                history,
                role: s.identity.effective_role(),
            })
        })
        .await?
    }

    /// Record the assistant's reply and release the session
    pub async fn finish_turn(
        &self,
        id: &str,
        reply: &AssistantReply,
    ) -> Result<ChatMessage, SessionError> {
        self.with_session(id, |s| s.conversation.finish_turn(reply))
            .await
    }

    /// Get session count
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop sessions idle for longer than `max_idle_ms`
    pub async fn cleanup_inactive(&self, max_idle_ms: i64) -> usize {
        let now = now_ms();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| now - s.last_activity() <= max_idle_ms);
        let cleaned = before - sessions.len();

        if cleaned > 0 {
            tracing::info!("Cleaned up {} inactive sessions", cleaned);
        }

        cleaned
    }

    async fn with_session<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut PortalSession) -> T,
    ) -> Result<T, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        session.touch();
        Ok(f(session))
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

//! In-memory session store
//!
//! One entry per active session: the logged-in user (if any), language and
//! state preferences, and the conversation context the dialogue manager reads
//! and writes. Sessions expire after 30 minutes of inactivity and die with
//! the process; nothing here is persisted.
//!
//! Concurrent requests on the same session serialize on the store's write
//! lock for the duration of one dialogue turn; when two arrive at once the
//! last writer wins on `last_category`. That is the accepted semantics, not
//! a serializable transaction.

use std::collections::HashMap;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use sahayak_core::{ConversationContext, Language};

/// Session timeout (30 minutes of inactivity)
const SESSION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// One active session
#[derive(Debug, Clone)]
pub struct Session {
    /// Logged-in user; None for anonymous sessions
    pub user_id: Option<i64>,
    /// Open login record to close at logout
    pub login_id: Option<i64>,
    /// Preferred interface language
    pub language: Language,
    /// Selected state/region name
    pub state: Option<String>,
    /// Conversational memory consumed by the dialogue manager
    pub context: ConversationContext,
    last_activity: Instant,
}

impl Session {
    fn new(user_id: Option<i64>, login_id: Option<i64>) -> Self {
        Self {
            user_id,
            login_id,
            language: Language::default(),
            state: None,
            context: ConversationContext::new(),
            last_activity: Instant::now(),
        }
    }

    fn is_expired(&self) -> bool {
        self.last_activity.elapsed() > SESSION_TIMEOUT
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}

/// In-memory session manager
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create a new session and return its token
    pub async fn create(&self, user_id: Option<i64>, login_id: Option<i64>) -> String {
        // Derive a unique token from the current timestamp
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let mut hasher = Sha256::new();
        hasher.update(timestamp.to_le_bytes());
        let token = format!("sess_{}", &hex::encode(hasher.finalize())[..24]);

        let mut sessions = self.sessions.write().await;

        // Clean up expired sessions while we're here
        sessions.retain(|_, s| !s.is_expired());

        sessions.insert(token.clone(), Session::new(user_id, login_id));
        token
    }

    /// Whether a live session exists for this token
    pub async fn contains(&self, token: &str) -> bool {
        let sessions = self.sessions.read().await;
        sessions.get(token).is_some_and(|s| !s.is_expired())
    }

    /// Snapshot of a session (None if unknown or expired)
    pub async fn get(&self, token: &str) -> Option<Session> {
        let sessions = self.sessions.read().await;
        sessions.get(token).filter(|s| !s.is_expired()).cloned()
    }

    /// Run a closure against a session with write access, refreshing its
    /// activity timestamp. Returns None if the session is unknown or expired.
    pub async fn with_session<T>(
        &self,
        token: &str,
        f: impl FnOnce(&mut Session) -> T,
    ) -> Option<T> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(token).filter(|s| !s.is_expired())?;
        let value = f(session);
        session.touch();
        Some(value)
    }

    /// Remove a session, returning it so the caller can close its login record
    pub async fn remove(&self, token: &str) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(token)
    }
}

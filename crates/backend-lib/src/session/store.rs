// ============================
// crates/backend-lib/src/session/store.rs
// ============================
//! Session token handling and management.
use chrono::{DateTime, Utc};
use metrics::{counter, gauge};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, SystemTime},
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AppError;
use crate::metrics::{SESSION_ACTIVE, SESSION_CREATED, SESSION_EXPIRED, SESSION_TERMINATED};
use crate::token;
use examseat_common::{Role, SessionView, SubjectKind};

/// Default session TTL: a 30 minute sliding window.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// How often the background sweep reclaims expired sessions.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Identity attributes bound to a session at creation time.
///
/// The attribute set is fixed and typed; there is no open-ended
/// string-keyed attribute bag.
#[derive(Debug, Clone)]
pub struct SessionIdentity {
    pub subject_id: Uuid,
    pub subject_kind: SubjectKind,
    pub role: Role,
    pub display_name: String,
    pub email: String,
}

/// A live authenticated session.
#[derive(Debug, Clone)]
pub struct Session {
    pub subject_id: Uuid,
    pub subject_kind: SubjectKind,
    pub role: Role,
    pub display_name: String,
    pub email: String,
    pub created_at: SystemTime,
    pub last_accessed_at: SystemTime,
    pub expires_at: SystemTime,
    /// The window this session slides by on each access.
    pub ttl: Duration,
}

impl Session {
    pub fn to_view(&self) -> SessionView {
        SessionView {
            subject_id: self.subject_id,
            subject_kind: self.subject_kind,
            role: self.role,
            display_name: self.display_name.clone(),
            email: self.email.clone(),
            created_at: DateTime::<Utc>::from(self.created_at),
            expires_at: DateTime::<Utc>::from(self.expires_at),
        }
    }
}

/// Session manager for handling authentication sessions.
///
/// The store is a single map behind one `RwLock`; every mutating
/// operation (`create`, the sliding update in `resolve`, `terminate`,
/// the sweep) takes the write lock, so per-session read-modify-write is
/// atomic and a terminate racing a resolve leaves the session either
/// present-and-live or absent, never torn.
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    default_ttl: Duration,
}

impl SessionManager {
    /// Create a new session manager and spawn its cleanup task.
    pub fn new(default_ttl: Duration) -> Self {
        let manager = SessionManager {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            default_ttl,
        };

        let manager_clone = manager.clone();
        tokio::spawn(async move {
            manager_clone.cleanup_task().await;
        });

        manager
    }

    /// Create a new live session and return its identifier.
    ///
    /// The identifier is regenerated on the improbable collision with a
    /// live session, under the same lock as the insert, so uniqueness
    /// holds by construction. A failed identifier generation leaves no
    /// orphan session behind.
    pub async fn create(
        &self,
        identity: SessionIdentity,
        ttl: Option<Duration>,
    ) -> Result<String, AppError> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let now = SystemTime::now();
        let session = Session {
            subject_id: identity.subject_id,
            subject_kind: identity.subject_kind,
            role: identity.role,
            display_name: identity.display_name,
            email: identity.email,
            created_at: now,
            last_accessed_at: now,
            expires_at: now + ttl,
            ttl,
        };

        let mut sessions = self.sessions.write().await;
        let session_id = loop {
            let candidate = token::generate_secure_token()?;
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };
        sessions.insert(session_id.clone(), session);

        counter!(SESSION_CREATED).increment(1);
        gauge!(SESSION_ACTIVE).set(sessions.len() as f64);

        Ok(session_id)
    }

    /// Resolve a session identifier into a session snapshot.
    ///
    /// A hit is itself an access: the expiry window slides forward by the
    /// session's original ttl. An expired session is removed here (lazy
    /// reclamation) and reported as absent; it never comes back to life.
    pub async fn resolve(&self, session_id: &str) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        let now = SystemTime::now();

        let expired = match sessions.get_mut(session_id) {
            Some(session) if now < session.expires_at => {
                session.last_accessed_at = now;
                session.expires_at = now + session.ttl;
                return Some(session.clone());
            },
            Some(_) => true,
            None => false,
        };

        if expired {
            sessions.remove(session_id);
            counter!(SESSION_EXPIRED).increment(1);
            gauge!(SESSION_ACTIVE).set(sessions.len() as f64);
        }
        None
    }

    /// Remove a session unconditionally. Idempotent: terminating an
    /// absent or expired session is not an error.
    pub async fn terminate(&self, session_id: &str) {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(session_id).is_some() {
            counter!(SESSION_TERMINATED).increment(1);
            gauge!(SESSION_ACTIVE).set(sessions.len() as f64);
        }
    }

    /// Number of sessions currently stored (live or awaiting reclamation).
    pub async fn live_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop every expired session. Runs under the same write lock as
    /// `resolve`, so a sweep cannot remove a session that a concurrent
    /// resolve has just extended.
    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let now = SystemTime::now();
        let before = sessions.len();

        sessions.retain(|_, session| now < session.expires_at);

        let removed = before - sessions.len();
        if removed > 0 {
            counter!(SESSION_EXPIRED).increment(removed as u64);
            gauge!(SESSION_ACTIVE).set(sessions.len() as f64);
        }
        removed
    }

    /// Cleanup task that runs periodically to remove expired sessions
    async fn cleanup_task(&self) {
        loop {
            tokio::time::sleep(SWEEP_INTERVAL).await;
            let removed = self.purge_expired().await;
            if removed > 0 {
                tracing::debug!(removed, "reclaimed expired sessions");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn learner_identity() -> SessionIdentity {
        SessionIdentity {
            subject_id: Uuid::new_v4(),
            subject_kind: SubjectKind::Learner,
            role: Role::Learner,
            display_name: "Ada Lovelace".to_string(),
            email: "ada@x.edu".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_then_resolve() {
        let manager = SessionManager::new(DEFAULT_SESSION_TTL);
        let identity = learner_identity();
        let session_id = manager.create(identity.clone(), None).await.unwrap();

        let session = manager.resolve(&session_id).await.unwrap();
        assert_eq!(session.subject_id, identity.subject_id);
        assert_eq!(session.role, Role::Learner);
        assert_eq!(session.email, "ada@x.edu");
        assert_eq!(manager.live_count().await, 1);
    }

    #[tokio::test]
    async fn test_resolve_unknown_is_absent() {
        let manager = SessionManager::new(DEFAULT_SESSION_TTL);
        assert!(manager.resolve("no-such-session").await.is_none());
    }

    #[tokio::test]
    async fn test_sliding_expiry_keeps_session_alive() {
        let manager = SessionManager::new(DEFAULT_SESSION_TTL);
        let ttl = Duration::from_millis(100);
        let session_id = manager
            .create(learner_identity(), Some(ttl))
            .await
            .unwrap();

        // Poll inside the window three times; total elapsed exceeds one ttl
        for _ in 0..3 {
            tokio::time::sleep(Duration::from_millis(60)).await;
            assert!(manager.resolve(&session_id).await.is_some());
        }

        // Go idle for longer than the window
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(manager.resolve(&session_id).await.is_none());
        // Lazy reclamation removed it
        assert_eq!(manager.live_count().await, 0);
    }

    #[tokio::test]
    async fn test_resolve_slides_expiry_forward() {
        let manager = SessionManager::new(DEFAULT_SESSION_TTL);
        let ttl = Duration::from_secs(60);
        let session_id = manager
            .create(learner_identity(), Some(ttl))
            .await
            .unwrap();

        let first = manager.resolve(&session_id).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        let second = manager.resolve(&session_id).await.unwrap();
        assert!(second.expires_at > first.expires_at);
        assert_eq!(second.ttl, ttl);
    }

    #[tokio::test]
    async fn test_terminate_is_idempotent_and_isolated() {
        let manager = SessionManager::new(DEFAULT_SESSION_TTL);
        let id_a = manager.create(learner_identity(), None).await.unwrap();
        let id_b = manager.create(learner_identity(), None).await.unwrap();

        manager.terminate(&id_a).await;
        manager.terminate(&id_a).await; // no-op
        manager.terminate("never-existed").await;

        assert!(manager.resolve(&id_a).await.is_none());
        assert!(manager.resolve(&id_b).await.is_some());
    }

    #[tokio::test]
    async fn test_purge_expired_only_removes_expired() {
        let manager = SessionManager::new(DEFAULT_SESSION_TTL);
        let short = manager
            .create(learner_identity(), Some(Duration::from_millis(20)))
            .await
            .unwrap();
        let long = manager
            .create(learner_identity(), Some(Duration::from_secs(60)))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;
        let removed = manager.purge_expired().await;
        assert_eq!(removed, 1);
        assert!(manager.resolve(&short).await.is_none());
        assert!(manager.resolve(&long).await.is_some());
    }

    #[tokio::test]
    async fn test_concurrent_resolves_do_not_tear() {
        let manager = SessionManager::new(DEFAULT_SESSION_TTL);
        let session_id = manager
            .create(learner_identity(), Some(Duration::from_secs(60)))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let manager = manager.clone();
            let session_id = session_id.clone();
            handles.push(tokio::spawn(async move {
                manager.resolve(&session_id).await.is_some()
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap());
        }
        assert_eq!(manager.live_count().await, 1);
    }
}

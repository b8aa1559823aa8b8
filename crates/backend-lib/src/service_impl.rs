// ============================
// crates/backend-lib/src/service_impl.rs
// ============================
use async_trait::async_trait;
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::credential;
use crate::error::AppError;
use crate::identity::IdentityStore;
use crate::metrics::{LOGIN_REJECTED, LOGIN_SUCCESS};
use crate::service::{AuthOutcome, AuthService};
use crate::session::{RememberTokenStore, SessionIdentity, SessionManager};
use examseat_common::{LoginGrant, RememberGrant, SessionView, SubjectKind};

/// Default authentication facade wiring the credential manager, the
/// session manager and the external identity store together.
pub struct DefaultAuth {
    store: Arc<dyn IdentityStore>,
    sessions: SessionManager,
    remember: RememberTokenStore,
    session_ttl: Duration,
}

impl DefaultAuth {
    pub fn new(
        store: Arc<dyn IdentityStore>,
        session_ttl: Duration,
        remember_ttl: Duration,
    ) -> Self {
        Self {
            store,
            sessions: SessionManager::new(session_ttl),
            remember: RememberTokenStore::new(remember_ttl),
            session_ttl,
        }
    }

    /// Session manager handle, mainly for tests and diagnostics.
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }
}

#[async_trait]
impl AuthService for DefaultAuth {
    async fn authenticate(
        &self,
        identifier: &str,
        secret: &str,
        kind: SubjectKind,
    ) -> Result<AuthOutcome, AppError> {
        let identifier = identifier.trim();

        let Some(record) = self.store.find_subject(identifier, kind).await? else {
            warn!(identifier, ?kind, "login rejected: unknown identifier");
            counter!(LOGIN_REJECTED).increment(1);
            return Ok(AuthOutcome::Rejected);
        };

        // Inactive learners cannot log in; staff records carry no
        // activation flag semantics.
        if kind == SubjectKind::Learner && !record.active {
            warn!(identifier, "login rejected: inactive learner");
            counter!(LOGIN_REJECTED).increment(1);
            return Ok(AuthOutcome::Rejected);
        }

        if !credential::verify(secret, &record.secret_digest) {
            warn!(identifier, ?kind, "login rejected: secret mismatch");
            counter!(LOGIN_REJECTED).increment(1);
            return Ok(AuthOutcome::Rejected);
        }

        // Role is decided exactly once, here.
        let role = record.role();
        let session_id = self
            .sessions
            .create(
                SessionIdentity {
                    subject_id: record.subject_id,
                    subject_kind: record.kind,
                    role,
                    display_name: record.display_name.clone(),
                    email: record.identifier.clone(),
                },
                Some(self.session_ttl),
            )
            .await?;

        info!(identifier, ?kind, ?role, "login successful");
        counter!(LOGIN_SUCCESS).increment(1);

        Ok(AuthOutcome::Granted(LoginGrant {
            session_id,
            role,
            display_name: record.display_name,
        }))
    }

    async fn resolve_session(&self, session_id: &str) -> Option<SessionView> {
        self.sessions
            .resolve(session_id)
            .await
            .map(|session| session.to_view())
    }

    async fn terminate_session(&self, session_id: &str) {
        self.sessions.terminate(session_id).await;
    }

    async fn issue_remember_token(&self, identifier: &str) -> Result<RememberGrant, AppError> {
        self.remember.issue(identifier.trim()).await
    }

    async fn resolve_remember_token(&self, token: &str) -> Option<String> {
        self.remember.resolve(token).await
    }

    async fn set_credential(
        &self,
        identifier: &str,
        kind: SubjectKind,
        mut new_secret: String,
    ) -> Result<(), AppError> {
        if !credential::is_acceptable(&new_secret) {
            return Err(AppError::WeakSecret(
                "need at least 8 characters and 3 of: upper, lower, digit, symbol".to_string(),
            ));
        }

        let digest = credential::hash_wiping(&mut new_secret)?;
        let updated = self
            .store
            .update_secret_digest(identifier.trim(), kind, &digest)
            .await?;
        if !updated {
            return Err(AppError::NotFound(format!(
                "no {kind:?} subject for that identifier"
            )));
        }
        info!(identifier, ?kind, "credential replaced");
        Ok(())
    }
}

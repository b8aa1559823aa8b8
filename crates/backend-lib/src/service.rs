// ============================
// crates/backend-lib/src/service.rs
// ============================
use async_trait::async_trait;

use crate::error::AppError;
use examseat_common::{LoginGrant, RememberGrant, SessionView, SubjectKind};

/// Outcome of an authentication attempt.
///
/// Unknown identifier and mismatched secret are merged into `Rejected`;
/// callers cannot tell the cases apart.
#[derive(Debug, Clone)]
pub enum AuthOutcome {
    Granted(LoginGrant),
    Rejected,
}

impl AuthOutcome {
    pub fn is_granted(&self) -> bool {
        matches!(self, AuthOutcome::Granted(_))
    }
}

/// Authentication entry points exposed to the request-routing layer.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Verify a secret against the stored credential record and mint a
    /// session on success.
    async fn authenticate(
        &self,
        identifier: &str,
        secret: &str,
        kind: SubjectKind,
    ) -> Result<AuthOutcome, AppError>;

    /// Resolve a session handle; a hit slides the expiry window.
    async fn resolve_session(&self, session_id: &str) -> Option<SessionView>;

    /// Logout; idempotent.
    async fn terminate_session(&self, session_id: &str);

    /// Issue a long-lived token that recalls `identifier` at login time.
    async fn issue_remember_token(&self, identifier: &str) -> Result<RememberGrant, AppError>;

    /// Resolve a remember token into the identifier it vouches for.
    /// Never authenticates by itself.
    async fn resolve_remember_token(&self, token: &str) -> Option<String>;

    /// Set or replace a subject's credential. Enforces the acceptance
    /// gate; the plaintext is wiped after hashing.
    async fn set_credential(
        &self,
        identifier: &str,
        kind: SubjectKind,
        new_secret: String,
    ) -> Result<(), AppError>;
}

// ============================
// crates/backend-lib/src/session/remember.rs
// ============================
//! Long-lived "remember me" tokens.
//!
//! A remember token vouches for a login identifier so clients can
//! pre-fill the login form. It is independent of any session, has a
//! fixed window with no sliding, and never substitutes for secret
//! verification.
use chrono::{DateTime, Utc};
use metrics::counter;
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, SystemTime},
};
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::metrics::REMEMBER_ISSUED;
use crate::token;
use examseat_common::RememberGrant;

/// Default remember-token TTL: 7 days from issuance.
pub const DEFAULT_REMEMBER_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// How often the background sweep reclaims expired tokens.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct RememberToken {
    identifier: String,
    issued_at: SystemTime,
    expires_at: SystemTime,
}

/// Store of issued remember tokens, keyed by token value.
#[derive(Clone)]
pub struct RememberTokenStore {
    tokens: Arc<RwLock<HashMap<String, RememberToken>>>,
    ttl: Duration,
}

impl RememberTokenStore {
    /// Create a new token store and spawn its cleanup task.
    pub fn new(ttl: Duration) -> Self {
        let store = Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        };

        let store_clone = store.clone();
        tokio::spawn(async move {
            store_clone.cleanup_task().await;
        });

        store
    }

    /// Issue a token vouching for `identifier`, expiring a fixed window
    /// from now.
    pub async fn issue(&self, identifier: &str) -> Result<RememberGrant, AppError> {
        let token = token::generate_secure_token()?;
        let issued_at = SystemTime::now();
        let expires_at = issued_at + self.ttl;

        let mut tokens = self.tokens.write().await;
        tokens.insert(
            token.clone(),
            RememberToken {
                identifier: identifier.to_string(),
                issued_at,
                expires_at,
            },
        );

        counter!(REMEMBER_ISSUED).increment(1);

        Ok(RememberGrant {
            token,
            expires_at: DateTime::<Utc>::from(expires_at),
        })
    }

    /// Resolve a token into the identifier it vouches for.
    ///
    /// Absent if unknown or expired; resolving does not extend the
    /// token's lifetime.
    pub async fn resolve(&self, token: &str) -> Option<String> {
        let mut tokens = self.tokens.write().await;
        let now = SystemTime::now();

        let expired = match tokens.get(token) {
            Some(entry) if now < entry.expires_at => {
                return Some(entry.identifier.clone());
            },
            Some(_) => true,
            None => false,
        };

        if expired {
            tokens.remove(token);
        }
        None
    }

    /// Drop every expired token.
    ///
    /// Most issued tokens are never presented again, so lazy removal in
    /// `resolve` alone would leave them resident indefinitely.
    pub async fn purge_expired(&self) -> usize {
        let mut tokens = self.tokens.write().await;
        let now = SystemTime::now();
        let before = tokens.len();

        tokens.retain(|_, entry| now < entry.expires_at);

        before - tokens.len()
    }

    /// Cleanup task that runs periodically to remove expired tokens
    async fn cleanup_task(&self) {
        loop {
            tokio::time::sleep(SWEEP_INTERVAL).await;
            let removed = self.purge_expired().await;
            if removed > 0 {
                tracing::debug!(removed, "reclaimed expired remember tokens");
            }
        }
    }
}

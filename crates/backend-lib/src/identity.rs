// ============================
// crates/backend-lib/src/identity.rs
// ============================
//! Identity store abstraction with an in-memory implementation.
//!
//! The authoritative store of credential records is external to this
//! subsystem; the facade only reads records and replaces digests
//! wholesale. `MemoryIdentityStore` backs the demo binary and tests.
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use crate::credential;
use crate::error::AppError;
use examseat_common::{Role, SubjectKind};

/// A stored credential record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectRecord {
    pub subject_id: Uuid,
    /// Email/login name; matched case-insensitively.
    pub identifier: String,
    pub kind: SubjectKind,
    /// Meaningful for staff; a privileged staff record yields the
    /// `PrivilegedStaff` role.
    #[serde(default)]
    pub privileged: bool,
    pub display_name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Either `salt:hash` (current) or a bare hex digest (legacy).
    pub secret_digest: String,
}

fn default_active() -> bool {
    true
}

impl SubjectRecord {
    /// Decide the session role for this record. Called exactly once per
    /// login, at session creation time.
    pub fn role(&self) -> Role {
        match self.kind {
            SubjectKind::Learner => Role::Learner,
            SubjectKind::Staff if self.privileged => Role::PrivilegedStaff,
            SubjectKind::Staff => Role::Staff,
        }
    }
}

/// Trait for identity store backends
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Look up a credential record by identifier and subject kind.
    async fn find_subject(
        &self,
        identifier: &str,
        kind: SubjectKind,
    ) -> Result<Option<SubjectRecord>, AppError>;

    /// Replace the stored digest wholesale. Returns false when the
    /// subject does not exist.
    async fn update_secret_digest(
        &self,
        identifier: &str,
        kind: SubjectKind,
        digest: &str,
    ) -> Result<bool, AppError>;
}

/// Seed-file entry for the in-memory store. Accepts either a plaintext
/// `secret` (hashed on load) or a pre-computed `secret_digest`.
#[derive(Debug, Deserialize)]
struct SeedSubject {
    identifier: String,
    kind: SubjectKind,
    #[serde(default)]
    privileged: bool,
    display_name: String,
    #[serde(default = "default_active")]
    active: bool,
    #[serde(default)]
    secret: Option<String>,
    #[serde(default)]
    secret_digest: Option<String>,
}

/// In-memory implementation of the identity store.
#[derive(Default)]
pub struct MemoryIdentityStore {
    subjects: DashMap<(SubjectKind, String), SubjectRecord>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(identifier: &str, kind: SubjectKind) -> (SubjectKind, String) {
        (kind, identifier.trim().to_lowercase())
    }

    /// Insert or replace a record.
    pub fn insert(&self, record: SubjectRecord) {
        let key = Self::key(&record.identifier, record.kind);
        self.subjects.insert(key, record);
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Load subjects from a JSON seed file.
    pub fn load_seed<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<usize> {
        let content = std::fs::read_to_string(path)?;
        let seeds: Vec<SeedSubject> = serde_json::from_str(&content)?;
        let count = seeds.len();

        for seed in seeds {
            let secret_digest = match (seed.secret, seed.secret_digest) {
                (_, Some(digest)) => digest,
                (Some(secret), None) => credential::hash(&secret)
                    .map_err(|e| anyhow::anyhow!("hashing seed secret: {e}"))?,
                (None, None) => {
                    anyhow::bail!("seed subject {} has neither secret nor digest", seed.identifier)
                },
            };
            self.insert(SubjectRecord {
                subject_id: Uuid::new_v4(),
                identifier: seed.identifier.trim().to_string(),
                kind: seed.kind,
                privileged: seed.privileged,
                display_name: seed.display_name,
                active: seed.active,
                secret_digest,
            });
        }
        Ok(count)
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find_subject(
        &self,
        identifier: &str,
        kind: SubjectKind,
    ) -> Result<Option<SubjectRecord>, AppError> {
        let key = Self::key(identifier, kind);
        Ok(self.subjects.get(&key).map(|entry| entry.value().clone()))
    }

    async fn update_secret_digest(
        &self,
        identifier: &str,
        kind: SubjectKind,
        digest: &str,
    ) -> Result<bool, AppError> {
        let key = Self::key(identifier, kind);
        match self.subjects.get_mut(&key) {
            Some(mut entry) => {
                entry.secret_digest = digest.to_string();
                Ok(true)
            },
            None => Ok(false),
        }
    }
}

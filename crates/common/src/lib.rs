// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! shared between the `ExamSeat` authentication backend and its clients.
//! This module defines the HTTP API payloads and the closed role model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The two classes of authenticated subjects.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    /// A student sitting exams
    Learner,
    /// Teaching or administrative staff
    Staff,
}

/// Role tag attached to a session, decided once at session creation.
///
/// This is a closed enumeration; there is no free-text role anywhere in
/// the system.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Learner,
    Staff,
    PrivilegedStaff,
}

/// Snapshot of a live session handed to the routing layer.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub subject_id: Uuid,
    pub subject_kind: SubjectKind,
    pub role: Role,
    pub display_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Result of a successful login.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginGrant {
    pub session_id: String,
    pub role: Role,
    pub display_name: String,
}

/// A freshly issued "remember me" token.
///
/// The token recalls a login identifier; it never stands in for a secret.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RememberGrant {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Login request body.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub subject_kind: SubjectKind,
    #[serde(default)]
    pub remember_me: bool,
}

/// Login response body.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub session_id: String,
    pub role: Role,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remember_token: Option<RememberGrant>,
}

/// Answer to "am I logged in".
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub authenticated: bool,
    #[serde(flatten)]
    pub session: Option<SessionView>,
}

/// Remember-token lookup request body.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RememberLookup {
    pub token: String,
}

/// Remember-token lookup response body.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RememberLookupResponse {
    pub email: Option<String>,
}

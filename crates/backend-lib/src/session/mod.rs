// ============================
// crates/backend-lib/src/session/mod.rs
// ============================
//! Session lifecycle and remember-token handling.

pub mod remember;
pub mod store;

pub use remember::{RememberTokenStore, DEFAULT_REMEMBER_TOKEN_TTL};
pub use store::{Session, SessionIdentity, SessionManager, DEFAULT_SESSION_TTL};

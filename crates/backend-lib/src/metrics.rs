// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric key constants
pub const LOGIN_SUCCESS: &str = "login.success";
pub const LOGIN_REJECTED: &str = "login.rejected";
pub const SESSION_CREATED: &str = "session.created";
pub const SESSION_ACTIVE: &str = "session.active";
pub const SESSION_EXPIRED: &str = "session.expired";
pub const SESSION_TERMINATED: &str = "session.terminated";
pub const REMEMBER_ISSUED: &str = "remember.issued";

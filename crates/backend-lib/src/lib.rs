// ============================
// examseat-backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the `ExamSeat` authentication
//! subsystem: credential hashing/verification, strength scoring,
//! credential generation, and session lifecycle management.

pub mod config;
pub mod credential;
pub mod error;
pub mod identity;
pub mod metrics;
pub mod router;
pub mod service;
pub mod service_impl;
pub mod session;
pub mod token;
pub mod validation;

use std::sync::Arc;

use crate::config::Settings;
use crate::identity::IdentityStore;
use crate::service_impl::DefaultAuth;

pub use crate::service::{AuthOutcome, AuthService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth: Arc<dyn AuthService>,
    /// Settings
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create a new application state around an identity store.
    pub fn new(store: Arc<dyn IdentityStore>, settings: Settings) -> Self {
        let auth = Arc::new(DefaultAuth::new(
            store,
            settings.session_ttl(),
            settings.remember_token_ttl(),
        ));
        Self {
            auth,
            settings: Arc::new(settings),
        }
    }
}

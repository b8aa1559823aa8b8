// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Log level
    pub log_level: String,
    /// Session TTL in seconds (sliding window)
    pub session_ttl_secs: u64,
    /// Remember-token TTL in seconds (fixed window)
    pub remember_token_ttl_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".parse().unwrap(),
            log_level: "info".to_string(),
            session_ttl_secs: 30 * 60,
            remember_token_ttl_secs: 7 * 24 * 60 * 60,
        }
    }
}

impl Settings {
    /// Load settings from `examseat.toml` and `EXAMSEAT_`-prefixed
    /// environment variables, over the defaults.
    pub fn load() -> Result<Self> {
        Self::load_from("examseat.toml")
    }

    /// Load settings with an explicit config file path.
    pub fn load_from(path: &str) -> Result<Self> {
        let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("EXAMSEAT_"))
            .extract()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.session_ttl_secs == 0 {
            anyhow::bail!("session_ttl_secs must be positive");
        }
        if self.remember_token_ttl_secs == 0 {
            anyhow::bail!("remember_token_ttl_secs must be positive");
        }
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => anyhow::bail!("unknown log level: {other}"),
        }
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn remember_token_ttl(&self) -> Duration {
        Duration::from_secs(self.remember_token_ttl_secs)
    }
}

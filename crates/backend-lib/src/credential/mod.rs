// ============================
// crates/backend-lib/src/credential/mod.rs
// ============================
//! Credential manager: hashing, verification, strength scoring and
//! random credential generation. Pure functions over string inputs;
//! no shared state, safe for unbounded concurrent calls.

pub mod digest;
pub mod generate;
pub mod strength;

pub use digest::{hash, hash_wiping, legacy_digest, verify};
pub use generate::generate;
pub use strength::{assess_strength, is_acceptable, StrengthGrade};

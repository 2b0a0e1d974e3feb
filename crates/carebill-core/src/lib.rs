//! carebill-core
//!
//! Pure domain types, the claim wizard, and storage key conventions.
//! No AWS SDK dependency; this is the shared vocabulary of the Carebill system.

pub mod error;
pub mod models;
pub mod search;
pub mod storage_keys;
pub mod validate;
pub mod wizard;

//! carebill-auth
//!
//! Session token validation and role extraction.

pub mod error;
pub mod jwt;

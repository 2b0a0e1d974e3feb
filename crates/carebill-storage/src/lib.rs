//! carebill-storage
//!
//! Object storage for Carebill records. [`store::ObjectStore`] is the seam:
//! [`s3::S3Store`] in production, [`memory::MemoryStore`] for tests and local runs.

pub mod client;
pub mod error;
pub mod memory;
pub mod records;
pub mod s3;
pub mod state;
pub mod store;

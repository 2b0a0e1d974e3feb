//! carebill-export
//!
//! Registry CSV import/export and patient-facing documents rendered from
//! Tera templates.

pub mod csv_io;
pub mod error;
pub mod render;

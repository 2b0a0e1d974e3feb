pub mod address;
pub mod appointment;
pub mod claim;
pub mod collections;
pub mod eligibility;
pub mod facility;
pub mod message;
pub mod patient;
pub mod payer;
pub mod payment_plan;
pub mod provider;
pub mod settings;

use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::CoreError;

/// A top-level entity stored as one JSON object per id under a fixed prefix.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Human-readable kind used in error messages ("patient", "payer", ...).
    const KIND: &'static str;

    /// Key prefix all objects of this kind live under.
    const PREFIX: &'static str;

    fn key(id: Uuid) -> String;

    fn id(&self) -> Uuid;

    fn created_at(&self) -> jiff::Timestamp;

    /// Required-field and format checks run before every insert/update.
    fn validate(&self) -> Result<(), CoreError>;

    /// Assign identity and both timestamps for a fresh insert.
    fn stamp_new(&mut self, id: Uuid, now: jiff::Timestamp);

    /// Keep identity and creation time from the stored copy; bump `updated_at`.
    fn stamp_existing(&mut self, id: Uuid, created_at: jiff::Timestamp, now: jiff::Timestamp);
}

macro_rules! record {
    ($ty:ty, $kind:literal, $prefix:path, $key:path) => {
        impl $crate::models::Record for $ty {
            const KIND: &'static str = $kind;
            const PREFIX: &'static str = $prefix;

            fn key(id: ::uuid::Uuid) -> String {
                $key(id)
            }

            fn id(&self) -> ::uuid::Uuid {
                self.id
            }

            fn created_at(&self) -> ::jiff::Timestamp {
                self.created_at
            }

            fn validate(&self) -> Result<(), $crate::error::CoreError> {
                self.check()
            }

            fn stamp_new(&mut self, id: ::uuid::Uuid, now: ::jiff::Timestamp) {
                self.id = id;
                self.created_at = now;
                self.updated_at = now;
            }

            fn stamp_existing(
                &mut self,
                id: ::uuid::Uuid,
                created_at: ::jiff::Timestamp,
                now: ::jiff::Timestamp,
            ) {
                self.id = id;
                self.created_at = created_at;
                self.updated_at = now;
            }
        }
    };
}

pub(crate) use record;

pub(crate) fn default_active() -> bool {
    true
}

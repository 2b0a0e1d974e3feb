use jiff::ToSpan;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::record;
use crate::error::CoreError;
use crate::storage_keys;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Appointment {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub patient_id: Uuid,
    pub provider_id: Uuid,
    #[serde(default)]
    pub facility_id: Option<Uuid>,
    /// Practice-local start time.
    pub start: jiff::civil::DateTime,
    pub duration_minutes: u32,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default = "default_status")]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "jiff::Timestamp::now")]
    pub created_at: jiff::Timestamp,
    #[serde(default = "jiff::Timestamp::now")]
    pub updated_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    CheckedIn,
    Completed,
    Cancelled,
    NoShow,
}

fn default_status() -> AppointmentStatus {
    AppointmentStatus::Scheduled
}

impl AppointmentStatus {
    /// Whether the appointment still holds its slot on the provider's calendar.
    pub fn holds_slot(self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled | AppointmentStatus::NoShow)
    }
}

impl Appointment {
    pub fn end(&self) -> jiff::civil::DateTime {
        self.start
            .saturating_add(i64::from(self.duration_minutes).minutes())
    }

    /// Same provider, both holding their slot, and the time ranges intersect.
    pub fn overlaps(&self, other: &Appointment) -> bool {
        self.provider_id == other.provider_id
            && self.status.holds_slot()
            && other.status.holds_slot()
            && self.start < other.end()
            && other.start < self.end()
    }

    /// First existing appointment (other than this one) that overlaps it.
    pub fn find_conflict<'a>(&self, existing: &'a [Appointment]) -> Option<&'a Appointment> {
        existing
            .iter()
            .filter(|a| a.id != self.id)
            .find(|a| self.overlaps(a))
    }

    fn check(&self) -> Result<(), CoreError> {
        if self.duration_minutes == 0 {
            return Err(CoreError::InvalidField {
                field: "duration_minutes".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

record!(
    Appointment,
    "appointment",
    storage_keys::APPOINTMENTS_PREFIX,
    storage_keys::appointment
);

//! S3 key/path conventions.
//!
//! Pure string functions, no AWS SDK dependency. These define the canonical
//! layout of objects in the Carebill bucket.

use uuid::Uuid;

pub const PATIENTS_PREFIX: &str = "patients/";
pub const PROVIDERS_PREFIX: &str = "providers/";
pub const FACILITIES_PREFIX: &str = "facilities/";
pub const PAYERS_PREFIX: &str = "payers/";
pub const CLAIMS_PREFIX: &str = "claims/";
pub const PAYMENT_PLANS_PREFIX: &str = "payment-plans/";
pub const COLLECTIONS_PREFIX: &str = "collections/";
pub const APPOINTMENTS_PREFIX: &str = "appointments/";

pub fn patient(id: Uuid) -> String {
    format!("{PATIENTS_PREFIX}{id}.json")
}

pub fn provider(id: Uuid) -> String {
    format!("{PROVIDERS_PREFIX}{id}.json")
}

pub fn facility(id: Uuid) -> String {
    format!("{FACILITIES_PREFIX}{id}.json")
}

pub fn payer(id: Uuid) -> String {
    format!("{PAYERS_PREFIX}{id}.json")
}

pub fn claim(id: Uuid) -> String {
    format!("{CLAIMS_PREFIX}{id}.json")
}

pub fn payment_plan(id: Uuid) -> String {
    format!("{PAYMENT_PLANS_PREFIX}{id}.json")
}

pub fn collections_account(id: Uuid) -> String {
    format!("{COLLECTIONS_PREFIX}{id}.json")
}

pub fn appointment(id: Uuid) -> String {
    format!("{APPOINTMENTS_PREFIX}{id}.json")
}

pub fn eligibility_prefix(patient_id: Uuid) -> String {
    format!("eligibility/{patient_id}/")
}

pub fn eligibility_check(patient_id: Uuid, id: Uuid) -> String {
    format!("eligibility/{patient_id}/{id}.json")
}

pub fn message_thread_prefix(patient_id: Uuid) -> String {
    format!("messages/{patient_id}/")
}

pub fn message(patient_id: Uuid, id: Uuid) -> String {
    format!("messages/{patient_id}/{id}.json")
}

pub const STATEMENT_TEMPLATE: &str = "templates/statement.tera";

pub const COLLECTIONS_NOTICE_TEMPLATE: &str = "templates/collections-notice.tera";

pub const PRACTICE_SETTINGS: &str = "_state/settings.json";

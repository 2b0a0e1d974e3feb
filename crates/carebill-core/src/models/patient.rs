use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::address::Address;
use super::claim::PatientRef;
use super::{default_active, record};
use crate::error::CoreError;
use crate::search::Searchable;
use crate::storage_keys;
use crate::validate;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Patient {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: jiff::civil::Date,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Address,
    /// Member id on the primary payer's card.
    #[serde(default)]
    pub member_id: Option<String>,
    #[serde(default)]
    pub primary_payer_id: Option<Uuid>,
    /// Outstanding patient responsibility in dollars.
    #[serde(default)]
    pub balance: f64,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default = "jiff::Timestamp::now")]
    pub created_at: jiff::Timestamp,
    #[serde(default = "jiff::Timestamp::now")]
    pub updated_at: jiff::Timestamp,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    pub fn to_ref(&self) -> PatientRef {
        PatientRef {
            id: self.id,
            name: self.full_name(),
            date_of_birth: Some(self.date_of_birth),
        }
    }

    fn check(&self) -> Result<(), CoreError> {
        validate::require("first_name", &self.first_name)?;
        validate::require("last_name", &self.last_name)?;
        self.address.check("address")
    }
}

record!(
    Patient,
    "patient",
    storage_keys::PATIENTS_PREFIX,
    storage_keys::patient
);

impl Searchable for Patient {
    fn search_fields(&self) -> Vec<String> {
        let mut fields = vec![self.full_name()];
        fields.extend(self.email.clone());
        fields.extend(self.phone.clone());
        fields.extend(self.member_id.clone());
        fields
    }
}

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::address::Address;
use super::{default_active, record};
use crate::error::CoreError;
use crate::search::Searchable;
use crate::storage_keys;
use crate::validate;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Facility {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    /// Organizational (type 2) NPI.
    #[serde(default)]
    pub npi: Option<String>,
    /// EIN, `XX-XXXXXXX`.
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub phone: Option<String>,
    /// CMS place-of-service code (11 = office, 22 = outpatient hospital, ...).
    #[serde(default = "default_place_of_service")]
    pub place_of_service: u8,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default = "jiff::Timestamp::now")]
    pub created_at: jiff::Timestamp,
    #[serde(default = "jiff::Timestamp::now")]
    pub updated_at: jiff::Timestamp,
}

fn default_place_of_service() -> u8 {
    11
}

impl Facility {
    fn check(&self) -> Result<(), CoreError> {
        validate::require("name", &self.name)?;
        validate::optional_npi("npi", self.npi.as_deref())?;
        if let Some(ein) = self.tax_id.as_deref().filter(|t| !t.trim().is_empty()) {
            let ok = ein.len() == 10
                && ein.as_bytes()[2] == b'-'
                && ein[..2].chars().all(|c| c.is_ascii_digit())
                && ein[3..].chars().all(|c| c.is_ascii_digit());
            if !ok {
                return Err(CoreError::InvalidField {
                    field: "tax_id".to_string(),
                    reason: "must match XX-XXXXXXX".to_string(),
                });
            }
        }
        if !(1..=99).contains(&self.place_of_service) {
            return Err(CoreError::InvalidField {
                field: "place_of_service".to_string(),
                reason: "must be between 1 and 99".to_string(),
            });
        }
        self.address.check("address")
    }
}

record!(
    Facility,
    "facility",
    storage_keys::FACILITIES_PREFIX,
    storage_keys::facility
);

impl Searchable for Facility {
    fn search_fields(&self) -> Vec<String> {
        let mut fields = vec![self.name.clone(), self.address.city.clone()];
        fields.extend(self.npi.clone());
        fields
    }
}

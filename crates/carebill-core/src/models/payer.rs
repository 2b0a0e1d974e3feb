use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::address::Address;
use super::claim::PayerRef;
use super::{default_active, record};
use crate::error::CoreError;
use crate::search::Searchable;
use crate::storage_keys;
use crate::validate;

/// An insurance company claims are billed to.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Payer {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    /// Clearinghouse payer id (e.g. "60054").
    #[serde(default)]
    pub payer_code: Option<String>,
    #[serde(default)]
    pub payer_type: PayerType,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Address,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default = "jiff::Timestamp::now")]
    pub created_at: jiff::Timestamp,
    #[serde(default = "jiff::Timestamp::now")]
    pub updated_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PayerType {
    #[default]
    Commercial,
    Medicare,
    Medicaid,
    Tricare,
    SelfPay,
    Other,
}

impl Payer {
    pub fn to_ref(&self) -> PayerRef {
        PayerRef {
            id: self.id,
            name: self.name.clone(),
        }
    }

    fn check(&self) -> Result<(), CoreError> {
        validate::require("name", &self.name)?;
        self.address.check("address")
    }
}

record!(Payer, "payer", storage_keys::PAYERS_PREFIX, storage_keys::payer);

impl Searchable for Payer {
    fn search_fields(&self) -> Vec<String> {
        let mut fields = vec![self.name.clone()];
        fields.extend(self.payer_code.clone());
        fields
    }
}

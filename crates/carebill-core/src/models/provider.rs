use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::claim::ProviderRef;
use super::{default_active, record};
use crate::error::CoreError;
use crate::search::Searchable;
use crate::storage_keys;
use crate::validate;

/// A rendering provider.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Provider {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Individual NPI, 10 digits when present.
    #[serde(default)]
    pub npi: Option<String>,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub taxonomy_code: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub facility_id: Option<Uuid>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default = "jiff::Timestamp::now")]
    pub created_at: jiff::Timestamp,
    #[serde(default = "jiff::Timestamp::now")]
    pub updated_at: jiff::Timestamp,
}

impl Provider {
    pub fn display_name(&self) -> String {
        match self.specialty.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(specialty) => format!(
                "{} {} ({specialty})",
                self.first_name.trim(),
                self.last_name.trim()
            ),
            None => format!("{} {}", self.first_name.trim(), self.last_name.trim()),
        }
    }

    pub fn to_ref(&self) -> ProviderRef {
        ProviderRef {
            id: self.id,
            name: format!("{} {}", self.first_name.trim(), self.last_name.trim()),
            npi: self.npi.clone().filter(|n| !n.trim().is_empty()),
        }
    }

    fn check(&self) -> Result<(), CoreError> {
        validate::require("first_name", &self.first_name)?;
        validate::require("last_name", &self.last_name)?;
        validate::optional_npi("npi", self.npi.as_deref())
    }
}

record!(
    Provider,
    "provider",
    storage_keys::PROVIDERS_PREFIX,
    storage_keys::provider
);

impl Searchable for Provider {
    fn search_fields(&self) -> Vec<String> {
        let mut fields = vec![format!("{} {}", self.first_name, self.last_name)];
        fields.extend(self.npi.clone());
        fields.extend(self.specialty.clone());
        fields
    }
}

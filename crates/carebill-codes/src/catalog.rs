use serde::{Deserialize, Serialize};
use ts_rs::TS;

use carebill_core::search::Searchable;

/// What a code set describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CodeKind {
    /// Services rendered (CPT/HCPCS).
    Procedure,
    /// Conditions treated (ICD-10-CM).
    Diagnosis,
}

/// A single catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MedicalCode {
    pub code: String,
    pub description: String,
    pub category: String,
    /// Practice default charge per unit, for procedure codes.
    pub default_charge: Option<f64>,
}

impl Searchable for MedicalCode {
    fn search_fields(&self) -> Vec<String> {
        vec![self.code.clone(), self.description.clone()]
    }
}

pub(crate) fn procedure(code: &str, description: &str, category: &str, charge: f64) -> MedicalCode {
    MedicalCode {
        code: code.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        default_charge: Some(charge),
    }
}

pub(crate) fn diagnosis(code: &str, description: &str, category: &str) -> MedicalCode {
    MedicalCode {
        code: code.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        default_charge: None,
    }
}

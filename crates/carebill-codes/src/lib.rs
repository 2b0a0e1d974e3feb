//! carebill-codes
//!
//! Procedure (CPT) and diagnosis (ICD-10-CM) code catalogs. Pure data, no AWS
//! dependency. Backs the services and diagnosis steps of the claim wizard.

pub mod catalog;
pub mod code_sets;
pub mod error;

use carebill_core::search;
use carebill_core::wizard::draft::ClaimDraft;

use catalog::{CodeKind, MedicalCode};
use error::CodeError;

/// Trait implemented by each supported code system.
pub trait CodeSet: Send + Sync {
    /// Unique identifier for this code set (e.g., "cpt", "icd10").
    fn id(&self) -> &str;

    /// Human-readable name (e.g., "CPT", "ICD-10-CM").
    fn name(&self) -> &str;

    fn kind(&self) -> CodeKind;

    /// The curated list of common codes offered in the pickers.
    fn codes(&self) -> &[MedicalCode];

    /// Structural check only; a well-formed code need not be in [`Self::codes`].
    fn is_valid_format(&self, code: &str) -> bool;

    fn validate(&self, code: &str) -> Result<(), CodeError> {
        if self.is_valid_format(code) {
            Ok(())
        } else {
            Err(CodeError::InvalidFormat {
                code_set: self.name().to_string(),
                code: code.to_string(),
            })
        }
    }

    fn lookup(&self, code: &str) -> Option<&MedicalCode> {
        let wanted = code.trim();
        self.codes()
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(wanted))
    }

    /// Codes whose code or description contains `query`, in catalog order.
    fn search(&self, query: &str, limit: usize) -> Vec<&MedicalCode> {
        self.codes()
            .iter()
            .filter(|c| search::matches(*c, query))
            .take(limit)
            .collect()
    }
}

/// Return all registered code sets.
pub fn all_code_sets() -> Vec<Box<dyn CodeSet>> {
    vec![
        Box::new(code_sets::cpt::Cpt),
        Box::new(code_sets::icd10::Icd10Cm),
    ]
}

/// Look up a code set by ID.
pub fn get_code_set(id: &str) -> Option<Box<dyn CodeSet>> {
    all_code_sets().into_iter().find(|s| s.id() == id)
}

/// Format-check every procedure and diagnosis code on a draft.
pub fn validate_draft_codes(draft: &ClaimDraft) -> Vec<CodeError> {
    let cpt = code_sets::cpt::Cpt;
    let icd = code_sets::icd10::Icd10Cm;

    let procedures = draft.procedures.iter().map(|p| cpt.validate(&p.code));
    let diagnoses = draft.diagnoses.iter().map(|d| icd.validate(&d.code));
    procedures.chain(diagnoses).filter_map(Result::err).collect()
}

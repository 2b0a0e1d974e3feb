use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::step::WizardStep;
use crate::error::WizardError;
use crate::models::claim::{
    Claim, DiagnosisEntry, InsuranceSelection, PatientRef, ProcedureLine, ProviderRef,
};

/// The claim under construction. Never stored on its own; it is either
/// discarded or handed to the submission callback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClaimDraft {
    #[serde(default)]
    pub patient: Option<PatientRef>,
    #[serde(default)]
    pub service_date: Option<jiff::civil::Date>,
    #[serde(default)]
    pub procedures: Vec<ProcedureLine>,
    #[serde(default)]
    pub diagnoses: Vec<DiagnosisEntry>,
    #[serde(default)]
    pub insurance: InsuranceSelection,
    #[serde(default)]
    pub provider: Option<ProviderRef>,
    #[serde(default)]
    pub notes: String,
}

/// A step's slice of the draft. `None` leaves the key untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DraftUpdate {
    #[serde(default)]
    pub patient: Option<PatientRef>,
    #[serde(default)]
    pub service_date: Option<jiff::civil::Date>,
    #[serde(default)]
    pub procedures: Option<Vec<ProcedureLine>>,
    #[serde(default)]
    pub diagnoses: Option<Vec<DiagnosisEntry>>,
    #[serde(default)]
    pub insurance: Option<InsuranceSelection>,
    #[serde(default)]
    pub provider: Option<ProviderRef>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ClaimDraft {
    /// Pre-populate from a stored claim for edit mode.
    pub fn from_claim(claim: &Claim) -> Self {
        Self {
            patient: Some(claim.patient.clone()),
            service_date: claim.service_date,
            procedures: claim.procedures.clone(),
            diagnoses: claim.diagnoses.clone(),
            insurance: claim.insurance.clone(),
            provider: claim.provider.clone(),
            notes: claim.notes.clone(),
        }
    }

    /// Shallow merge: every key present in `update` replaces the draft's.
    pub fn merge(&mut self, update: DraftUpdate) {
        if let Some(patient) = update.patient {
            self.patient = Some(patient);
        }
        if let Some(service_date) = update.service_date {
            self.service_date = Some(service_date);
        }
        if let Some(procedures) = update.procedures {
            self.procedures = procedures;
        }
        if let Some(diagnoses) = update.diagnoses {
            self.diagnoses = diagnoses;
            self.normalize_primary();
        }
        if let Some(insurance) = update.insurance {
            self.insurance = insurance;
        }
        if let Some(provider) = update.provider {
            self.provider = Some(provider);
        }
        if let Some(notes) = update.notes {
            self.notes = notes;
        }
    }

    /// Σ amount × units over every procedure line.
    pub fn total_amount(&self) -> f64 {
        self.procedures.iter().map(ProcedureLine::line_total).sum()
    }

    pub fn add_procedure(&mut self, line: ProcedureLine) -> Result<(), WizardError> {
        line.check()?;
        self.procedures.push(line);
        Ok(())
    }

    pub fn update_procedure(&mut self, index: usize, line: ProcedureLine) -> Result<(), WizardError> {
        line.check()?;
        let len = self.procedures.len();
        let slot = self
            .procedures
            .get_mut(index)
            .ok_or(WizardError::IndexOutOfRange {
                kind: "procedure",
                index,
                len,
            })?;
        *slot = line;
        Ok(())
    }

    pub fn remove_procedure(&mut self, index: usize) -> Result<ProcedureLine, WizardError> {
        if index >= self.procedures.len() {
            return Err(WizardError::IndexOutOfRange {
                kind: "procedure",
                index,
                len: self.procedures.len(),
            });
        }
        Ok(self.procedures.remove(index))
    }

    /// Append a diagnosis. The first one added becomes primary.
    pub fn add_diagnosis(&mut self, code: impl Into<String>, description: impl Into<String>) {
        let primary = self.diagnoses.is_empty();
        self.diagnoses.push(DiagnosisEntry {
            code: code.into(),
            description: description.into(),
            primary,
        });
    }

    pub fn set_primary_diagnosis(&mut self, index: usize) -> Result<(), WizardError> {
        if index >= self.diagnoses.len() {
            return Err(WizardError::IndexOutOfRange {
                kind: "diagnosis",
                index,
                len: self.diagnoses.len(),
            });
        }
        for (i, d) in self.diagnoses.iter_mut().enumerate() {
            d.primary = i == index;
        }
        Ok(())
    }

    /// Remove a diagnosis. Removing the primary promotes the new first entry.
    pub fn remove_diagnosis(&mut self, index: usize) -> Result<DiagnosisEntry, WizardError> {
        if index >= self.diagnoses.len() {
            return Err(WizardError::IndexOutOfRange {
                kind: "diagnosis",
                index,
                len: self.diagnoses.len(),
            });
        }
        let removed = self.diagnoses.remove(index);
        if removed.primary
            && let Some(first) = self.diagnoses.first_mut()
        {
            first.primary = true;
        }
        Ok(removed)
    }

    pub fn primary_diagnosis(&self) -> Option<&DiagnosisEntry> {
        self.diagnoses.iter().find(|d| d.primary)
    }

    /// Completion predicate for each wizard step.
    pub fn is_step_complete(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::Patient => self.patient.is_some(),
            WizardStep::Services => !self.procedures.is_empty(),
            WizardStep::Diagnosis => self.diagnoses.iter().any(|d| d.primary),
            WizardStep::Insurance => self.insurance.primary.is_some(),
            WizardStep::Review => true,
        }
    }

    /// Every step complete and every procedure line well-formed.
    pub fn validate_for_submission(&self) -> Result<(), WizardError> {
        if let Some(step) = WizardStep::ALL
            .into_iter()
            .find(|s| !self.is_step_complete(*s))
        {
            return Err(WizardError::IncompleteStep(step));
        }
        self.procedures.iter().try_for_each(ProcedureLine::check)
    }

    /// Exactly one primary once non-empty: keep the first flagged entry, or
    /// flag the first entry when none is.
    fn normalize_primary(&mut self) {
        let keep = self.diagnoses.iter().position(|d| d.primary).unwrap_or(0);
        for (i, d) in self.diagnoses.iter_mut().enumerate() {
            d.primary = i == keep;
        }
    }
}

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::record;
use crate::error::{CoreError, WizardError};
use crate::search::Searchable;
use crate::storage_keys;
use crate::validate;
use crate::wizard::draft::ClaimDraft;
use crate::wizard::step::WizardStep;

/// Reference to a patient as selected in the claim wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatientRef {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub date_of_birth: Option<jiff::civil::Date>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProviderRef {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub npi: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PayerRef {
    pub id: Uuid,
    pub name: String,
}

/// One billed service: a CPT code with units and a per-unit amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProcedureLine {
    pub code: String,
    #[serde(default)]
    pub description: String,
    pub units: u32,
    /// Charge per unit, in dollars.
    pub amount: f64,
}

impl ProcedureLine {
    pub fn line_total(&self) -> f64 {
        self.amount * f64::from(self.units)
    }

    pub fn check(&self) -> Result<(), WizardError> {
        if self.units < 1 {
            return Err(WizardError::InvalidUnits {
                code: self.code.clone(),
            });
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(WizardError::InvalidAmount {
                code: self.code.clone(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiagnosisEntry {
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub primary: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InsuranceSelection {
    #[serde(default)]
    pub primary: Option<PayerRef>,
    #[serde(default)]
    pub secondary: Option<PayerRef>,
    #[serde(default)]
    pub authorization_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Claim {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub claim_number: String,
    pub patient: PatientRef,
    #[serde(default)]
    pub provider: Option<ProviderRef>,
    #[serde(default)]
    pub service_date: Option<jiff::civil::Date>,
    pub procedures: Vec<ProcedureLine>,
    pub diagnoses: Vec<DiagnosisEntry>,
    pub insurance: InsuranceSelection,
    #[serde(default)]
    pub notes: String,
    pub total_amount: f64,
    pub status: ClaimStatus,
    #[serde(default)]
    pub submitted_at: Option<jiff::Timestamp>,
    #[serde(default = "jiff::Timestamp::now")]
    pub created_at: jiff::Timestamp,
    #[serde(default = "jiff::Timestamp::now")]
    pub updated_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ClaimStatus {
    Submitted,
    Accepted,
    Rejected,
    Paid,
    Denied,
}

impl ClaimStatus {
    pub fn can_transition_to(self, next: ClaimStatus) -> bool {
        use ClaimStatus::*;
        matches!(
            (self, next),
            (Submitted, Accepted)
                | (Submitted, Rejected)
                | (Accepted, Paid)
                | (Accepted, Denied)
                | (Rejected, Submitted)
        )
    }

    /// Only claims the payer has not taken on may be edited.
    pub fn is_editable(self) -> bool {
        matches!(self, ClaimStatus::Submitted | ClaimStatus::Rejected)
    }
}

impl Claim {
    /// Build a submitted claim from a finished wizard draft.
    pub fn from_draft(draft: ClaimDraft, now: jiff::Timestamp) -> Result<Self, WizardError> {
        draft.validate_for_submission()?;
        let id = Uuid::new_v4();
        let total_amount = draft.total_amount();
        let patient = draft
            .patient
            .ok_or(WizardError::IncompleteStep(WizardStep::Patient))?;
        let service_date = draft.service_date;
        let numbered_on =
            service_date.unwrap_or_else(|| now.to_zoned(jiff::tz::TimeZone::UTC).date());

        Ok(Self {
            id,
            claim_number: claim_number(numbered_on, id),
            patient,
            provider: draft.provider,
            service_date,
            procedures: draft.procedures,
            diagnoses: draft.diagnoses,
            insurance: draft.insurance,
            notes: draft.notes,
            total_amount,
            status: ClaimStatus::Submitted,
            submitted_at: Some(now),
            created_at: now,
            updated_at: now,
        })
    }

    /// Overwrite the billed content from an edited draft. A rejected claim goes
    /// back to submitted.
    pub fn apply_draft(&mut self, draft: ClaimDraft, now: jiff::Timestamp) -> Result<(), WizardError> {
        draft.validate_for_submission()?;
        self.total_amount = draft.total_amount();
        if let Some(patient) = draft.patient {
            self.patient = patient;
        }
        self.provider = draft.provider;
        self.service_date = draft.service_date;
        self.procedures = draft.procedures;
        self.diagnoses = draft.diagnoses;
        self.insurance = draft.insurance;
        self.notes = draft.notes;
        if self.status == ClaimStatus::Rejected {
            self.status = ClaimStatus::Submitted;
            self.submitted_at = Some(now);
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn set_status(&mut self, next: ClaimStatus, now: jiff::Timestamp) -> Result<(), CoreError> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::InvalidField {
                field: "status".to_string(),
                reason: format!("cannot move from {:?} to {:?}", self.status, next),
            });
        }
        if next == ClaimStatus::Submitted {
            self.submitted_at = Some(now);
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }

    pub fn primary_diagnosis(&self) -> Option<&DiagnosisEntry> {
        self.diagnoses.iter().find(|d| d.primary)
    }

    fn check(&self) -> Result<(), CoreError> {
        validate::require("claim_number", &self.claim_number)?;
        validate::require("patient.name", &self.patient.name)?;
        validate::non_negative("total_amount", self.total_amount)
    }
}

record!(Claim, "claim", storage_keys::CLAIMS_PREFIX, storage_keys::claim);

impl Searchable for Claim {
    fn search_fields(&self) -> Vec<String> {
        let mut fields = vec![self.claim_number.clone(), self.patient.name.clone()];
        fields.extend(self.procedures.iter().map(|p| p.code.clone()));
        fields.extend(self.diagnoses.iter().map(|d| d.code.clone()));
        fields.extend(self.insurance.primary.as_ref().map(|p| p.name.clone()));
        fields
    }
}

/// `CLM-YYYYMMDD-XXXXXX`, the suffix taken from the claim id.
pub fn claim_number(service_date: jiff::civil::Date, id: Uuid) -> String {
    let suffix: String = id.simple().to_string().chars().take(6).collect();
    format!(
        "CLM-{}-{}",
        service_date.strftime("%Y%m%d"),
        suffix.to_ascii_uppercase()
    )
}

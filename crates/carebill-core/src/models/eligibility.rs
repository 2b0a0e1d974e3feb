use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::payment_plan::round_cents;

/// A point-in-time coverage check for a patient against one payer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EligibilityCheck {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub patient_id: Uuid,
    pub payer_id: Uuid,
    pub member_id: String,
    pub coverage_status: CoverageStatus,
    #[serde(default)]
    pub plan_name: Option<String>,
    #[serde(default)]
    pub copay: Option<f64>,
    #[serde(default)]
    pub deductible: f64,
    #[serde(default)]
    pub deductible_met: f64,
    #[serde(default)]
    pub out_of_pocket_max: Option<f64>,
    #[serde(default = "jiff::Timestamp::now")]
    pub checked_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CoverageStatus {
    Active,
    Inactive,
    Unknown,
}

impl EligibilityCheck {
    pub fn remaining_deductible(&self) -> f64 {
        round_cents((self.deductible - self.deductible_met).max(0.0))
    }
}

/// The most recent check, if any.
pub fn latest(checks: &[EligibilityCheck]) -> Option<&EligibilityCheck> {
    checks.iter().max_by_key(|c| c.checked_at)
}

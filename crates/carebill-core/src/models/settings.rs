use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::collections::StageThresholds;
use crate::error::CoreError;
use crate::validate;

/// Current settings version. Bump this when adding fields or changing shape.
pub const CURRENT_VERSION: u32 = 1;

/// Practice-wide billing settings, one document per bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PracticeSettings {
    #[serde(default)]
    pub settings_version: u32,
    pub practice_name: String,
    #[serde(default)]
    pub statement_footer: String,
    #[serde(default = "default_installment_count")]
    pub default_installment_count: u32,
    /// Upper bound on payment-plan discounts, in percent.
    #[serde(default = "default_max_discount")]
    pub max_discount_percent: f64,
    /// Overdue installments after which an active plan is defaulted.
    #[serde(default = "default_missed_limit")]
    pub plan_missed_limit: u32,
    #[serde(default)]
    pub collections: StageThresholds,
}

fn default_installment_count() -> u32 {
    6
}

fn default_max_discount() -> f64 {
    20.0
}

fn default_missed_limit() -> u32 {
    2
}

impl Default for PracticeSettings {
    fn default() -> Self {
        Self {
            settings_version: CURRENT_VERSION,
            practice_name: "Carebill Practice".to_string(),
            statement_footer: String::new(),
            default_installment_count: default_installment_count(),
            max_discount_percent: default_max_discount(),
            plan_missed_limit: default_missed_limit(),
            collections: StageThresholds::default(),
        }
    }
}

impl PracticeSettings {
    /// Stamp a loaded document with [`CURRENT_VERSION`]. Documents written by a
    /// newer build are rejected rather than silently truncated.
    pub fn migrate(mut self) -> Result<Self, CoreError> {
        if self.settings_version > CURRENT_VERSION {
            return Err(CoreError::InvalidField {
                field: "settings_version".to_string(),
                reason: format!(
                    "{} is newer than this build supports ({CURRENT_VERSION})",
                    self.settings_version
                ),
            });
        }
        self.settings_version = CURRENT_VERSION;
        Ok(self)
    }

    pub fn check(&self) -> Result<(), CoreError> {
        validate::require("practice_name", &self.practice_name)?;
        if self.default_installment_count == 0 {
            return Err(CoreError::InvalidField {
                field: "default_installment_count".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=100.0).contains(&self.max_discount_percent) {
            return Err(CoreError::InvalidField {
                field: "max_discount_percent".to_string(),
                reason: "must be between 0 and 100".to_string(),
            });
        }
        let t = &self.collections;
        if !(t.past_due_30 < t.past_due_60 && t.past_due_60 < t.past_due_90 && t.past_due_90 < t.agency) {
            return Err(CoreError::InvalidField {
                field: "collections".to_string(),
                reason: "stage thresholds must be strictly increasing".to_string(),
            });
        }
        Ok(())
    }
}

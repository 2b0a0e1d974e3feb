use thiserror::Error;

use crate::models::collections::CollectionsStage;
use crate::wizard::step::WizardStep;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("invalid uuid: {0}")]
    InvalidUuid(#[from] uuid::Error),
}

#[derive(Debug, Error, PartialEq)]
pub enum WizardError {
    #[error("step {} ({}) is not complete", .0.index(), .0.title())]
    IncompleteStep(WizardStep),

    #[error("claims can only be submitted from the review step")]
    NotOnReview,

    #[error("{kind} index {index} is out of range (len {len})")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    #[error("procedure {code}: units must be at least 1")]
    InvalidUnits { code: String },

    #[error("procedure {code}: amount must be a non-negative number")]
    InvalidAmount { code: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error("installment count must be at least 1")]
    NoInstallments,

    #[error("discount percent {0} is outside 0–100")]
    InvalidDiscount(f64),

    #[error("{field} must be a non-negative number")]
    NegativeAmount { field: &'static str },

    #[error("down payment {down_payment:.2} exceeds discounted total {total:.2}")]
    DownPaymentExceedsTotal { down_payment: f64, total: f64 },

    #[error("installment due date out of range: {0}")]
    DateOutOfRange(String),

    #[error("payment plan is not active")]
    NotActive,
}

#[derive(Debug, Error, PartialEq)]
pub enum CollectionsError {
    #[error("account is in terminal stage {0:?}")]
    TerminalStage(CollectionsStage),

    #[error("payment amount must be positive, got {0}")]
    InvalidPayment(f64),
}

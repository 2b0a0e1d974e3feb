use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::payment_plan::round_cents;
use super::record;
use crate::error::{CollectionsError, CoreError};
use crate::search::Searchable;
use crate::storage_keys;
use crate::validate;

/// Pipeline stages, in the only order an account may move through them.
/// `Settled` and `WrittenOff` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CollectionsStage {
    Current,
    PastDue30,
    PastDue60,
    PastDue90,
    Agency,
    Settled,
    WrittenOff,
}

impl CollectionsStage {
    pub fn is_terminal(self) -> bool {
        matches!(self, CollectionsStage::Settled | CollectionsStage::WrittenOff)
    }

    /// Next stage in the aging pipeline. `Agency` is the last aging stage.
    pub fn next(self) -> Option<Self> {
        match self {
            CollectionsStage::Current => Some(CollectionsStage::PastDue30),
            CollectionsStage::PastDue30 => Some(CollectionsStage::PastDue60),
            CollectionsStage::PastDue60 => Some(CollectionsStage::PastDue90),
            CollectionsStage::PastDue90 => Some(CollectionsStage::Agency),
            CollectionsStage::Agency
            | CollectionsStage::Settled
            | CollectionsStage::WrittenOff => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CollectionsStage::Current => "Current",
            CollectionsStage::PastDue30 => "30+ days past due",
            CollectionsStage::PastDue60 => "60+ days past due",
            CollectionsStage::PastDue90 => "90+ days past due",
            CollectionsStage::Agency => "Sent to agency",
            CollectionsStage::Settled => "Settled",
            CollectionsStage::WrittenOff => "Written off",
        }
    }
}

/// Days past due at which an account enters each aging stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StageThresholds {
    pub past_due_30: i64,
    pub past_due_60: i64,
    pub past_due_90: i64,
    pub agency: i64,
}

impl Default for StageThresholds {
    fn default() -> Self {
        Self {
            past_due_30: 30,
            past_due_60: 60,
            past_due_90: 90,
            agency: 120,
        }
    }
}

impl StageThresholds {
    pub fn stage_for(&self, days_past_due: i64) -> CollectionsStage {
        if days_past_due >= self.agency {
            CollectionsStage::Agency
        } else if days_past_due >= self.past_due_90 {
            CollectionsStage::PastDue90
        } else if days_past_due >= self.past_due_60 {
            CollectionsStage::PastDue60
        } else if days_past_due >= self.past_due_30 {
            CollectionsStage::PastDue30
        } else {
            CollectionsStage::Current
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AccountNote {
    pub body: String,
    pub created_at: jiff::Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AccountPayment {
    pub amount: f64,
    #[serde(default)]
    pub method: Option<String>,
    pub received_at: jiff::Timestamp,
}

/// A patient balance that has progressed into the collections workflow.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CollectionsAccount {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub patient_id: Uuid,
    pub patient_name: String,
    pub original_balance: f64,
    pub current_balance: f64,
    /// Date the balance first became due; aging is measured from here.
    pub due_date: jiff::civil::Date,
    #[serde(default = "default_stage")]
    pub stage: CollectionsStage,
    #[serde(default)]
    pub agency: Option<String>,
    #[serde(default)]
    pub last_contact: Option<jiff::civil::Date>,
    #[serde(default)]
    pub notes: Vec<AccountNote>,
    #[serde(default)]
    pub payments: Vec<AccountPayment>,
    #[serde(default = "jiff::Timestamp::now")]
    pub created_at: jiff::Timestamp,
    #[serde(default = "jiff::Timestamp::now")]
    pub updated_at: jiff::Timestamp,
}

fn default_stage() -> CollectionsStage {
    CollectionsStage::Current
}

impl CollectionsAccount {
    pub fn days_past_due(&self, today: jiff::civil::Date) -> i64 {
        i64::from((today - self.due_date).get_days()).max(0)
    }

    pub fn add_note(&mut self, body: impl Into<String>, now: jiff::Timestamp) {
        self.notes.push(AccountNote {
            body: body.into(),
            created_at: now,
        });
        self.updated_at = now;
    }

    /// Move one stage forward in the aging pipeline.
    pub fn advance_stage(&mut self, now: jiff::Timestamp) -> Result<CollectionsStage, CollectionsError> {
        let next = self
            .stage
            .next()
            .ok_or(CollectionsError::TerminalStage(self.stage))?;
        self.transition(next, now);
        Ok(next)
    }

    /// Age the account against `thresholds`. Stages only move forward, so an
    /// account advanced by hand is never pulled back. Returns the new stage
    /// when it changed.
    pub fn refresh_stage(
        &mut self,
        today: jiff::civil::Date,
        thresholds: &StageThresholds,
        now: jiff::Timestamp,
    ) -> Option<CollectionsStage> {
        if self.stage.is_terminal() {
            return None;
        }
        let aged = thresholds.stage_for(self.days_past_due(today));
        if aged > self.stage {
            self.transition(aged, now);
            Some(aged)
        } else {
            None
        }
    }

    /// Apply a payment. A zero balance settles the account.
    pub fn record_payment(
        &mut self,
        amount: f64,
        method: Option<String>,
        now: jiff::Timestamp,
    ) -> Result<f64, CollectionsError> {
        if self.stage.is_terminal() {
            return Err(CollectionsError::TerminalStage(self.stage));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CollectionsError::InvalidPayment(amount));
        }
        let applied = amount.min(self.current_balance);
        self.current_balance = round_cents(self.current_balance - applied);
        self.payments.push(AccountPayment {
            amount: round_cents(applied),
            method,
            received_at: now,
        });
        self.add_note(format!("Payment of ${applied:.2} received"), now);
        if self.current_balance <= 0.0 {
            self.current_balance = 0.0;
            self.transition(CollectionsStage::Settled, now);
        }
        Ok(self.current_balance)
    }

    pub fn write_off(&mut self, reason: &str, now: jiff::Timestamp) -> Result<(), CollectionsError> {
        if self.stage.is_terminal() {
            return Err(CollectionsError::TerminalStage(self.stage));
        }
        self.add_note(
            format!("Written off ${:.2}: {reason}", self.current_balance),
            now,
        );
        self.transition(CollectionsStage::WrittenOff, now);
        Ok(())
    }

    fn transition(&mut self, to: CollectionsStage, now: jiff::Timestamp) {
        let from = self.stage;
        self.stage = to;
        self.add_note(format!("Stage {} → {}", from.label(), to.label()), now);
    }

    fn check(&self) -> Result<(), CoreError> {
        validate::require("patient_name", &self.patient_name)?;
        validate::non_negative("original_balance", self.original_balance)?;
        validate::non_negative("current_balance", self.current_balance)
    }
}

record!(
    CollectionsAccount,
    "collections account",
    storage_keys::COLLECTIONS_PREFIX,
    storage_keys::collections_account
);

impl Searchable for CollectionsAccount {
    fn search_fields(&self) -> Vec<String> {
        let mut fields = vec![self.patient_name.clone(), self.stage.label().to_string()];
        fields.extend(self.agency.clone());
        fields
    }
}

use jiff::ToSpan;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::record;
use crate::error::{CoreError, PlanError};
use crate::storage_keys;

/// Round a dollar amount to whole cents.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// What the patient agreed to. Installments are derived from these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlanTerms {
    pub total_amount: f64,
    #[serde(default)]
    pub down_payment: f64,
    #[serde(default)]
    pub discount_percent: f64,
    pub installment_count: u32,
    /// Due date of the first installment; later ones fall on the same day of
    /// each following month.
    pub start_date: jiff::civil::Date,
}

impl PlanTerms {
    /// Clamp the discount into `[0, max_percent]`.
    pub fn with_discount_cap(mut self, max_percent: f64) -> Self {
        self.discount_percent = self.discount_percent.clamp(0.0, max_percent.max(0.0));
        self
    }

    pub fn discounted_total(&self) -> f64 {
        round_cents(self.total_amount * (1.0 - self.discount_percent / 100.0))
    }

    /// Amount spread over the installments: discounted total less the down payment.
    pub fn financed_amount(&self) -> Result<f64, PlanError> {
        if !self.total_amount.is_finite() || self.total_amount < 0.0 {
            return Err(PlanError::NegativeAmount {
                field: "total_amount",
            });
        }
        if !self.down_payment.is_finite() || self.down_payment < 0.0 {
            return Err(PlanError::NegativeAmount {
                field: "down_payment",
            });
        }
        if !(0.0..=100.0).contains(&self.discount_percent) {
            return Err(PlanError::InvalidDiscount(self.discount_percent));
        }
        let total = self.discounted_total();
        if self.down_payment > total {
            return Err(PlanError::DownPaymentExceedsTotal {
                down_payment: self.down_payment,
                total,
            });
        }
        Ok(round_cents(total - self.down_payment))
    }

    /// Split the financed amount into monthly installments.
    ///
    /// The split is done in whole cents: each installment gets the even share
    /// rounded down, and the last one also takes the leftover cents, so no
    /// installment is negative and the schedule sums exactly to the financed
    /// amount. Installment `k` is due `start_date + k months`, with the day
    /// clamped to the end of shorter months.
    pub fn generate_installments(&self) -> Result<Vec<Installment>, PlanError> {
        if self.installment_count == 0 {
            return Err(PlanError::NoInstallments);
        }
        let financed_cents = (self.financed_amount()? * 100.0).round() as i64;
        let count = self.installment_count;
        let share_cents = financed_cents / i64::from(count);
        let leftover_cents = financed_cents % i64::from(count);

        (0..count)
            .map(|k| {
                let due_date = self
                    .start_date
                    .checked_add(i64::from(k).months())
                    .map_err(|e| PlanError::DateOutOfRange(e.to_string()))?;
                let cents = if k + 1 == count {
                    share_cents + leftover_cents
                } else {
                    share_cents
                };
                let amount = cents as f64 / 100.0;
                Ok(Installment {
                    sequence: k + 1,
                    due_date,
                    amount,
                    paid: false,
                    paid_at: None,
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Installment {
    /// 1-based position in the schedule.
    pub sequence: u32,
    pub due_date: jiff::civil::Date,
    pub amount: f64,
    #[serde(default)]
    pub paid: bool,
    #[serde(default)]
    pub paid_at: Option<jiff::Timestamp>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PlanStatus {
    Active,
    Completed,
    Defaulted,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentPlan {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub patient_id: Uuid,
    pub terms: PlanTerms,
    pub installments: Vec<Installment>,
    pub status: PlanStatus,
    #[serde(default = "jiff::Timestamp::now")]
    pub created_at: jiff::Timestamp,
    #[serde(default = "jiff::Timestamp::now")]
    pub updated_at: jiff::Timestamp,
}

impl PaymentPlan {
    pub fn new(patient_id: Uuid, terms: PlanTerms, now: jiff::Timestamp) -> Result<Self, PlanError> {
        let installments = terms.generate_installments()?;
        Ok(Self {
            id: Uuid::new_v4(),
            patient_id,
            terms,
            installments,
            status: PlanStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    /// The earliest unpaid installment.
    pub fn next_due(&self) -> Option<&Installment> {
        self.installments.iter().find(|i| !i.paid)
    }

    pub fn remaining_balance(&self) -> f64 {
        round_cents(
            self.installments
                .iter()
                .filter(|i| !i.paid)
                .map(|i| i.amount)
                .sum(),
        )
    }

    /// Unpaid installments whose due date is before `today`.
    pub fn overdue(&self, today: jiff::civil::Date) -> Vec<&Installment> {
        self.installments
            .iter()
            .filter(|i| !i.paid && i.due_date < today)
            .collect()
    }

    /// Mark the earliest unpaid installment paid. The plan completes when none remain.
    pub fn record_payment(&mut self, now: jiff::Timestamp) -> Result<Installment, PlanError> {
        if self.status != PlanStatus::Active {
            return Err(PlanError::NotActive);
        }
        let installment = self
            .installments
            .iter_mut()
            .find(|i| !i.paid)
            .ok_or(PlanError::NotActive)?;
        installment.paid = true;
        installment.paid_at = Some(now);
        let paid = installment.clone();

        if self.installments.iter().all(|i| i.paid) {
            self.status = PlanStatus::Completed;
        }
        self.updated_at = now;
        Ok(paid)
    }

    /// Move an active plan to defaulted once `missed_limit` installments are overdue.
    /// Returns whether the status changed.
    pub fn check_default(&mut self, today: jiff::civil::Date, missed_limit: u32, now: jiff::Timestamp) -> bool {
        if self.status != PlanStatus::Active || missed_limit == 0 {
            return false;
        }
        if self.overdue(today).len() >= missed_limit as usize {
            self.status = PlanStatus::Defaulted;
            self.updated_at = now;
            return true;
        }
        false
    }

    pub fn cancel(&mut self, now: jiff::Timestamp) -> Result<(), PlanError> {
        if self.status != PlanStatus::Active {
            return Err(PlanError::NotActive);
        }
        self.status = PlanStatus::Cancelled;
        self.updated_at = now;
        Ok(())
    }

    fn check(&self) -> Result<(), CoreError> {
        if self.installments.is_empty() {
            return Err(CoreError::MissingField("installments".to_string()));
        }
        Ok(())
    }
}

record!(
    PaymentPlan,
    "payment plan",
    storage_keys::PAYMENT_PLANS_PREFIX,
    storage_keys::payment_plan
);

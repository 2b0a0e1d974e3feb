//! The multi-step claim wizard: patient → services → diagnosis → insurance →
//! review → submit.
//!
//! [`ClaimWizard`] owns the step index and the [`ClaimDraft`]; each step
//! screen merges its own slice via [`ClaimWizard::update`]. The wizard performs
//! no I/O: [`ClaimWizard::submit`] hands the finished draft to a caller-supplied
//! callback, which owns persistence and error reporting.

pub mod draft;
pub mod step;

use jiff::{SignedDuration, Timestamp};

use crate::error::WizardError;
use crate::models::claim::Claim;
use draft::{ClaimDraft, DraftUpdate};
use step::WizardStep;

/// How long a blocked-advance message stays visible.
pub const VALIDATION_NOTICE_TTL: SignedDuration = SignedDuration::from_secs(3);

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationNotice {
    pub step: WizardStep,
    pub message: &'static str,
    pub raised_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct ClaimWizard {
    step: WizardStep,
    draft: ClaimDraft,
    notice: Option<ValidationNotice>,
    editing: Option<uuid::Uuid>,
}

impl Default for ClaimWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Patient,
            draft: ClaimDraft::default(),
            notice: None,
            editing: None,
        }
    }

    /// Open the wizard on an existing claim.
    pub fn edit(claim: &Claim) -> Self {
        Self {
            draft: ClaimDraft::from_claim(claim),
            editing: Some(claim.id),
            ..Self::new()
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &ClaimDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ClaimDraft {
        &mut self.draft
    }

    /// Id of the claim being edited, if the wizard was opened in edit mode.
    pub fn editing(&self) -> Option<uuid::Uuid> {
        self.editing
    }

    pub fn update(&mut self, update: DraftUpdate) {
        self.draft.merge(update);
    }

    pub fn total_amount(&self) -> f64 {
        self.draft.total_amount()
    }

    pub fn is_step_complete(&self, step: WizardStep) -> bool {
        self.draft.is_step_complete(step)
    }

    /// Advance one step. Returns `false` and raises the validation notice when
    /// the current step is incomplete or already last.
    pub fn next(&mut self, now: Timestamp) -> bool {
        if !self.is_step_complete(self.step) {
            tracing::debug!(step = self.step.title(), "claim wizard advance blocked");
            self.notice = Some(ValidationNotice {
                step: self.step,
                message: self.step.requirement(),
                raised_at: now,
            });
            return false;
        }
        match self.step.next() {
            Some(next) => {
                self.step = next;
                self.notice = None;
                true
            }
            None => false,
        }
    }

    /// Go back one step. A no-op on the first step.
    pub fn prev(&mut self) -> bool {
        match self.step.prev() {
            Some(prev) => {
                self.step = prev;
                true
            }
            None => false,
        }
    }

    /// The blocked-advance notice, while it is still within its display window.
    pub fn validation_notice(&self, now: Timestamp) -> Option<&ValidationNotice> {
        self.notice
            .as_ref()
            .filter(|n| now.duration_since(n.raised_at) < VALIDATION_NOTICE_TTL)
    }

    pub fn show_validation(&self, now: Timestamp) -> bool {
        self.validation_notice(now).is_some()
    }

    /// Hand the finished draft to `on_submit` and reset the wizard.
    ///
    /// Only allowed from the review step with every step complete; on error
    /// the draft is left in place.
    pub fn submit<F, R>(&mut self, on_submit: F) -> Result<R, WizardError>
    where
        F: FnOnce(ClaimDraft) -> R,
    {
        if self.step != WizardStep::Review {
            return Err(WizardError::NotOnReview);
        }
        self.draft.validate_for_submission()?;
        let draft = std::mem::take(&mut self.draft);
        *self = Self::new();
        Ok(on_submit(draft))
    }
}

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The five screens of the claim wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum WizardStep {
    Patient,
    Services,
    Diagnosis,
    Insurance,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::Patient,
        WizardStep::Services,
        WizardStep::Diagnosis,
        WizardStep::Insurance,
        WizardStep::Review,
    ];

    /// 1-based position, as shown in the step indicator.
    pub fn index(self) -> u8 {
        match self {
            WizardStep::Patient => 1,
            WizardStep::Services => 2,
            WizardStep::Diagnosis => 3,
            WizardStep::Insurance => 4,
            WizardStep::Review => 5,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.index() == index)
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Patient => "Patient",
            WizardStep::Services => "Services",
            WizardStep::Diagnosis => "Diagnosis",
            WizardStep::Insurance => "Insurance",
            WizardStep::Review => "Review",
        }
    }

    /// Message shown when `next` is blocked on this step.
    pub fn requirement(self) -> &'static str {
        match self {
            WizardStep::Patient => "Select a patient to continue.",
            WizardStep::Services => "Add at least one procedure to continue.",
            WizardStep::Diagnosis => "Mark a primary diagnosis to continue.",
            WizardStep::Insurance => "Select the primary insurance to continue.",
            WizardStep::Review => "",
        }
    }
}

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::validate;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Address {
    #[serde(default)]
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
}

impl Address {
    pub fn is_blank(&self) -> bool {
        self.line1.trim().is_empty()
            && self.city.trim().is_empty()
            && self.state.trim().is_empty()
            && self.zip.trim().is_empty()
    }

    /// A blank address passes; a partially filled one must be complete.
    pub fn check(&self, field: &str) -> Result<(), CoreError> {
        if self.is_blank() {
            return Ok(());
        }
        validate::require(&format!("{field}.line1"), &self.line1)?;
        validate::require(&format!("{field}.city"), &self.city)?;
        validate::require(&format!("{field}.state"), &self.state)?;
        validate::zip(&format!("{field}.zip"), &self.zip)
    }

    /// Single-line form used on statements and in search.
    pub fn one_line(&self) -> String {
        if self.is_blank() {
            return String::new();
        }
        let mut parts = vec![self.line1.clone()];
        if let Some(line2) = self.line2.as_deref().filter(|l| !l.trim().is_empty()) {
            parts.push(line2.to_string());
        }
        parts.push(format!("{}, {} {}", self.city, self.state, self.zip));
        parts.join(", ")
    }
}

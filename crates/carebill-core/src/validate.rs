//! Field-level checks shared by every registry form.

use crate::error::CoreError;

/// Fail with [`CoreError::MissingField`] when `value` is empty after trimming.
pub fn require(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(CoreError::MissingField(field.to_string()))
    } else {
        Ok(())
    }
}

/// NPI: exactly 10 ASCII digits.
pub fn npi(field: &str, value: &str) -> Result<(), CoreError> {
    if value.len() != 10 || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(CoreError::InvalidField {
            field: field.to_string(),
            reason: "must be exactly 10 digits".to_string(),
        });
    }
    Ok(())
}

/// Optional NPI: blank is allowed, anything else must be valid.
pub fn optional_npi(field: &str, value: Option<&str>) -> Result<(), CoreError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => npi(field, v),
        _ => Ok(()),
    }
}

/// ZIP: `XXXXX` or `XXXXX-XXXX`.
pub fn zip(field: &str, value: &str) -> Result<(), CoreError> {
    let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    let ok = (value.len() == 5 && digits(value))
        || (value.len() == 10
            && value.as_bytes()[5] == b'-'
            && digits(&value[..5])
            && digits(&value[6..]));
    if ok {
        Ok(())
    } else {
        Err(CoreError::InvalidField {
            field: field.to_string(),
            reason: "must be XXXXX or XXXXX-XXXX".to_string(),
        })
    }
}

pub fn non_negative(field: &str, value: f64) -> Result<(), CoreError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CoreError::InvalidField {
            field: field.to_string(),
            reason: "must be a non-negative number".to_string(),
        })
    }
}

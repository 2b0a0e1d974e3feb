use axum::extract::{Path, State};
use axum::{Extension, Json};
use uuid::Uuid;

use carebill_core::models::eligibility::{self, EligibilityCheck};
use carebill_core::models::patient::Patient;
use carebill_core::storage_keys;
use carebill_storage::records;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub async fn get_patient(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Patient>, ApiError> {
    user.require_patient_access(id)?;
    Ok(Json(records::get(state.store(), id).await?))
}

async fn load_checks(state: &AppState, patient_id: Uuid) -> Result<Vec<EligibilityCheck>, ApiError> {
    let prefix = storage_keys::eligibility_prefix(patient_id);
    Ok(records::list_json(state.store(), &prefix).await?)
}

pub async fn latest_eligibility(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<EligibilityCheck>, ApiError> {
    user.require_patient_access(id)?;
    let checks = load_checks(&state, id).await?;
    eligibility::latest(&checks)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no eligibility checks for patient {id}")))
}

/// All checks, newest first.
pub async fn eligibility_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<EligibilityCheck>>, ApiError> {
    user.require_patient_access(id)?;
    let mut checks = load_checks(&state, id).await?;
    checks.sort_by(|a, b| b.checked_at.cmp(&a.checked_at));
    Ok(Json(checks))
}

pub async fn record_eligibility(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(mut check): Json<EligibilityCheck>,
) -> Result<Json<EligibilityCheck>, ApiError> {
    user.require_staff()?;
    // the patient must exist
    let _: Patient = records::get(state.store(), id).await?;

    check.id = Uuid::new_v4();
    check.patient_id = id;
    check.checked_at = jiff::Timestamp::now();
    records::write_json(
        state.store(),
        &storage_keys::eligibility_check(id, check.id),
        &check,
    )
    .await?;

    tracing::info!(patient_id = %id, status = ?check.coverage_status, "eligibility recorded");
    Ok(Json(check))
}

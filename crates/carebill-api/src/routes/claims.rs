use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use carebill_codes::validate_draft_codes;
use carebill_core::models::claim::{Claim, ClaimStatus};
use carebill_core::models::patient::Patient;
use carebill_core::models::provider::Provider;
use carebill_core::search;
use carebill_core::wizard::draft::ClaimDraft;
use carebill_storage::records;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::routes::registry::require_exists;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ClaimQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub status: Option<ClaimStatus>,
    #[serde(default)]
    pub patient_id: Option<Uuid>,
}

/// Claims, newest first. Patient sessions only ever see their own.
pub async fn list_claims(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ClaimQuery>,
) -> Result<Json<Vec<Claim>>, ApiError> {
    let patient_id = user.patient_scope().or(query.patient_id);

    let mut claims: Vec<Claim> = records::list(state.store()).await?;
    claims.retain(|c| {
        patient_id.is_none_or(|id| c.patient.id == id)
            && query.status.is_none_or(|s| c.status == s)
    });
    claims.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(Json(search::filter(claims, query.q.as_deref())))
}

pub async fn get_claim(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Claim>, ApiError> {
    let claim: Claim = records::get(state.store(), id).await?;
    user.require_patient_access(claim.patient.id)?;
    Ok(Json(claim))
}

/// The claim as a wizard draft, for editing.
pub async fn claim_draft(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClaimDraft>, ApiError> {
    user.require_staff()?;
    let claim: Claim = records::get(state.store(), id).await?;
    Ok(Json(ClaimDraft::from_claim(&claim)))
}

/// Code formats first, then the wizard's own completeness rules, then the
/// referenced patient and provider must exist.
async fn check_draft(state: &AppState, draft: &ClaimDraft) -> Result<(), ApiError> {
    if let Some(err) = validate_draft_codes(draft).into_iter().next() {
        return Err(err.into());
    }
    draft.validate_for_submission()?;

    if let Some(patient) = &draft.patient {
        require_exists::<Patient>(state, patient.id).await?;
    }
    if let Some(provider) = &draft.provider {
        require_exists::<Provider>(state, provider.id).await?;
    }
    Ok(())
}

/// Persist a submitted wizard draft as a new claim.
pub async fn submit_claim(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(draft): Json<ClaimDraft>,
) -> Result<Json<Claim>, ApiError> {
    user.require_staff()?;
    check_draft(&state, &draft).await?;

    let claim = Claim::from_draft(draft, jiff::Timestamp::now())?;
    records::save(state.store(), &claim).await?;

    tracing::info!(
        claim_id = %claim.id,
        claim_number = %claim.claim_number,
        total = claim.total_amount,
        "claim submitted"
    );
    Ok(Json(claim))
}

/// Apply a draft built in edit mode to an existing claim.
pub async fn edit_claim(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(draft): Json<ClaimDraft>,
) -> Result<Json<Claim>, ApiError> {
    user.require_staff()?;
    let mut claim: Claim = records::get(state.store(), id).await?;
    if !claim.status.is_editable() {
        return Err(ApiError::Conflict(format!(
            "claim {} is {:?} and can no longer be edited",
            claim.claim_number, claim.status
        )));
    }
    check_draft(&state, &draft).await?;

    claim.apply_draft(draft, jiff::Timestamp::now())?;
    records::save(state.store(), &claim).await?;
    tracing::info!(claim_id = %claim.id, "claim edited");
    Ok(Json(claim))
}

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: ClaimStatus,
}

pub async fn update_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(change): Json<StatusChange>,
) -> Result<Json<Claim>, ApiError> {
    user.require_staff()?;
    let mut claim: Claim = records::get(state.store(), id).await?;
    let from = claim.status;
    claim
        .set_status(change.status, jiff::Timestamp::now())
        .map_err(|e| ApiError::Conflict(e.to_string()))?;
    records::save(state.store(), &claim).await?;

    tracing::info!(claim_id = %claim.id, from = ?from, to = ?claim.status, "claim status changed");
    Ok(Json(claim))
}

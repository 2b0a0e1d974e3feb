use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Extension;
use uuid::Uuid;

use carebill_core::models::claim::Claim;
use carebill_core::models::patient::Patient;
use carebill_core::models::payment_plan::PaymentPlan;
use carebill_core::storage_keys;
use carebill_export::render::{Statement, render_statement};
use carebill_storage::records;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::routes::settings::load_template;
use crate::state::{AppState, today};

/// Render the patient's statement as plain text.
pub async fn patient_statement(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_patient_access(id)?;

    let patient: Patient = records::get(state.store(), id).await?;
    let claims: Vec<Claim> = records::list(state.store()).await?;
    let plans: Vec<PaymentPlan> = records::list(state.store()).await?;
    let settings = state.settings().await?;
    let template = load_template(&state, storage_keys::STATEMENT_TEMPLATE).await?;

    let statement = Statement::build(&settings, &patient, &claims, &plans, today());
    let text = render_statement(&statement, template.as_deref())?;

    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text))
}

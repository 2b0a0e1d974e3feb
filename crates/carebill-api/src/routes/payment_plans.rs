use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use carebill_core::models::patient::Patient;
use carebill_core::models::payment_plan::{Installment, PaymentPlan, PlanStatus, PlanTerms};
use carebill_core::models::settings::PracticeSettings;
use carebill_storage::records;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::routes::registry::require_exists;
use crate::state::{AppState, today};

/// Plan terms as entered on the form. The installment count falls back to
/// the practice default.
#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub patient_id: Uuid,
    pub total_amount: f64,
    #[serde(default)]
    pub down_payment: f64,
    #[serde(default)]
    pub discount_percent: f64,
    #[serde(default)]
    pub installment_count: Option<u32>,
    pub start_date: jiff::civil::Date,
}

impl PlanRequest {
    fn terms(&self, settings: &PracticeSettings) -> PlanTerms {
        PlanTerms {
            total_amount: self.total_amount,
            down_payment: self.down_payment,
            discount_percent: self.discount_percent,
            installment_count: self
                .installment_count
                .unwrap_or(settings.default_installment_count),
            start_date: self.start_date,
        }
        .with_discount_cap(settings.max_discount_percent)
    }
}

#[derive(Debug, Serialize)]
pub struct PlanPreview {
    pub terms: PlanTerms,
    pub discounted_total: f64,
    pub financed_amount: f64,
    pub installments: Vec<Installment>,
}

/// Compute a schedule without saving anything.
pub async fn preview_plan(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<PlanRequest>,
) -> Result<Json<PlanPreview>, ApiError> {
    user.require_staff()?;
    let settings = state.settings().await?;
    let terms = req.terms(&settings);
    let installments = terms.generate_installments()?;

    Ok(Json(PlanPreview {
        discounted_total: terms.discounted_total(),
        financed_amount: terms.financed_amount()?,
        installments,
        terms,
    }))
}

pub async fn create_plan(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<PlanRequest>,
) -> Result<Json<PaymentPlan>, ApiError> {
    user.require_staff()?;
    require_exists::<Patient>(&state, req.patient_id).await?;
    let settings = state.settings().await?;

    let plan = PaymentPlan::new(req.patient_id, req.terms(&settings), jiff::Timestamp::now())?;
    records::save(state.store(), &plan).await?;

    tracing::info!(
        plan_id = %plan.id,
        patient_id = %plan.patient_id,
        installments = plan.installments.len(),
        "payment plan created"
    );
    Ok(Json(plan))
}

#[derive(Debug, Default, Deserialize)]
pub struct PlanQuery {
    #[serde(default)]
    pub patient_id: Option<Uuid>,
    #[serde(default)]
    pub status: Option<PlanStatus>,
}

pub async fn list_plans(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<PlanQuery>,
) -> Result<Json<Vec<PaymentPlan>>, ApiError> {
    let patient_id = user.patient_scope().or(query.patient_id);

    let mut plans: Vec<PaymentPlan> = records::list(state.store()).await?;
    plans.retain(|p| {
        patient_id.is_none_or(|id| p.patient_id == id) && query.status.is_none_or(|s| p.status == s)
    });
    plans.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(plans))
}

pub async fn get_plan(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentPlan>, ApiError> {
    let plan: PaymentPlan = records::get(state.store(), id).await?;
    user.require_patient_access(plan.patient_id)?;
    Ok(Json(plan))
}

/// Mark the next installment paid.
pub async fn record_payment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentPlan>, ApiError> {
    user.require_staff()?;
    let mut plan: PaymentPlan = records::get(state.store(), id).await?;
    let paid = plan.record_payment(jiff::Timestamp::now())?;
    records::save(state.store(), &plan).await?;

    tracing::info!(
        plan_id = %plan.id,
        sequence = paid.sequence,
        amount = paid.amount,
        status = ?plan.status,
        "installment paid"
    );
    Ok(Json(plan))
}

pub async fn cancel_plan(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentPlan>, ApiError> {
    user.require_staff()?;
    let mut plan: PaymentPlan = records::get(state.store(), id).await?;
    plan.cancel(jiff::Timestamp::now())?;
    records::save(state.store(), &plan).await?;
    Ok(Json(plan))
}

/// Default every active plan with too many overdue installments. Returns the
/// plans that changed.
pub async fn sweep_defaults(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<PaymentPlan>>, ApiError> {
    user.require_staff()?;
    let settings = state.settings().await?;
    let today = today();
    let now = jiff::Timestamp::now();

    let plans: Vec<PaymentPlan> = records::list(state.store()).await?;
    let mut defaulted = Vec::new();
    for mut plan in plans {
        if plan.check_default(today, settings.plan_missed_limit, now) {
            records::save(state.store(), &plan).await?;
            tracing::warn!(plan_id = %plan.id, patient_id = %plan.patient_id, "payment plan defaulted");
            defaulted.push(plan);
        }
    }
    Ok(Json(defaulted))
}

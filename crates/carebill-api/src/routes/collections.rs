use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use carebill_core::models::Record;
use carebill_core::models::collections::{CollectionsAccount, CollectionsStage};
use carebill_core::models::patient::Patient;
use carebill_core::search;
use carebill_core::storage_keys;
use carebill_export::render::{CollectionsNotice, render_collections_notice};
use carebill_storage::records;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::routes::settings::load_template;
use crate::state::{AppState, today};

#[derive(Debug, Default, Deserialize)]
pub struct AccountQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub stage: Option<CollectionsStage>,
}

/// Accounts, most overdue first.
pub async fn list_accounts(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<AccountQuery>,
) -> Result<Json<Vec<CollectionsAccount>>, ApiError> {
    user.require_staff()?;
    let mut accounts: Vec<CollectionsAccount> = records::list(state.store()).await?;
    accounts.retain(|a| query.stage.is_none_or(|s| a.stage == s));
    accounts.sort_by(|a, b| a.due_date.cmp(&b.due_date));
    Ok(Json(search::filter(accounts, query.q.as_deref())))
}

pub async fn get_account(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<CollectionsAccount>, ApiError> {
    user.require_staff()?;
    Ok(Json(records::get(state.store(), id).await?))
}

#[derive(Debug, Deserialize)]
pub struct OpenAccount {
    pub patient_id: Uuid,
    pub balance: f64,
    pub due_date: jiff::civil::Date,
    #[serde(default)]
    pub agency: Option<String>,
}

/// Move a patient balance into collections, aged immediately against the
/// practice thresholds.
pub async fn open_account(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<OpenAccount>,
) -> Result<Json<CollectionsAccount>, ApiError> {
    user.require_staff()?;
    if !(req.balance.is_finite() && req.balance > 0.0) {
        return Err(ApiError::BadRequest("balance must be positive".to_string()));
    }
    let patient: Patient = records::get(state.store(), req.patient_id).await?;
    let settings = state.settings().await?;
    let now = jiff::Timestamp::now();

    let mut account = CollectionsAccount {
        id: Uuid::new_v4(),
        patient_id: patient.id,
        patient_name: patient.full_name(),
        original_balance: req.balance,
        current_balance: req.balance,
        due_date: req.due_date,
        stage: CollectionsStage::Current,
        agency: req.agency,
        last_contact: None,
        notes: Vec::new(),
        payments: Vec::new(),
        created_at: now,
        updated_at: now,
    };
    account.validate()?;
    account.add_note(format!("Opened with balance ${:.2}", req.balance), now);
    account.refresh_stage(today(), &settings.collections, now);

    records::save(state.store(), &account).await?;
    tracing::info!(account_id = %account.id, stage = ?account.stage, "collections account opened");
    Ok(Json(account))
}

pub async fn advance_stage(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<CollectionsAccount>, ApiError> {
    user.require_staff()?;
    let mut account: CollectionsAccount = records::get(state.store(), id).await?;
    let stage = account.advance_stage(jiff::Timestamp::now())?;
    records::save(state.store(), &account).await?;
    tracing::info!(account_id = %id, stage = ?stage, "collections stage advanced");
    Ok(Json(account))
}

/// Age every open account. Returns the accounts whose stage moved.
pub async fn refresh_stages(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<CollectionsAccount>>, ApiError> {
    user.require_staff()?;
    let settings = state.settings().await?;
    let today = today();
    let now = jiff::Timestamp::now();

    let accounts: Vec<CollectionsAccount> = records::list(state.store()).await?;
    let mut moved = Vec::new();
    for mut account in accounts {
        if let Some(stage) = account.refresh_stage(today, &settings.collections, now) {
            records::save(state.store(), &account).await?;
            tracing::info!(account_id = %account.id, stage = ?stage, "collections stage aged");
            moved.push(account);
        }
    }
    Ok(Json(moved))
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub amount: f64,
    #[serde(default)]
    pub method: Option<String>,
}

pub async fn record_payment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<PaymentRequest>,
) -> Result<Json<CollectionsAccount>, ApiError> {
    user.require_staff()?;
    let mut account: CollectionsAccount = records::get(state.store(), id).await?;
    let remaining = account.record_payment(req.amount, req.method, jiff::Timestamp::now())?;
    records::save(state.store(), &account).await?;
    tracing::info!(account_id = %id, amount = req.amount, remaining, "collections payment recorded");
    Ok(Json(account))
}

#[derive(Debug, Deserialize)]
pub struct WriteOffRequest {
    pub reason: String,
}

pub async fn write_off(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<WriteOffRequest>,
) -> Result<Json<CollectionsAccount>, ApiError> {
    user.require_staff()?;
    if req.reason.trim().is_empty() {
        return Err(ApiError::BadRequest("missing required field: reason".to_string()));
    }
    let mut account: CollectionsAccount = records::get(state.store(), id).await?;
    account.write_off(req.reason.trim(), jiff::Timestamp::now())?;
    records::save(state.store(), &account).await?;
    tracing::info!(account_id = %id, "collections account written off");
    Ok(Json(account))
}

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    pub body: String,
    /// Set when the note records contact with the patient.
    #[serde(default)]
    pub contacted: bool,
}

pub async fn add_note(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<NoteRequest>,
) -> Result<Json<CollectionsAccount>, ApiError> {
    user.require_staff()?;
    if req.body.trim().is_empty() {
        return Err(ApiError::BadRequest("missing required field: body".to_string()));
    }
    let mut account: CollectionsAccount = records::get(state.store(), id).await?;
    account.add_note(format!("{}: {}", user.name, req.body.trim()), jiff::Timestamp::now());
    if req.contacted {
        account.last_contact = Some(today());
    }
    records::save(state.store(), &account).await?;
    Ok(Json(account))
}

/// Render the collections notice letter as plain text.
pub async fn notice(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_staff()?;
    let account: CollectionsAccount = records::get(state.store(), id).await?;
    let settings = state.settings().await?;
    let template = load_template(&state, storage_keys::COLLECTIONS_NOTICE_TEMPLATE).await?;

    let notice = CollectionsNotice::build(&settings, &account, today());
    let text = render_collections_notice(&notice, template.as_deref())?;
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text))
}

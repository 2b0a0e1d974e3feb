//! CSV export and import for the provider and facility registries.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::{Extension, Json};

use carebill_core::models::Record;
use carebill_core::models::facility::Facility;
use carebill_core::models::provider::Provider;
use carebill_export::csv_io::{self, Import, ImportSummary};
use carebill_storage::records;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn csv_response(filename: &str, body: String) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
}

pub async fn export_providers(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_staff()?;
    let mut providers: Vec<Provider> = records::list(state.store()).await?;
    providers.sort_by(|a, b| (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name)));
    Ok(csv_response("providers.csv", csv_io::export_providers(&providers)?))
}

pub async fn export_facilities(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_staff()?;
    let mut facilities: Vec<Facility> = records::list(state.store()).await?;
    facilities.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(csv_response("facilities.csv", csv_io::export_facilities(&facilities)?))
}

/// Store every row that parsed; the summary reports the rest by line.
async fn store_rows<T: Record>(
    state: &AppState,
    import: Import<T>,
) -> Result<ImportSummary, ApiError> {
    let summary = import.summary();
    for record in import.records {
        records::insert(state.store(), record).await?;
    }
    tracing::info!(
        kind = T::KIND,
        imported = summary.imported,
        failed = summary.failed,
        "CSV import stored"
    );
    Ok(summary)
}

fn busy() -> ApiError {
    ApiError::Conflict("another import is already running".to_string())
}

pub async fn import_providers(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: String,
) -> Result<Json<ImportSummary>, ApiError> {
    user.require_staff()?;
    let _ticket = state.imports.try_begin().ok_or_else(busy)?;
    let import = csv_io::import_providers(body.as_bytes())?;
    Ok(Json(store_rows(&state, import).await?))
}

pub async fn import_facilities(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: String,
) -> Result<Json<ImportSummary>, ApiError> {
    user.require_staff()?;
    let _ticket = state.imports.try_begin().ok_or_else(busy)?;
    let import = csv_io::import_facilities(body.as_bytes())?;
    Ok(Json(store_rows(&state, import).await?))
}

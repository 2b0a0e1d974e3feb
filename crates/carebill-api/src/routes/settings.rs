use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::IntoResponse;
use axum::{Extension, Json};

use carebill_core::models::settings::{CURRENT_VERSION, PracticeSettings};
use carebill_core::storage_keys;
use carebill_export::render::{
    DEFAULT_COLLECTIONS_NOTICE_TEMPLATE, DEFAULT_STATEMENT_TEMPLATE, check_template,
};
use carebill_storage::error::StorageError;
use carebill_storage::state::{save_state_if_absent, save_state_if_match};

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Current settings with their ETag. Defaults carry no ETag until first saved.
pub async fn get_settings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_staff()?;
    let (settings, etag) = state.settings_with_etag().await?;

    let mut headers = HeaderMap::new();
    if let Some(etag) = etag
        && let Ok(value) = etag.parse::<HeaderValue>()
    {
        headers.insert(header::ETAG, value);
    }
    Ok((headers, Json(settings)))
}

/// Replace the settings document.
///
/// Once a document exists, the request must carry `If-Match` with the ETag
/// from the last read; a stale ETag is a 409.
pub async fn put_settings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    headers: HeaderMap,
    Json(mut settings): Json<PracticeSettings>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_staff()?;
    settings.settings_version = CURRENT_VERSION;
    settings.check()?;

    let if_match = headers
        .get(header::IF_MATCH)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let (_, current_etag) = state.settings_with_etag().await?;

    let etag = match (if_match, current_etag) {
        (Some(expected), Some(_)) => {
            save_state_if_match(state.store(), storage_keys::PRACTICE_SETTINGS, &settings, &expected).await?
        }
        // another writer may create the document after our read
        (None, None) => {
            save_state_if_absent(state.store(), storage_keys::PRACTICE_SETTINGS, &settings).await?
        }
        (None, Some(_)) => {
            return Err(ApiError::Conflict(
                "settings already exist; send If-Match with the current ETag".to_string(),
            ));
        }
        (Some(_), None) => {
            return Err(ApiError::Conflict("settings were not found for If-Match".to_string()));
        }
    };
    tracing::info!(sub = %user.sub, "practice settings updated");

    let mut response_headers = HeaderMap::new();
    if let Ok(value) = etag.parse::<HeaderValue>() {
        response_headers.insert(header::ETAG, value);
    }
    Ok((response_headers, Json(settings)))
}

fn template_key(name: &str) -> Result<(&'static str, &'static str), ApiError> {
    match name {
        "statement" => Ok((storage_keys::STATEMENT_TEMPLATE, DEFAULT_STATEMENT_TEMPLATE)),
        "collections-notice" => Ok((
            storage_keys::COLLECTIONS_NOTICE_TEMPLATE,
            DEFAULT_COLLECTIONS_NOTICE_TEMPLATE,
        )),
        other => Err(ApiError::NotFound(format!("unknown template: {other}"))),
    }
}

/// The stored override at `key`, if any.
pub async fn load_template(state: &AppState, key: &str) -> Result<Option<String>, ApiError> {
    match state.store().get(key).await {
        Ok(output) => String::from_utf8(output.body)
            .map(Some)
            .map_err(|e| ApiError::Internal(format!("template {key} is not UTF-8: {e}"))),
        Err(StorageError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub async fn get_template(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    user.require_staff()?;
    let (key, default) = template_key(&name)?;
    let body = load_template(&state, key)
        .await?
        .unwrap_or_else(|| default.to_string());
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body))
}

/// Store a template override. It must parse before it is accepted.
pub async fn put_template(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(name): Path<String>,
    body: String,
) -> Result<Json<()>, ApiError> {
    user.require_staff()?;
    let (key, _) = template_key(&name)?;

    check_template(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    state
        .store()
        .put(key, body.into_bytes(), Some("text/plain; charset=utf-8"))
        .await?;
    tracing::info!(template = %name, "template override stored");
    Ok(Json(()))
}

pub async fn reset_template(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(name): Path<String>,
) -> Result<Json<()>, ApiError> {
    user.require_staff()?;
    let (key, _) = template_key(&name)?;
    state.store().delete(key).await?;
    Ok(Json(()))
}

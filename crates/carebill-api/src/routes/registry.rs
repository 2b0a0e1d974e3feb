//! Staff CRUD shared by the patient, provider, facility and payer registries.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use carebill_core::models::Record;
use carebill_core::search::{self, Searchable};
use carebill_storage::error::StorageError;
use carebill_storage::records;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

pub async fn list<T: Record + Searchable>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<T>>, ApiError> {
    user.require_staff()?;
    let items: Vec<T> = records::list(state.store()).await?;
    Ok(Json(search::filter(items, query.q.as_deref())))
}

pub async fn get<T: Record>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<T>, ApiError> {
    user.require_staff()?;
    Ok(Json(records::get(state.store(), id).await?))
}

pub async fn create<T: Record>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(record): Json<T>,
) -> Result<Json<T>, ApiError> {
    user.require_staff()?;
    record.validate()?;
    Ok(Json(records::insert(state.store(), record).await?))
}

pub async fn update<T: Record>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(record): Json<T>,
) -> Result<Json<T>, ApiError> {
    user.require_staff()?;
    record.validate()?;
    Ok(Json(records::update(state.store(), id, record).await?))
}

pub async fn remove<T: Record>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<()>, ApiError> {
    user.require_staff()?;
    records::delete::<T>(state.store(), id).await?;
    Ok(Json(()))
}

/// A reference from another record must point at something stored.
pub async fn require_exists<T: Record>(state: &AppState, id: Uuid) -> Result<(), ApiError> {
    match records::get::<T>(state.store(), id).await {
        Ok(_) => Ok(()),
        Err(StorageError::NotFound { .. }) => {
            Err(ApiError::BadRequest(format!("unknown {} {id}", T::KIND)))
        }
        Err(e) => Err(e.into()),
    }
}

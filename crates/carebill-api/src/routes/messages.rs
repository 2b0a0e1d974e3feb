//! Patient portal message threads. Clients poll with `?since=` for new
//! messages instead of holding a live connection.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use carebill_auth::jwt::Role;
use carebill_core::models::message::{self, AuthorRole, PortalMessage};
use carebill_core::models::patient::Patient;
use carebill_core::storage_keys;
use carebill_storage::records;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ThreadQuery {
    #[serde(default)]
    pub since: Option<jiff::Timestamp>,
}

async fn load_thread(state: &AppState, patient_id: Uuid) -> Result<Vec<PortalMessage>, ApiError> {
    let prefix = storage_keys::message_thread_prefix(patient_id);
    Ok(records::list_json(state.store(), &prefix).await?)
}

fn author_role(user: &AuthUser) -> AuthorRole {
    match user.role {
        Role::Staff => AuthorRole::Staff,
        Role::Patient => AuthorRole::Patient,
    }
}

/// Messages after `since` (all when absent), oldest first.
pub async fn list_messages(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(patient_id): Path<Uuid>,
    Query(query): Query<ThreadQuery>,
) -> Result<Json<Vec<PortalMessage>>, ApiError> {
    user.require_patient_access(patient_id)?;
    let thread = load_thread(&state, patient_id).await?;
    Ok(Json(message::since(thread, query.since)))
}

#[derive(Debug, Deserialize)]
pub struct NewMessage {
    pub body: String,
}

pub async fn post_message(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(patient_id): Path<Uuid>,
    Json(req): Json<NewMessage>,
) -> Result<Json<PortalMessage>, ApiError> {
    user.require_patient_access(patient_id)?;
    let body = req.body.trim();
    if body.is_empty() {
        return Err(ApiError::BadRequest("missing required field: body".to_string()));
    }
    let _: Patient = records::get(state.store(), patient_id).await?;

    let message = PortalMessage {
        id: Uuid::new_v4(),
        patient_id,
        author_role: author_role(&user),
        author_name: user.name.clone(),
        body: body.to_string(),
        read: false,
        sent_at: jiff::Timestamp::now(),
    };
    records::write_json(
        state.store(),
        &storage_keys::message(patient_id, message.id),
        &message,
    )
    .await?;

    tracing::info!(patient_id = %patient_id, role = ?message.author_role, "portal message posted");
    Ok(Json(message))
}

/// Mark everything the other side wrote as read. Returns how many changed.
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<usize>, ApiError> {
    user.require_patient_access(patient_id)?;
    let reader = author_role(&user);

    let mut changed = 0;
    for mut message in load_thread(&state, patient_id).await? {
        if message.read || message.author_role == reader {
            continue;
        }
        message.read = true;
        records::write_json(
            state.store(),
            &storage_keys::message(patient_id, message.id),
            &message,
        )
        .await?;
        changed += 1;
    }
    Ok(Json(changed))
}

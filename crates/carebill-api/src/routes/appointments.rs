use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use carebill_core::models::Record;
use carebill_core::models::appointment::Appointment;
use carebill_core::models::patient::Patient;
use carebill_core::models::provider::Provider;
use carebill_storage::records;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::routes::registry::require_exists;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AppointmentQuery {
    /// Only appointments starting on this day.
    #[serde(default)]
    pub date: Option<jiff::civil::Date>,
    #[serde(default)]
    pub provider_id: Option<Uuid>,
    #[serde(default)]
    pub patient_id: Option<Uuid>,
}

/// Appointments in start order.
pub async fn list_appointments(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<AppointmentQuery>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    let patient_id = user.patient_scope().or(query.patient_id);

    let mut appointments: Vec<Appointment> = records::list(state.store()).await?;
    appointments.retain(|a| {
        query.date.is_none_or(|d| a.start.date() == d)
            && query.provider_id.is_none_or(|id| a.provider_id == id)
            && patient_id.is_none_or(|id| a.patient_id == id)
    });
    appointments.sort_by_key(|a| a.start);
    Ok(Json(appointments))
}

pub async fn get_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, ApiError> {
    let appointment: Appointment = records::get(state.store(), id).await?;
    user.require_patient_access(appointment.patient_id)?;
    Ok(Json(appointment))
}

/// Validation, referenced records, then the provider's calendar.
async fn check_slot(state: &AppState, appointment: &Appointment) -> Result<(), ApiError> {
    appointment.validate()?;
    require_exists::<Patient>(state, appointment.patient_id).await?;
    require_exists::<Provider>(state, appointment.provider_id).await?;

    let existing: Vec<Appointment> = records::list(state.store()).await?;
    if let Some(conflict) = appointment.find_conflict(&existing) {
        return Err(ApiError::Conflict(format!(
            "provider already booked {} to {} (appointment {})",
            conflict.start,
            conflict.end(),
            conflict.id
        )));
    }
    Ok(())
}

pub async fn create_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(mut appointment): Json<Appointment>,
) -> Result<Json<Appointment>, ApiError> {
    user.require_staff()?;
    // find_conflict skips its own id
    appointment.id = Uuid::new_v4();
    check_slot(&state, &appointment).await?;

    let appointment = records::insert(state.store(), appointment).await?;
    tracing::info!(
        appointment_id = %appointment.id,
        provider_id = %appointment.provider_id,
        start = %appointment.start,
        "appointment booked"
    );
    Ok(Json(appointment))
}

pub async fn update_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(mut appointment): Json<Appointment>,
) -> Result<Json<Appointment>, ApiError> {
    user.require_staff()?;
    appointment.id = id;
    let _: Appointment = records::get(state.store(), id).await?;
    check_slot(&state, &appointment).await?;
    Ok(Json(records::update(state.store(), id, appointment).await?))
}

pub async fn delete_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<()>, ApiError> {
    user.require_staff()?;
    records::delete::<Appointment>(state.store(), id).await?;
    Ok(Json(()))
}

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use carebill_auth::jwt::{self, Role};

use crate::error::ApiError;
use crate::state::AppState;

/// JWT validation middleware.
///
/// Extracts the `Authorization: Bearer <token>` header and validates the JWT.
/// On success, inserts `AuthUser` into request extensions for handlers to use.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

    let token = jwt::bearer_token(header)?;
    let claims = jwt::validate_token(token, &state.auth.decoding_key, &state.auth.issuer)?;

    let user = AuthUser {
        name: claims.name.unwrap_or_else(|| claims.sub.clone()),
        sub: claims.sub,
        role: claims.role,
        patient_id: claims.patient_id,
    };
    req.extensions_mut().insert(user.clone());

    let mut response = next.run(req).await;
    response.extensions_mut().insert(user);
    Ok(response)
}

/// Authenticated user extracted from JWT claims.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub sub: String,
    pub name: String,
    pub role: Role,
    pub patient_id: Option<Uuid>,
}

impl AuthUser {
    pub fn is_staff(&self) -> bool {
        self.role == Role::Staff
    }

    pub fn require_staff(&self) -> Result<(), ApiError> {
        if self.is_staff() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("staff access required".to_string()))
        }
    }

    /// Staff may see any patient; a patient session only its own.
    pub fn require_patient_access(&self, patient_id: Uuid) -> Result<(), ApiError> {
        match self.role {
            Role::Staff => Ok(()),
            Role::Patient if self.patient_id == Some(patient_id) => Ok(()),
            Role::Patient => Err(ApiError::Forbidden(
                "patients may only access their own records".to_string(),
            )),
        }
    }

    /// The patient a listing must be restricted to, if any.
    pub fn patient_scope(&self) -> Option<Uuid> {
        match self.role {
            Role::Staff => None,
            // tokens without a patient id are rejected upstream; nil matches nothing
            Role::Patient => Some(self.patient_id.unwrap_or_else(Uuid::nil)),
        }
    }
}

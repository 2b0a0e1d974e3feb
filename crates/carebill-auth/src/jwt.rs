use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Staff,
    Patient,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Staff => "staff",
            Role::Patient => "patient",
        }
    }
}

/// Claims carried by a Carebill session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub iss: String,
    pub role: Role,
    /// Required when `role` is `patient`: the only patient this session may see.
    #[serde(default)]
    pub patient_id: Option<Uuid>,
    #[serde(default)]
    pub name: Option<String>,
    pub exp: u64,
    pub iat: u64,
}

impl SessionClaims {
    /// Claims valid for `ttl_secs` from now.
    pub fn new(sub: impl Into<String>, iss: impl Into<String>, role: Role, ttl_secs: u64) -> Self {
        let now = jiff::Timestamp::now().as_second().max(0) as u64;
        Self {
            sub: sub.into(),
            iss: iss.into(),
            role,
            patient_id: None,
            name: None,
            exp: now + ttl_secs,
            iat: now,
        }
    }

    pub fn for_patient(mut self, patient_id: Uuid) -> Self {
        self.patient_id = Some(patient_id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Sign claims with the shared HS256 secret.
pub fn issue_token(claims: &SessionClaims, secret: &[u8]) -> Result<String, AuthError> {
    Ok(encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret),
    )?)
}

/// Validate a session token: HS256 signature, expiry and issuer.
///
/// Patient-role tokens must name the patient they are scoped to.
pub fn validate_token(
    token: &str,
    decoding_key: &DecodingKey,
    issuer: &str,
) -> Result<SessionClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[issuer]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    validation.validate_exp = true;

    let token_data = decode::<SessionClaims>(token, decoding_key, &validation)?;
    let claims = token_data.claims;

    if claims.role == Role::Patient && claims.patient_id.is_none() {
        return Err(AuthError::InvalidToken(
            "patient token without patient_id".to_string(),
        ));
    }

    tracing::debug!(sub = %claims.sub, role = ?claims.role, "session token validated");
    Ok(claims)
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
/// The scheme name is matched case-insensitively.
pub fn bearer_token(header: &str) -> Result<&str, AuthError> {
    header
        .trim_start()
        .split_once(' ')
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)
}

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::middleware::auth::AuthUser;

/// Audit logging middleware.
///
/// Logs every API request as a structured audit event using `tracing`.
/// The caller's subject is picked up from the response when the auth layer
/// accepted the request.
pub async fn audit_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().path().to_string();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let user = response.extensions().get::<AuthUser>();
    tracing::info!(
        method = %method,
        path = %uri,
        status = status,
        sub = user.map(|u| u.sub.as_str()),
        role = user.map(|u| u.role.as_str()),
        "api_request"
    );

    response
}

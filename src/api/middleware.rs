//! API Middleware
//!
//! Bearer-token authentication (the access guard) and request logging.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::auth::TokenError;

use super::AppState;

/// The acting user resolved from a verified credential
///
/// Attached to the request by [`require_auth`]; handlers on protected routes
/// extract it with `Extension<AuthUser>`. Purely request-scoped, no
/// server-side session state exists.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
}

// =========================================================================
// Bearer-token authentication middleware
// =========================================================================

/// Verify the `Authorization: Bearer <token>` credential and attach the
/// resolved identity to the request
pub async fn require_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let token = match token {
        Some(t) => t,
        None => {
            return Err(unauthenticated("Missing or malformed Authorization header"));
        }
    };

    let claims = match state.tokens.verify(token) {
        Ok(claims) => claims,
        Err(TokenError::Expired) => {
            return Err(unauthenticated("Token has expired"));
        }
        Err(_) => {
            return Err(unauthenticated("Invalid token"));
        }
    };

    request.extensions_mut().insert(AuthUser {
        user_id: claims.user_id,
        name: claims.name,
        email: claims.email,
    });

    Ok(next.run(request).await)
}

/// Build a 401 response in the uniform error envelope
fn unauthenticated(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "success": false,
            "message": message,
            "errorCode": "unauthenticated"
        })),
    )
        .into_response()
}

// =========================================================================
// Request logging
// =========================================================================

/// Headers that should be masked in logs
const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "set-cookie"];

/// Mask sensitive headers for logging
pub fn mask_headers_for_logging(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let name_lower = name.as_str().to_lowercase();
            let masked_value = if SENSITIVE_HEADERS.contains(&name_lower.as_str()) {
                "[REDACTED]".to_string()
            } else {
                value.to_str().unwrap_or("[invalid utf8]").to_string()
            };
            (name.to_string(), masked_value)
        })
        .collect()
}

/// Request logging middleware
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let headers = mask_headers_for_logging(request.headers());

    let start = std::time::Instant::now();

    tracing::info!(
        method = %method,
        uri = %uri,
        headers = ?headers,
        "Incoming request"
    );

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = %duration.as_millis(),
        "Request completed"
    );

    response
}

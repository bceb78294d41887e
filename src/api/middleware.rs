//! API Middleware
//!
//! Request logging, session authentication and the admin gate.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth;
use crate::domain::AuthContext;
use crate::error::AppError;

/// Correlation ID assigned by the logging layer, before authentication runs
#[derive(Debug, Clone, Copy)]
pub struct CorrelationId(pub Uuid);

/// Extract the bearer token from an Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}

// =========================================================================
// Session Authentication Middleware
// =========================================================================

/// Resolve the bearer token to a session and attach an [`AuthContext`].
///
/// Every protected route runs behind this; the admin gate builds on the
/// context it attaches. Any token that does not resolve to a live session
/// with an existing user is a 401.
pub async fn session_auth_middleware(
    State(pool): State<PgPool>,
    headers: HeaderMap,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = match bearer_token(&headers) {
        Some(token) => token,
        None => {
            return Err(
                AppError::Unauthenticated("Missing bearer token".to_string()).into_response()
            );
        }
    };

    let resolved = match auth::resolve_token(&pool, token).await {
        Ok(resolved) => resolved,
        Err(e) => return Err(e.into_response()),
    };

    let session = match resolved {
        Some(session) => session,
        None => {
            return Err(
                AppError::Unauthenticated("Invalid or expired session".to_string())
                    .into_response(),
            );
        }
    };

    let mut context = AuthContext::new(session.session_id, session.user_id, session.role);
    if let Some(CorrelationId(correlation_id)) = request.extensions().get::<CorrelationId>() {
        context = context.with_correlation_id(*correlation_id);
    }

    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

// =========================================================================
// Admin Gate Middleware
// =========================================================================

/// Reject non-admin sessions.
///
/// Layered over the admin route group; relies on the role the session
/// middleware loaded from the users table, never on request data.
pub async fn require_admin(request: Request<Body>, next: Next) -> Result<Response, Response> {
    let context = match request.extensions().get::<AuthContext>() {
        Some(context) => context,
        None => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Session middleware must run first",
                    "error_code": "internal_error"
                })),
            )
                .into_response());
        }
    };

    if !context.is_admin() {
        return Err(AppError::Forbidden(
            "Access denied. Admin privileges required.".to_string(),
        )
        .into_response());
    }

    Ok(next.run(request).await)
}

// =========================================================================
// mask_headers_for_logging
// =========================================================================

/// Headers that should be masked in logs
const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "cookie",
    "set-cookie",
];

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

// =========================================================================
// Request Logging Middleware
// =========================================================================

/// Request logging middleware
///
/// Runs outermost: assigns the correlation ID (or adopts the caller's) and
/// logs request and response with sensitive headers masked.
pub async fn logging_middleware(mut request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let version = request.version();

    let correlation_id = request
        .headers()
        .get("X-Correlation-Id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);
    request.extensions_mut().insert(CorrelationId(correlation_id));

    // Mask sensitive headers
    let headers = mask_headers_for_logging(request.headers());

    let start = std::time::Instant::now();

    // Log request
    tracing::info!(
        method = %method,
        uri = %uri,
        version = ?version,
        correlation_id = %correlation_id,
        headers = ?headers,
        "Incoming request"
    );

    // Process request
    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    // Log response
    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = %duration.as_millis(),
        correlation_id = %correlation_id,
        "Request completed"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_headers_for_logging() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json".parse().unwrap());
        headers.insert("authorization", "Bearer secret-token-12345".parse().unwrap());
        headers.insert("x-correlation-id", "abc-123".parse().unwrap());

        let masked = mask_headers_for_logging(&headers);

        let authorization = masked.iter().find(|(k, _)| k == "authorization");
        let content_type = masked.iter().find(|(k, _)| k == "content-type");
        let correlation = masked.iter().find(|(k, _)| k == "x-correlation-id");

        assert_eq!(authorization.unwrap().1, "[REDACTED]");
        assert_eq!(content_type.unwrap().1, "application/json");
        assert_eq!(correlation.unwrap().1, "abc-123");
    }

    #[test]
    fn test_sensitive_headers_list() {
        assert!(SENSITIVE_HEADERS.contains(&"authorization"));
        assert!(SENSITIVE_HEADERS.contains(&"cookie"));
        assert!(!SENSITIVE_HEADERS.contains(&"content-type"));
    }

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, "Bearer tok_123".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("tok_123"));

        headers.insert(header::AUTHORIZATION, "Basic dXNlcg==".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }
}

// ============================================================================
// CMS API - Authentication Middleware
// File: crates/cms-api/src/middleware/auth.rs
// ============================================================================
//! Verifies the caller's JWT before any admin route runs.
//!
//! Tokens are issued by the platform's auth service; this service only checks
//! them. Either an `Authorization: Bearer` header or the `token` cookie works.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use cms_security::{Claims, JwtError};
use cms_shared::constants::AUTH_COOKIE_NAME;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller, available to handlers as `Extension<AuthUser>`
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub subject: String,
    pub role: Option<String>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            role: claims.role,
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn cookie_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == AUTH_COOKIE_NAME)
        .map(|(_, value)| value.trim())
        .filter(|t| !t.is_empty())
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let headers = request.headers();
    let token = bearer_token(headers)
        .or_else(|| cookie_token(headers))
        .ok_or_else(|| ApiError::Unauthorized("Missing authentication token".to_string()))?;

    let claims = state.jwt.validate_token(token).map_err(|e| match e {
        JwtError::TokenExpired => ApiError::Unauthorized("Token expired".to_string()),
        other => ApiError::Unauthorized(other.to_string()),
    })?;

    tracing::debug!("Authenticated request from {}", claims.sub);
    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic Zm9v"));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_cookie_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; token=abc.def; lang=id"),
        );
        assert_eq!(cookie_token(&headers), Some("abc.def"));

        headers.insert(header::COOKIE, HeaderValue::from_static("xtoken=nope"));
        assert_eq!(cookie_token(&headers), None);
    }
}

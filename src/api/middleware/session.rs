//! Session authentication middleware using signed tokens

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::account::AccountId;
use crate::infrastructure::auth::{TokenError, TokenKind};

/// Extractor that requires a valid access token.
///
/// Verification is stateless: the token signature and expiry are checked
/// without touching the credential store, so handlers that need the full
/// account fetch it themselves.
#[derive(Debug, Clone)]
pub struct RequireSession(pub AccountId);

impl FromRequestParts<AppState> for RequireSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;

        debug!("Verifying session token");

        let claims = state
            .session_tokens
            .verify(&token, TokenKind::Access)
            .map_err(token_error_response)?;

        Ok(RequireSession(claims.account_id()))
    }
}

/// Extract a bearer token from the Authorization header
pub fn extract_bearer_token(headers: &axum::http::HeaderMap) -> Result<String, ApiError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid Authorization header encoding"))?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
    }

    Err(ApiError::unauthorized(
        "Authentication required. Provide a token via 'Authorization: Bearer <token>'",
    )
    .with_code("authorization_required"))
}

/// Map a token verification failure to its wire form
pub fn token_error_response(error: TokenError) -> ApiError {
    match error {
        TokenError::Expired => {
            ApiError::unauthorized("Session token has expired").with_code("token_expired")
        }
        TokenError::Malformed | TokenError::WrongKind => {
            ApiError::unauthorized("Session token is invalid").with_code("invalid_token")
        }
    }
}

//! Authentication API endpoints
//!
//! Registration, login, and token refresh for human-facing flows.

use axum::{extract::State, http::StatusCode, routing::post, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::middleware::session::{extract_bearer_token, token_error_response};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::account::Account;
use crate::infrastructure::account::RegisterAccountRequest;
use crate::infrastructure::auth::TokenKind;

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
}

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login request: either field may carry the identifier
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Account body safe to expose (no credential material)
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

impl AccountResponse {
    pub fn from_account(account: &Account) -> Self {
        Self {
            id: account.id().as_str().to_string(),
            username: account.username().to_string(),
            email: account.email().to_string(),
            is_admin: account.is_admin(),
            created_at: account.created_at().to_rfc3339(),
            last_login_at: account.last_login_at().map(|t| t.to_rfc3339()),
        }
    }
}

/// Response carrying a fresh session
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub message: String,
    pub account: AccountResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: String,
}

/// Refresh response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub message: String,
    pub access_token: String,
    pub expires_at: String,
}

/// Register a new account
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let account = state
        .accounts
        .register(RegisterAccountRequest {
            username: request.username,
            email: request.email,
            password: request.password,
        })
        .await?;

    let session = issue_session(&state, &account, "User registered successfully")?;

    Ok((StatusCode::CREATED, Json(session)))
}

/// Login with username (or email) and password
///
/// POST /auth/login
///
/// A wrong identifier and a wrong password are indistinguishable in the
/// response.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let identifier = request
        .username
        .or(request.email)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::bad_request("Username or email is required"))?;

    let password = request
        .password
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::bad_request("Password is required"))?;

    let account = state
        .accounts
        .authenticate(&identifier, &password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let session = issue_session(&state, &account, "Login successful")?;

    Ok(Json(session))
}

/// Exchange a refresh token for a fresh access token
///
/// POST /auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> Result<Json<RefreshResponse>, ApiError> {
    let token = extract_bearer_token(&headers)?;

    let claims = state
        .session_tokens
        .verify(&token, TokenKind::Refresh)
        .map_err(token_error_response)?;

    let account_id = claims.account_id();
    let access_token = state.session_tokens.issue(&account_id, TokenKind::Access)?;
    let expires_at = Utc::now() + state.session_tokens.ttl(TokenKind::Access);

    Ok(Json(RefreshResponse {
        message: "Token refreshed successfully".to_string(),
        access_token,
        expires_at: expires_at.to_rfc3339(),
    }))
}

fn issue_session(
    state: &AppState,
    account: &Account,
    message: &str,
) -> Result<SessionResponse, ApiError> {
    let access_token = state.session_tokens.issue(account.id(), TokenKind::Access)?;
    let refresh_token = state
        .session_tokens
        .issue(account.id(), TokenKind::Refresh)?;
    let expires_at = Utc::now() + state.session_tokens.ttl(TokenKind::Access);

    Ok(SessionResponse {
        message: message.to_string(),
        account: AccountResponse::from_account(account),
        access_token,
        refresh_token,
        expires_at: expires_at.to_rfc3339(),
    })
}

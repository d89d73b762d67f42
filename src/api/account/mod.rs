//! Account API endpoints
//!
//! Profile and API key management for an authenticated session.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::api::auth::AccountResponse;
use crate::api::middleware::RequireSession;
use crate::api::state::AppState;
use crate::api::types::{sanitize, ApiError, Json};
use crate::domain::api_key::{ApiKey, ApiKeyId};

const MAX_KEY_NAME_LENGTH: usize = 100;

/// Create the account router
pub fn create_account_router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/api-keys", post(create_api_key))
        .route("/api-keys", get(list_api_keys))
        .route("/api-keys/{key_id}", delete(revoke_api_key))
        .route("/api-keys/{key_id}/extend", post(extend_api_key))
}

/// API key body safe to expose. The plaintext value is never present;
/// it only exists in the creation response.
#[derive(Debug, Serialize)]
pub struct ApiKeyResponse {
    pub id: String,
    pub name: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub expires_at: Option<String>,
    pub last_used_at: Option<String>,
}

impl ApiKeyResponse {
    fn from_key(key: &ApiKey) -> Self {
        Self {
            id: key.id().as_str().to_string(),
            name: key.name().map(|n| n.to_string()),
            is_active: key.is_active(),
            created_at: key.created_at().to_rfc3339(),
            expires_at: key.expires_at().map(|t| t.to_rfc3339()),
            last_used_at: key.last_used_at().map(|t| t.to_rfc3339()),
        }
    }
}

/// Request to create a new API key
#[derive(Debug, Default, Deserialize)]
pub struct CreateApiKeyRequest {
    pub name: Option<String>,
    pub expires_in_days: Option<u32>,
}

/// Creation response; the only place the plaintext key ever appears
#[derive(Debug, Serialize)]
pub struct CreatedApiKeyResponse {
    pub message: String,
    pub key: String,
    pub api_key: ApiKeyResponse,
}

/// Request to extend a key's expiry
#[derive(Debug, Default, Deserialize)]
pub struct ExtendApiKeyRequest {
    pub days: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ApiKeyListResponse {
    pub api_keys: Vec<ApiKeyResponse>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ExtendedApiKeyResponse {
    pub message: String,
    pub api_key: ApiKeyResponse,
}

/// Get the current account's profile
///
/// GET /account/profile
pub async fn get_profile(
    RequireSession(account_id): RequireSession,
    State(state): State<AppState>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state
        .accounts
        .get(&account_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Account not found"))?;

    Ok(Json(AccountResponse::from_account(&account)))
}

/// Create a new API key for the current account
///
/// POST /account/api-keys
pub async fn create_api_key(
    RequireSession(account_id): RequireSession,
    State(state): State<AppState>,
    request: Option<Json<CreateApiKeyRequest>>,
) -> Result<(StatusCode, Json<CreatedApiKeyResponse>), ApiError> {
    let request = request.map(Json::into_inner).unwrap_or_default();

    let name = request
        .name
        .map(|n| sanitize_name(&n))
        .filter(|n| !n.is_empty());

    let created = state
        .api_keys
        .create(&account_id, name, request.expires_in_days)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedApiKeyResponse {
            message: "API key created successfully".to_string(),
            key: created.secret,
            api_key: ApiKeyResponse::from_key(&created.api_key),
        }),
    ))
}

/// List the current account's API keys, without plaintext values
///
/// GET /account/api-keys
pub async fn list_api_keys(
    RequireSession(account_id): RequireSession,
    State(state): State<AppState>,
) -> Result<Json<ApiKeyListResponse>, ApiError> {
    let keys = state.api_keys.list(&account_id).await?;

    Ok(Json(ApiKeyListResponse {
        api_keys: keys.iter().map(ApiKeyResponse::from_key).collect(),
    }))
}

/// Revoke an API key owned by the current account
///
/// DELETE /account/api-keys/{key_id}
pub async fn revoke_api_key(
    RequireSession(account_id): RequireSession,
    State(state): State<AppState>,
    Path(key_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .api_keys
        .revoke(&account_id, &ApiKeyId::new(key_id))
        .await?;

    Ok(Json(MessageResponse {
        message: "API key revoked successfully".to_string(),
    }))
}

/// Extend an API key's expiry
///
/// POST /account/api-keys/{key_id}/extend
pub async fn extend_api_key(
    RequireSession(account_id): RequireSession,
    State(state): State<AppState>,
    Path(key_id): Path<String>,
    request: Option<Json<ExtendApiKeyRequest>>,
) -> Result<Json<ExtendedApiKeyResponse>, ApiError> {
    let request = request.map(Json::into_inner).unwrap_or_default();

    let key = state
        .api_keys
        .extend(&account_id, &ApiKeyId::new(key_id), request.days)
        .await?;

    Ok(Json(ExtendedApiKeyResponse {
        message: "API key expiry extended".to_string(),
        api_key: ApiKeyResponse::from_key(&key),
    }))
}

fn sanitize_name(input: &str) -> String {
    sanitize(input, MAX_KEY_NAME_LENGTH)
}

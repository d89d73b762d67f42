//! API key authentication and usage accounting middleware
//!
//! Wraps machine-client routes: validates the presented key, appends a
//! usage event before the handler runs, and patches the event with the
//! handler's real status afterwards. A usage row is only ever created
//! for a successful authentication, and its status column transitions
//! provisional to final at most once. Failing to write the row is logged
//! and never blocks the request.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Query, Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::account::Account;
use crate::domain::api_key::{ApiKey, ApiKeyId};
use crate::domain::usage::UsageEvent;

/// Status recorded at authentication time, before the handler has run
const PROVISIONAL_STATUS: u16 = 200;

/// Authentication context attached to API-key-authenticated requests
#[derive(Debug, Clone)]
pub struct ApiKeyContext {
    /// The key that authenticated the request
    pub api_key: ApiKey,
    /// The key's owning account
    pub account: Account,
}

/// Middleware for machine-client routes.
///
/// Flow: extract the key (X-API-Key header, then api_key query
/// parameter), validate it, append a usage event, attach the key and
/// account to the request, run the handler, finalize the event status.
pub async fn require_api_key(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();

    let presented = match extract_api_key(&request) {
        Ok(key) => key,
        Err(e) => return e.into_response(),
    };

    let (api_key, account) = match state.api_keys.validate(&presented).await {
        Ok(found) => found,
        Err(e) => return ApiError::from(e).into_response(),
    };

    let event = build_usage_event(&request, api_key.id().clone(), started);
    let usage_id = match state.usage.record(event).await {
        Ok(id) => Some(id),
        Err(e) => {
            warn!("Failed to record usage event: {}", e);
            None
        }
    };

    request.extensions_mut().insert(ApiKeyContext {
        api_key,
        account,
    });

    let response = next.run(request).await;

    if let Some(id) = usage_id {
        if let Err(e) = state
            .usage
            .finalize(&id, response.status().as_u16())
            .await
        {
            warn!("Failed to finalize usage event: {}", e);
        }
    }

    response
}

/// Extract the presented key value. The header wins when both carriers
/// are present.
fn extract_api_key(request: &Request) -> Result<String, ApiError> {
    if let Some(header_value) = request.headers().get("x-api-key") {
        let key = header_value
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid X-API-Key header encoding"))?;

        return Ok(key.trim().to_string());
    }

    if let Ok(Query(params)) = Query::<HashMap<String, String>>::try_from_uri(request.uri()) {
        if let Some(key) = params.get("api_key") {
            if !key.is_empty() {
                return Ok(key.trim().to_string());
            }
        }
    }

    Err(ApiError::unauthorized(
        "API key is required. Provide it via the 'X-API-Key' header or the 'api_key' query parameter",
    ))
}

fn build_usage_event(request: &Request, api_key_id: ApiKeyId, started: Instant) -> UsageEvent {
    let mut event = UsageEvent::new(
        api_key_id,
        request.uri().path(),
        request.method().as_str(),
        PROVISIONAL_STATUS,
    )
    .with_latency_ms(started.elapsed().as_millis() as u64);

    if let Some(ip) = client_ip(request) {
        event = event.with_ip_address(ip);
    }

    if let Some(user_agent) = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
    {
        event = event.with_user_agent(user_agent);
    }

    event
}

/// Best-effort client address: proxy headers first, then the socket peer
fn client_ip(request: &Request) -> Option<String> {
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return Some(first.to_string());
            }
        }
    }

    if let Some(real_ip) = request
        .headers()
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
    {
        return Some(real_ip.trim().to_string());
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use axum::routing::get;
    use axum::{middleware, Extension, Router};
    use tower::ServiceExt;

    use crate::domain::usage::mock::MockUsageRepository;
    use crate::domain::usage::UsageRepository;
    use crate::infrastructure::account::{
        AccountService, Argon2Hasher, InMemoryAccountRepository,
    };
    use crate::infrastructure::api_key::{
        ApiKeyGenerator, ApiKeyService, InMemoryApiKeyRepository,
    };
    use crate::infrastructure::auth::{JwtConfig, SessionTokenService};
    use crate::infrastructure::countries::{CountriesService, HttpCountriesClient};
    use crate::infrastructure::usage::{InMemoryUsageRepository, UsageService};

    struct Fixture {
        state: AppState,
        secret: String,
        key_id: ApiKeyId,
        usage_repo: Arc<InMemoryUsageRepository>,
    }

    fn build_state(usage_repo: Arc<dyn UsageRepository>) -> AppState {
        let accounts_repo = Arc::new(InMemoryAccountRepository::new());
        let keys_repo = Arc::new(InMemoryApiKeyRepository::new());
        let hasher = Arc::new(Argon2Hasher::new());

        AppState::new(
            Arc::new(AccountService::new(accounts_repo.clone(), hasher.clone())),
            Arc::new(
                ApiKeyService::new(keys_repo, accounts_repo, hasher)
                    .with_generator(ApiKeyGenerator::test()),
            ),
            Arc::new(UsageService::new(usage_repo)),
            Arc::new(SessionTokenService::new(JwtConfig::new("test-secret"))),
            Arc::new(CountriesService::new(Arc::new(HttpCountriesClient::new(
                "http://127.0.0.1:1",
            )))),
        )
    }

    async fn create_fixture() -> Fixture {
        let usage_repo = Arc::new(InMemoryUsageRepository::new());
        let state = build_state(usage_repo.clone());

        let (secret, key_id) = seed_key(&state).await;

        Fixture {
            state,
            secret,
            key_id,
            usage_repo,
        }
    }

    async fn seed_key(state: &AppState) -> (String, ApiKeyId) {
        let account = state
            .accounts
            .register(crate::infrastructure::account::RegisterAccountRequest {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "Passw0rd!".to_string(),
            })
            .await
            .unwrap();

        let created = state
            .api_keys
            .create(account.id(), None, None)
            .await
            .unwrap();

        (created.secret, created.api_key.id().clone())
    }

    async fn whoami(Extension(ctx): Extension<ApiKeyContext>) -> String {
        ctx.account.username().to_string()
    }

    async fn teapot() -> StatusCode {
        StatusCode::IM_A_TEAPOT
    }

    fn test_router(state: AppState) -> Router {
        Router::new()
            .route("/test", get(whoami))
            .route("/teapot", get(teapot))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                require_api_key,
            ))
            .with_state(state)
    }

    fn request_with_header(uri: &str, key: &str) -> HttpRequest<Body> {
        HttpRequest::builder()
            .uri(uri)
            .header("x-api-key", key)
            .header("user-agent", "test-agent/1.0")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_authenticated_request_succeeds() {
        let fx = create_fixture().await;
        let app = test_router(fx.state.clone());

        let response = app
            .oneshot(request_with_header("/test", &fx.secret))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"alice");
    }

    #[tokio::test]
    async fn test_usage_event_recorded_and_finalized() {
        let fx = create_fixture().await;
        let app = test_router(fx.state.clone());

        app.oneshot(request_with_header("/test", &fx.secret))
            .await
            .unwrap();

        let events = fx.usage_repo.list_for_key(&fx.key_id).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].endpoint, "/test");
        assert_eq!(events[0].method, "GET");
        assert_eq!(events[0].status_code, 200);
        assert_eq!(events[0].user_agent.as_deref(), Some("test-agent/1.0"));
    }

    #[tokio::test]
    async fn test_usage_event_captures_handler_status() {
        let fx = create_fixture().await;
        let app = test_router(fx.state.clone());

        let response = app
            .oneshot(request_with_header("/teapot", &fx.secret))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);

        let events = fx.usage_repo.list_for_key(&fx.key_id).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].status_code, 418);
    }

    #[tokio::test]
    async fn test_missing_key_rejected_without_usage_row() {
        let fx = create_fixture().await;
        let app = test_router(fx.state.clone());

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let events = fx.usage_repo.list_for_key(&fx.key_id).await.unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_key_rejected_without_usage_row() {
        let fx = create_fixture().await;
        let app = test_router(fx.state.clone());

        let response = app
            .oneshot(request_with_header("/test", "ck_test_wrong"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let events = fx.usage_repo.list_for_key(&fx.key_id).await.unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_revoked_key_rejected() {
        let fx = create_fixture().await;

        let account = fx
            .state
            .accounts
            .authenticate("alice", "Passw0rd!")
            .await
            .unwrap()
            .unwrap();
        fx.state
            .api_keys
            .revoke(account.id(), &fx.key_id)
            .await
            .unwrap();

        let app = test_router(fx.state.clone());
        let response = app
            .oneshot(request_with_header("/test", &fx.secret))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            body["error"]["message"],
            "API key is expired or inactive"
        );
    }

    #[tokio::test]
    async fn test_key_via_query_parameter() {
        let fx = create_fixture().await;
        let app = test_router(fx.state.clone());

        let uri = format!("/test?api_key={}", fx.secret);
        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_header_takes_precedence_over_query() {
        let fx = create_fixture().await;
        let app = test_router(fx.state.clone());

        // Valid header, garbage query value: the header must win
        let uri = "/test?api_key=ck_test_garbage";
        let response = app
            .oneshot(request_with_header(uri, &fx.secret))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_usage_write_failure_does_not_block_request() {
        let usage_repo = Arc::new(MockUsageRepository::new());
        let state = build_state(usage_repo.clone());
        let (secret, key_id) = seed_key(&state).await;

        usage_repo.set_should_fail(true).await;

        let app = test_router(state);
        let response = app
            .oneshot(request_with_header("/test", &secret))
            .await
            .unwrap();

        // Accounting is best-effort telemetry; the request still succeeds
        assert_eq!(response.status(), StatusCode::OK);

        usage_repo.set_should_fail(false).await;
        let events = usage_repo.list_for_key(&key_id).await.unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_client_ip_from_forwarded_header() {
        let fx = create_fixture().await;
        let app = test_router(fx.state.clone());

        let request = HttpRequest::builder()
            .uri("/test")
            .header("x-api-key", &fx.secret)
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .body(Body::empty())
            .unwrap();

        app.oneshot(request).await.unwrap();

        let events = fx.usage_repo.list_for_key(&fx.key_id).await.unwrap();
        assert_eq!(events[0].ip_address.as_deref(), Some("203.0.113.9"));
    }
}

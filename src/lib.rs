//! Countries API Gateway
//!
//! An authenticated HTTP API over the RestCountries data provider:
//! - Account registration and login with signed session tokens
//! - API key issuance, validation, revocation, and extension
//! - Per-request usage accounting for machine clients
//! - Filtered, paginated country data proxied from the provider

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use api::state::AppState;
use domain::account::AccountRepository;
use domain::api_key::ApiKeyRepository;
use domain::usage::UsageRepository;
use infrastructure::account::{AccountService, Argon2Hasher, InMemoryAccountRepository, PostgresAccountRepository};
use infrastructure::api_key::{ApiKeyService, InMemoryApiKeyRepository, PostgresApiKeyRepository};
use infrastructure::auth::{JwtConfig, SessionTokenService};
use infrastructure::countries::{CountriesService, HttpCountriesClient};
use infrastructure::storage::{self, StorageBackend};
use infrastructure::usage::{InMemoryUsageRepository, PostgresUsageRepository, UsageService};

/// Create the application state with all services initialized
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let session_tokens = create_session_token_service(config)?;

    let backend = StorageBackend::from_str(&config.storage.backend).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown storage backend '{}'. Use 'in-memory' or 'postgres'.",
            config.storage.backend
        )
    })?;

    info!("Storage backend: {:?}", backend);

    let (account_repo, key_repo, usage_repo): (
        Arc<dyn AccountRepository>,
        Arc<dyn ApiKeyRepository>,
        Arc<dyn UsageRepository>,
    ) = match backend {
        StorageBackend::Postgres => {
            let database_url = std::env::var("DATABASE_URL")
                .ok()
                .or_else(|| config.storage.database_url.clone())
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "The postgres backend requires DATABASE_URL or storage.database_url"
                    )
                })?;

            info!("Connecting to PostgreSQL...");
            let pool = storage::connect(&database_url).await?;
            storage::ensure_schema(&pool).await?;
            info!("PostgreSQL connection established");

            (
                Arc::new(PostgresAccountRepository::new(pool.clone())),
                Arc::new(PostgresApiKeyRepository::new(pool.clone())),
                Arc::new(PostgresUsageRepository::new(pool)),
            )
        }
        StorageBackend::InMemory => (
            Arc::new(InMemoryAccountRepository::new()),
            Arc::new(InMemoryApiKeyRepository::new()),
            Arc::new(InMemoryUsageRepository::new()),
        ),
    };

    let hasher = Arc::new(Argon2Hasher::new());

    let accounts = Arc::new(AccountService::new(account_repo.clone(), hasher.clone()));
    let api_keys = Arc::new(ApiKeyService::new(key_repo, account_repo, hasher));
    let usage = Arc::new(UsageService::new(usage_repo));

    let countries_client = HttpCountriesClient::with_timeout(
        &config.countries.base_url,
        Duration::from_secs(config.countries.timeout_secs),
    );
    let countries = Arc::new(CountriesService::new(Arc::new(countries_client)));

    Ok(AppState::new(
        accounts,
        api_keys,
        usage,
        Arc::new(session_tokens),
        countries,
    ))
}

/// Build the session token service from configuration.
///
/// The signing secret is strictly external and required: configuration
/// file, APP__AUTH__JWT_SECRET, or the JWT_SECRET environment variable.
/// Startup fails without one; a silent built-in secret would mint tokens
/// anyone could forge.
fn create_session_token_service(config: &AppConfig) -> anyhow::Result<SessionTokenService> {
    let secret = config
        .auth
        .jwt_secret
        .clone()
        .or_else(|| std::env::var("JWT_SECRET").ok())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "A session token secret is required: set auth.jwt_secret or the JWT_SECRET \
                 environment variable"
            )
        })?;

    Ok(SessionTokenService::new(
        JwtConfig::new(secret)
            .with_access_ttl_hours(config.auth.access_token_ttl_hours)
            .with_refresh_ttl_days(config.auth.refresh_token_ttl_days),
    ))
}

//! API key lifecycle service
//!
//! High-level operations for creating, validating, revoking, extending,
//! and listing keys.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info, warn};

use crate::domain::account::{Account, AccountId, AccountRepository};
use crate::domain::api_key::{ApiKey, ApiKeyId, ApiKeyRepository};
use crate::domain::DomainError;

use super::generator::ApiKeyGenerator;
use crate::infrastructure::account::CredentialHasher;

/// Default expiry horizon for new keys, in days
pub const DEFAULT_EXPIRES_IN_DAYS: u32 = 365;

const MIN_EXPIRES_IN_DAYS: u32 = 1;
const MAX_EXPIRES_IN_DAYS: u32 = 3650;

/// Attempts to allocate a unique key before giving up. An ID collision
/// requires a colliding UUID, so a second round is already remarkable.
const MAX_CREATE_ATTEMPTS: u32 = 3;

/// Result of creating a new API key
#[derive(Debug)]
pub struct CreateApiKeyResult {
    /// The stored key entity (hash only)
    pub api_key: ApiKey,
    /// The plaintext key value. This is the only place it ever appears.
    pub secret: String,
}

/// API key service
#[derive(Debug)]
pub struct ApiKeyService {
    repository: Arc<dyn ApiKeyRepository>,
    accounts: Arc<dyn AccountRepository>,
    hasher: Arc<dyn CredentialHasher>,
    generator: ApiKeyGenerator,
}

impl ApiKeyService {
    /// Create a new API key service
    pub fn new(
        repository: Arc<dyn ApiKeyRepository>,
        accounts: Arc<dyn AccountRepository>,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        Self {
            repository,
            accounts,
            hasher,
            generator: ApiKeyGenerator::production(),
        }
    }

    /// Create with a custom generator
    pub fn with_generator(mut self, generator: ApiKeyGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Create a new API key for an account.
    ///
    /// The plaintext value is returned exactly once; only its hash is
    /// stored. An ID collision on insert is retried with freshly
    /// generated material rather than surfaced to the caller.
    pub async fn create(
        &self,
        account_id: &AccountId,
        name: Option<String>,
        expires_in_days: Option<u32>,
    ) -> Result<CreateApiKeyResult, DomainError> {
        let days = expires_in_days.unwrap_or(DEFAULT_EXPIRES_IN_DAYS);
        validate_expiry_days(days)?;

        if self.accounts.get(account_id).await?.is_none() {
            return Err(DomainError::not_found(format!(
                "Account '{}' not found",
                account_id
            )));
        }

        for attempt in 1..=MAX_CREATE_ATTEMPTS {
            let secret = self.generator.generate();
            let secret_hash = self.hasher.hash(&secret)?;

            let mut api_key = ApiKey::new(ApiKeyId::generate(), account_id.clone(), secret_hash)
                .with_expiration(Utc::now() + Duration::days(days as i64));

            if let Some(ref name) = name {
                api_key = api_key.with_name(name);
            }

            match self.repository.create(api_key).await {
                Ok(created) => {
                    info!(key_id = %created.id(), account_id = %account_id, "API key created");
                    return Ok(CreateApiKeyResult {
                        api_key: created,
                        secret,
                    });
                }
                Err(DomainError::Conflict { .. }) => {
                    warn!(attempt, "API key ID collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        }

        Err(DomainError::internal(
            "Failed to allocate a unique API key",
        ))
    }

    /// Validate a presented key value and return the key with its owner.
    ///
    /// The stored hash does not support lookup by plaintext, so every
    /// candidate is checked with the one-way comparison until one matches
    /// or the set is exhausted. O(n) in the number of issued keys, which
    /// is person-scale here.
    pub async fn validate(&self, presented: &str) -> Result<(ApiKey, Account), DomainError> {
        let candidates = self.repository.list_all().await?;

        let matched = candidates
            .into_iter()
            .find(|key| self.hasher.verify(presented, key.secret_hash()));

        let key = match matched {
            Some(key) => key,
            None => {
                debug!("Presented API key matched no stored key");
                return Err(DomainError::credential("Invalid API key"));
            }
        };

        if !key.is_valid() {
            debug!(key_id = %key.id(), "Presented API key is expired or inactive");
            return Err(DomainError::credential("API key is expired or inactive"));
        }

        if let Err(e) = self.repository.record_usage(key.id()).await {
            warn!(key_id = %key.id(), "Failed to record API key usage: {}", e);
        }

        let account = self
            .accounts
            .get(key.account_id())
            .await?
            .ok_or_else(|| DomainError::internal("API key owner is missing"))?;

        Ok((key, account))
    }

    /// Revoke a key owned by the requesting account.
    ///
    /// Idempotent: revoking an already revoked key succeeds and returns
    /// the same final state.
    pub async fn revoke(
        &self,
        requesting_account: &AccountId,
        key_id: &ApiKeyId,
    ) -> Result<ApiKey, DomainError> {
        let mut key = self.owned_key(requesting_account, key_id).await?;

        if !key.is_active() {
            debug!(key_id = %key_id, "Key already revoked");
            return Ok(key);
        }

        key.revoke();
        let updated = self.repository.update(&key).await?;
        info!(key_id = %key_id, account_id = %requesting_account, "API key revoked");

        Ok(updated)
    }

    /// Push a key's expiry forward by the given number of days
    /// (default 365), counted from its current expiry.
    pub async fn extend(
        &self,
        requesting_account: &AccountId,
        key_id: &ApiKeyId,
        days: Option<u32>,
    ) -> Result<ApiKey, DomainError> {
        let days = days.unwrap_or(DEFAULT_EXPIRES_IN_DAYS);
        validate_expiry_days(days)?;

        let mut key = self.owned_key(requesting_account, key_id).await?;

        key.extend(days as i64);
        let updated = self.repository.update(&key).await?;
        info!(key_id = %key_id, days, "API key expiry extended");

        Ok(updated)
    }

    /// List all keys owned by an account. Entities carry only the hash,
    /// never the plaintext.
    pub async fn list(&self, account_id: &AccountId) -> Result<Vec<ApiKey>, DomainError> {
        self.repository.list_for_account(account_id).await
    }

    async fn owned_key(
        &self,
        requesting_account: &AccountId,
        key_id: &ApiKeyId,
    ) -> Result<ApiKey, DomainError> {
        let key = self
            .repository
            .get(key_id)
            .await?
            .ok_or_else(|| DomainError::not_found("API key not found"))?;

        if key.account_id() != requesting_account {
            return Err(DomainError::forbidden(
                "API key belongs to another account",
            ));
        }

        Ok(key)
    }
}

fn validate_expiry_days(days: u32) -> Result<(), DomainError> {
    if !(MIN_EXPIRES_IN_DAYS..=MAX_EXPIRES_IN_DAYS).contains(&days) {
        return Err(DomainError::validation(format!(
            "Expiration days must be between {} and {}",
            MIN_EXPIRES_IN_DAYS, MAX_EXPIRES_IN_DAYS
        )));
    }

    Ok(())
}

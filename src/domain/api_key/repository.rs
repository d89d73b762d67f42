//! API Key repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{ApiKey, ApiKeyId};
use crate::domain::account::AccountId;
use crate::domain::DomainError;

/// Repository trait for API key storage
#[async_trait]
pub trait ApiKeyRepository: Send + Sync + Debug {
    /// Get an API key by its ID
    async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError>;

    /// Create a new API key. Fails with `Conflict` when the ID is already
    /// taken.
    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError>;

    /// Update an existing API key
    async fn update(&self, api_key: &ApiKey) -> Result<ApiKey, DomainError>;

    /// List all keys owned by an account
    async fn list_for_account(&self, account_id: &AccountId) -> Result<Vec<ApiKey>, DomainError>;

    /// List every stored key. Validation scans these candidates because
    /// the one-way hash does not support lookup by plaintext.
    async fn list_all(&self) -> Result<Vec<ApiKey>, DomainError>;

    /// Record usage of an API key (updates the last-used timestamp)
    async fn record_usage(&self, id: &ApiKeyId) -> Result<(), DomainError>;
}

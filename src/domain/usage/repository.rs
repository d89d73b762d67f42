//! Usage event repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::record::{UsageEvent, UsageEventId};
use crate::domain::api_key::ApiKeyId;
use crate::domain::DomainError;

/// Repository trait for the usage audit trail. Events are append-only
/// except for the one status patch at request completion.
#[async_trait]
pub trait UsageRepository: Send + Sync + Debug {
    /// Append a new usage event
    async fn append(&self, event: UsageEvent) -> Result<UsageEvent, DomainError>;

    /// Patch the status code of an existing event
    async fn set_status(&self, id: &UsageEventId, status_code: u16) -> Result<(), DomainError>;

    /// List all events recorded for a key
    async fn list_for_key(&self, api_key_id: &ApiKeyId) -> Result<Vec<UsageEvent>, DomainError>;
}

//! Usage accounting service
//!
//! Thin orchestration over the usage repository: record an event when a
//! key authenticates, finalize its status when the request completes.

use std::sync::Arc;

use tracing::debug;

use crate::domain::api_key::ApiKeyId;
use crate::domain::usage::{UsageEvent, UsageEventId, UsageRepository};
use crate::domain::DomainError;

/// Usage accounting service
#[derive(Debug)]
pub struct UsageService {
    repository: Arc<dyn UsageRepository>,
}

impl UsageService {
    /// Create a new usage service
    pub fn new(repository: Arc<dyn UsageRepository>) -> Self {
        Self { repository }
    }

    /// Record a usage event for an authenticated request. The status is
    /// provisional until `finalize` patches it.
    pub async fn record(&self, event: UsageEvent) -> Result<UsageEventId, DomainError> {
        let appended = self.repository.append(event).await?;
        debug!(event_id = %appended.id(), endpoint = %appended.endpoint, "Usage event recorded");

        Ok(appended.id().clone())
    }

    /// Patch an event with the handler's real final status
    pub async fn finalize(&self, id: &UsageEventId, status_code: u16) -> Result<(), DomainError> {
        self.repository.set_status(id, status_code).await
    }

    /// List all events recorded for a key
    pub async fn list_for_key(
        &self,
        api_key_id: &ApiKeyId,
    ) -> Result<Vec<UsageEvent>, DomainError> {
        self.repository.list_for_key(api_key_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::usage::InMemoryUsageRepository;

    fn create_service() -> UsageService {
        UsageService::new(Arc::new(InMemoryUsageRepository::new()))
    }

    #[tokio::test]
    async fn test_record_and_finalize() {
        let service = create_service();
        let key_id = ApiKeyId::new("key-1");

        let event = UsageEvent::new(key_id.clone(), "/api/v1/countries", "GET", 200);
        let event_id = service.record(event).await.unwrap();

        service.finalize(&event_id, 500).await.unwrap();

        let events = service.list_for_key(&key_id).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].status_code, 500);
    }

    #[tokio::test]
    async fn test_finalize_missing_event() {
        let service = create_service();

        let result = service
            .finalize(&UsageEventId::new("usage-missing"), 200)
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}

//! In-memory usage event repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::api_key::ApiKeyId;
use crate::domain::usage::{UsageEvent, UsageEventId, UsageRepository};
use crate::domain::DomainError;

/// In-memory implementation of UsageRepository
#[derive(Debug, Default)]
pub struct InMemoryUsageRepository {
    events: Arc<RwLock<HashMap<String, UsageEvent>>>,
}

impl InMemoryUsageRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UsageRepository for InMemoryUsageRepository {
    async fn append(&self, event: UsageEvent) -> Result<UsageEvent, DomainError> {
        let mut events = self.events.write().await;
        events.insert(event.id().as_str().to_string(), event.clone());
        Ok(event)
    }

    async fn set_status(&self, id: &UsageEventId, status_code: u16) -> Result<(), DomainError> {
        let mut events = self.events.write().await;

        match events.get_mut(id.as_str()) {
            Some(event) => {
                event.status_code = status_code;
                Ok(())
            }
            None => Err(DomainError::not_found(format!(
                "Usage event '{}' not found",
                id
            ))),
        }
    }

    async fn list_for_key(&self, api_key_id: &ApiKeyId) -> Result<Vec<UsageEvent>, DomainError> {
        let events = self.events.read().await;

        let mut result: Vec<UsageEvent> = events
            .values()
            .filter(|e| &e.api_key_id == api_key_id)
            .cloned()
            .collect();
        result.sort_by_key(|e| e.timestamp);

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_event(key: &str, endpoint: &str) -> UsageEvent {
        UsageEvent::new(ApiKeyId::new(key), endpoint, "GET", 200)
    }

    #[tokio::test]
    async fn test_append_and_list() {
        let repo = InMemoryUsageRepository::new();

        repo.append(create_test_event("key-1", "/api/v1/countries"))
            .await
            .unwrap();
        repo.append(create_test_event("key-1", "/api/v1/countries/france"))
            .await
            .unwrap();
        repo.append(create_test_event("key-2", "/api/v1/countries"))
            .await
            .unwrap();

        let events = repo.list_for_key(&ApiKeyId::new("key-1")).await.unwrap();
        assert_eq!(events.len(), 2);
    }

    #[tokio::test]
    async fn test_set_status() {
        let repo = InMemoryUsageRepository::new();
        let event = create_test_event("key-1", "/api/v1/countries");
        let id = event.id().clone();

        repo.append(event).await.unwrap();
        repo.set_status(&id, 404).await.unwrap();

        let events = repo.list_for_key(&ApiKeyId::new("key-1")).await.unwrap();
        assert_eq!(events[0].status_code, 404);
    }

    #[tokio::test]
    async fn test_set_status_missing_event() {
        let repo = InMemoryUsageRepository::new();

        let result = repo.set_status(&UsageEventId::new("usage-missing"), 200).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}

//! In-memory account repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::account::{Account, AccountId, AccountRepository};
use crate::domain::DomainError;

/// In-memory implementation of AccountRepository
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
    /// Index for username -> account ID lookup
    username_index: Arc<RwLock<HashMap<String, String>>>,
    /// Index for email -> account ID lookup
    email_index: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryAccountRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn get(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(id.as_str()).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<Account>, DomainError> {
        let username_index = self.username_index.read().await;

        if let Some(account_id) = username_index.get(username) {
            let accounts = self.accounts.read().await;
            return Ok(accounts.get(account_id).cloned());
        }

        Ok(None)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let email_index = self.email_index.read().await;

        if let Some(account_id) = email_index.get(email) {
            let accounts = self.accounts.read().await;
            return Ok(accounts.get(account_id).cloned());
        }

        Ok(None)
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;
        let mut username_index = self.username_index.write().await;
        let mut email_index = self.email_index.write().await;

        let id = account.id().as_str().to_string();
        let username = account.username().to_string();
        let email = account.email().to_string();

        if accounts.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "Account with ID '{}' already exists",
                id
            )));
        }

        if username_index.contains_key(&username) {
            return Err(DomainError::conflict("Username already exists"));
        }

        if email_index.contains_key(&email) {
            return Err(DomainError::conflict("Email already registered"));
        }

        username_index.insert(username, id.clone());
        email_index.insert(email, id.clone());
        accounts.insert(id, account.clone());

        Ok(account)
    }

    async fn record_login(&self, id: &AccountId) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;

        match accounts.get_mut(id.as_str()) {
            Some(account) => {
                account.record_login();
                Ok(())
            }
            None => Err(DomainError::not_found(format!(
                "Account '{}' not found",
                id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_account(username: &str, email: &str) -> Account {
        Account::new(AccountId::generate(), username, email, "hashed_password")
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryAccountRepository::new();
        let account = create_test_account("alice", "alice@example.com");

        repo.create(account.clone()).await.unwrap();

        let retrieved = repo.get(account.id()).await.unwrap();
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().username(), "alice");
    }

    #[tokio::test]
    async fn test_get_by_username_and_email() {
        let repo = InMemoryAccountRepository::new();
        let account = create_test_account("alice", "alice@example.com");

        repo.create(account.clone()).await.unwrap();

        let by_username = repo.get_by_username("alice").await.unwrap();
        assert_eq!(by_username.unwrap().id(), account.id());

        let by_email = repo.get_by_email("alice@example.com").await.unwrap();
        assert_eq!(by_email.unwrap().id(), account.id());
    }

    #[tokio::test]
    async fn test_get_by_username_or_email() {
        let repo = InMemoryAccountRepository::new();
        let account = create_test_account("alice", "alice@example.com");

        repo.create(account).await.unwrap();

        assert!(repo
            .get_by_username_or_email("alice")
            .await
            .unwrap()
            .is_some());
        assert!(repo
            .get_by_username_or_email("alice@example.com")
            .await
            .unwrap()
            .is_some());
        assert!(repo
            .get_by_username_or_email("nobody")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let repo = InMemoryAccountRepository::new();

        repo.create(create_test_account("alice", "alice@example.com"))
            .await
            .unwrap();

        let result = repo
            .create(create_test_account("alice", "other@example.com"))
            .await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryAccountRepository::new();

        repo.create(create_test_account("alice", "alice@example.com"))
            .await
            .unwrap();

        let result = repo
            .create(create_test_account("bob", "alice@example.com"))
            .await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_record_login() {
        let repo = InMemoryAccountRepository::new();
        let account = create_test_account("alice", "alice@example.com");

        repo.create(account.clone()).await.unwrap();
        repo.record_login(account.id()).await.unwrap();

        let retrieved = repo.get(account.id()).await.unwrap().unwrap();
        assert!(retrieved.last_login_at().is_some());
    }

    #[tokio::test]
    async fn test_record_login_missing_account() {
        let repo = InMemoryAccountRepository::new();

        let result = repo.record_login(&AccountId::new("acct-missing")).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}

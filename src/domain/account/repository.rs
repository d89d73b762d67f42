//! Account repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Account, AccountId};
use crate::domain::DomainError;

/// Repository trait for account storage
#[async_trait]
pub trait AccountRepository: Send + Sync + Debug {
    /// Get an account by its ID
    async fn get(&self, id: &AccountId) -> Result<Option<Account>, DomainError>;

    /// Get an account by its username
    async fn get_by_username(&self, username: &str) -> Result<Option<Account>, DomainError>;

    /// Get an account by its normalized email
    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, DomainError>;

    /// Create a new account. Fails with `Conflict` when the username or
    /// email is already taken.
    async fn create(&self, account: Account) -> Result<Account, DomainError>;

    /// Record a successful login
    async fn record_login(&self, id: &AccountId) -> Result<(), DomainError>;

    /// Look up an account by username or email (login identifier)
    async fn get_by_username_or_email(
        &self,
        identifier: &str,
    ) -> Result<Option<Account>, DomainError> {
        if let Some(account) = self.get_by_username(identifier).await? {
            return Ok(Some(account));
        }
        self.get_by_email(identifier).await
    }

    /// Check if a username is taken
    async fn username_exists(&self, username: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_username(username).await?.is_some())
    }

    /// Check if an email is taken
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_email(email).await?.is_some())
    }
}

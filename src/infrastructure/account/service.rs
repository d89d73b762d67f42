//! Account service for registration and authentication

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::account::{
    validate_email, validate_password, validate_username, Account, AccountId, AccountRepository,
};
use crate::domain::DomainError;

use super::password::CredentialHasher;

/// Request for registering a new account
#[derive(Debug, Clone)]
pub struct RegisterAccountRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Account service for registration and login
#[derive(Debug)]
pub struct AccountService {
    repository: Arc<dyn AccountRepository>,
    hasher: Arc<dyn CredentialHasher>,
}

impl AccountService {
    /// Create a new account service
    pub fn new(repository: Arc<dyn AccountRepository>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { repository, hasher }
    }

    /// Register a new account.
    ///
    /// Validates the username, email, and password shape, rejects taken
    /// identities, and stores only the password hash.
    pub async fn register(&self, request: RegisterAccountRequest) -> Result<Account, DomainError> {
        validate_username(&request.username)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let email =
            validate_email(&request.email).map_err(|e| DomainError::validation(e.to_string()))?;

        validate_password(&request.password)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        if self.repository.username_exists(&request.username).await? {
            return Err(DomainError::conflict("Username already exists"));
        }

        if self.repository.email_exists(&email).await? {
            return Err(DomainError::conflict("Email already registered"));
        }

        let password_hash = self.hasher.hash(&request.password)?;

        let account = Account::new(
            AccountId::generate(),
            &request.username,
            email,
            password_hash,
        );

        let created = self.repository.create(account).await?;
        info!(account_id = %created.id(), username = %created.username(), "Account registered");

        Ok(created)
    }

    /// Authenticate with a username or email plus password.
    ///
    /// Returns `None` for any bad credential; callers must not learn
    /// whether the identifier or the password was wrong. Updates the
    /// last-login timestamp on success.
    pub async fn authenticate(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<Option<Account>, DomainError> {
        let account = match self.repository.get_by_username_or_email(identifier).await? {
            Some(account) => account,
            None => {
                debug!("Login attempt for unknown identifier");
                return Ok(None);
            }
        };

        if !self.hasher.verify(password, account.password_hash()) {
            debug!(account_id = %account.id(), "Login attempt with wrong password");
            return Ok(None);
        }

        self.repository.record_login(account.id()).await?;

        self.repository.get(account.id()).await
    }

    /// Get an account by ID
    pub async fn get(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        self.repository.get(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::account::password::Argon2Hasher;
    use crate::infrastructure::account::repository::InMemoryAccountRepository;

    fn create_service() -> AccountService {
        AccountService::new(
            Arc::new(InMemoryAccountRepository::new()),
            Arc::new(Argon2Hasher::new()),
        )
    }

    fn register_request(username: &str, email: &str) -> RegisterAccountRequest {
        RegisterAccountRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "Passw0rd!".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register() {
        let service = create_service();

        let account = service
            .register(register_request("alice", "alice@example.com"))
            .await
            .unwrap();

        assert_eq!(account.username(), "alice");
        assert_eq!(account.email(), "alice@example.com");
        assert_ne!(account.password_hash(), "Passw0rd!");
    }

    #[tokio::test]
    async fn test_register_normalizes_email() {
        let service = create_service();

        let account = service
            .register(register_request("alice", "  Alice@Example.COM "))
            .await
            .unwrap();

        assert_eq!(account.email(), "alice@example.com");
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let service = create_service();

        service
            .register(register_request("alice", "alice@example.com"))
            .await
            .unwrap();

        let result = service
            .register(register_request("alice", "other@example.com"))
            .await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let service = create_service();

        service
            .register(register_request("alice", "alice@example.com"))
            .await
            .unwrap();

        let result = service
            .register(register_request("bob", "alice@example.com"))
            .await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_different_case() {
        let service = create_service();

        service
            .register(register_request("alice", "alice@example.com"))
            .await
            .unwrap();

        let result = service
            .register(register_request("bob", "ALICE@example.com"))
            .await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_register_invalid_username() {
        let service = create_service();

        let result = service
            .register(register_request("a!", "alice@example.com"))
            .await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_register_weak_password() {
        let service = create_service();

        let request = RegisterAccountRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "password".to_string(),
        };

        let result = service.register(request).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_authenticate_by_username_and_email() {
        let service = create_service();

        service
            .register(register_request("alice", "alice@example.com"))
            .await
            .unwrap();

        let by_username = service.authenticate("alice", "Passw0rd!").await.unwrap();
        assert!(by_username.is_some());

        let by_email = service
            .authenticate("alice@example.com", "Passw0rd!")
            .await
            .unwrap();
        assert!(by_email.is_some());
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let service = create_service();

        service
            .register(register_request("alice", "alice@example.com"))
            .await
            .unwrap();

        let result = service.authenticate("alice", "WrongPass1!").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_unknown_identifier() {
        let service = create_service();

        let result = service.authenticate("nobody", "Passw0rd!").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_records_login() {
        let service = create_service();

        service
            .register(register_request("alice", "alice@example.com"))
            .await
            .unwrap();

        let account = service
            .authenticate("alice", "Passw0rd!")
            .await
            .unwrap()
            .unwrap();
        assert!(account.last_login_at().is_some());
    }
}

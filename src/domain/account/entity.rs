//! Account entity and related types

use chrono::{DateTime, Utc};

/// Account identifier, generated at registration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountId(String);

impl AccountId {
    /// Create an account ID from an existing value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new unique ID
    pub fn generate() -> Self {
        Self(format!("acct-{}", uuid::Uuid::new_v4()))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered user account
#[derive(Debug, Clone)]
pub struct Account {
    /// Unique identifier for the account
    id: AccountId,
    /// Username for login (unique)
    username: String,
    /// Normalized email address (unique)
    email: String,
    /// Argon2 password hash, never the plaintext
    password_hash: String,
    /// Whether this account has administrative privileges
    is_admin: bool,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last successful login timestamp
    last_login_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Create a new account
    pub fn new(
        id: AccountId,
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            is_admin: false,
            created_at: Utc::now(),
            last_login_at: None,
        }
    }

    /// Grant administrative privileges
    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    /// Rebuild an account from stored fields
    pub fn restore(
        id: AccountId,
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        is_admin: bool,
        created_at: DateTime<Utc>,
        last_login_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            is_admin,
            created_at,
            last_login_at,
        }
    }

    // Getters

    pub fn id(&self) -> &AccountId {
        &self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
    }

    // Mutators

    /// Record a successful login
    pub fn record_login(&mut self) {
        self.last_login_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_account(username: &str, email: &str) -> Account {
        Account::new(AccountId::generate(), username, email, "hashed_password")
    }

    #[test]
    fn test_account_id_generate_is_unique() {
        let a = AccountId::generate();
        let b = AccountId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("acct-"));
    }

    #[test]
    fn test_account_creation() {
        let account = create_test_account("alice", "alice@example.com");

        assert_eq!(account.username(), "alice");
        assert_eq!(account.email(), "alice@example.com");
        assert_eq!(account.password_hash(), "hashed_password");
        assert!(!account.is_admin());
        assert!(account.last_login_at().is_none());
    }

    #[test]
    fn test_account_with_admin() {
        let account = create_test_account("root", "root@example.com").with_admin(true);
        assert!(account.is_admin());
    }

    #[test]
    fn test_account_record_login() {
        let mut account = create_test_account("alice", "alice@example.com");

        assert!(account.last_login_at().is_none());

        account.record_login();
        assert!(account.last_login_at().is_some());
    }

    #[test]
    fn test_account_restore() {
        let created = Utc::now() - chrono::Duration::days(7);
        let account = Account::restore(
            AccountId::new("acct-1"),
            "alice",
            "alice@example.com",
            "hash",
            true,
            created,
            None,
        );

        assert_eq!(account.id().as_str(), "acct-1");
        assert_eq!(account.created_at(), created);
        assert!(account.is_admin());
    }
}

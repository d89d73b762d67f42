//! API Key entity and related types

use chrono::{DateTime, Duration, Utc};

use crate::domain::account::AccountId;

/// API key identifier, generated at creation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiKeyId(String);

impl ApiKeyId {
    /// Create a key ID from an existing value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new unique ID
    pub fn generate() -> Self {
        Self(format!("key-{}", uuid::Uuid::new_v4()))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ApiKeyId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ApiKeyId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for ApiKeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A machine credential bound to exactly one account.
///
/// Only a one-way hash of the key value is stored; the plaintext exists
/// solely in the creation response.
#[derive(Debug, Clone)]
pub struct ApiKey {
    /// Unique identifier for the key
    id: ApiKeyId,
    /// Account that owns this key
    account_id: AccountId,
    /// One-way hash of the key value
    secret_hash: String,
    /// Optional display name
    name: Option<String>,
    /// Whether the key is active. Revocation flips this to false and is
    /// irreversible.
    active: bool,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Expiration timestamp (None = never expires)
    expires_at: Option<DateTime<Utc>>,
    /// Last time the key authenticated a request
    last_used_at: Option<DateTime<Utc>>,
}

impl ApiKey {
    /// Create a new API key
    pub fn new(id: ApiKeyId, account_id: AccountId, secret_hash: impl Into<String>) -> Self {
        Self {
            id,
            account_id,
            secret_hash: secret_hash.into(),
            name: None,
            active: true,
            created_at: Utc::now(),
            expires_at: None,
            last_used_at: None,
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the expiration timestamp
    pub fn with_expiration(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Rebuild a key from stored fields
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: ApiKeyId,
        account_id: AccountId,
        secret_hash: impl Into<String>,
        name: Option<String>,
        active: bool,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
        last_used_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            account_id,
            secret_hash: secret_hash.into(),
            name,
            active,
            created_at,
            expires_at,
            last_used_at,
        }
    }

    // Getters

    pub fn id(&self) -> &ApiKeyId {
        &self.id
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn secret_hash(&self) -> &str {
        &self.secret_hash
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn last_used_at(&self) -> Option<DateTime<Utc>> {
        self.last_used_at
    }

    // Status checks

    /// Check if the key can authenticate requests: it must be active and
    /// not past its expiration.
    pub fn is_valid(&self) -> bool {
        if !self.active {
            return false;
        }

        if let Some(expires_at) = self.expires_at {
            if Utc::now() >= expires_at {
                return false;
            }
        }

        true
    }

    /// Check if the key has expired
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() >= expires_at,
            None => false,
        }
    }

    // Mutators

    /// Disable the key. Revoking an already revoked key is a no-op.
    pub fn revoke(&mut self) {
        self.active = false;
    }

    /// Push the expiration forward by the given number of days, counted
    /// from the current expiry, or from now when the key never expired.
    pub fn extend(&mut self, days: i64) {
        self.expires_at = Some(match self.expires_at {
            Some(expires_at) => expires_at + Duration::days(days),
            None => Utc::now() + Duration::days(days),
        });
    }

    /// Record that the key authenticated a request
    pub fn record_usage(&mut self) {
        self.last_used_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_key() -> ApiKey {
        ApiKey::new(
            ApiKeyId::generate(),
            AccountId::new("acct-1"),
            "hashed_secret",
        )
    }

    #[test]
    fn test_key_creation() {
        let key = create_test_key().with_name("CI key");

        assert_eq!(key.account_id().as_str(), "acct-1");
        assert_eq!(key.name(), Some("CI key"));
        assert!(key.is_active());
        assert!(key.is_valid());
        assert!(!key.is_expired());
        assert!(key.last_used_at().is_none());
    }

    #[test]
    fn test_key_without_expiry_is_valid() {
        let key = create_test_key();
        assert!(key.expires_at().is_none());
        assert!(key.is_valid());
    }

    #[test]
    fn test_key_expiration() {
        let past = Utc::now() - Duration::hours(1);
        let key = create_test_key().with_expiration(past);

        assert!(key.is_expired());
        assert!(!key.is_valid());
    }

    #[test]
    fn test_key_future_expiration() {
        let future = Utc::now() + Duration::days(1);
        let key = create_test_key().with_expiration(future);

        assert!(!key.is_expired());
        assert!(key.is_valid());
    }

    #[test]
    fn test_revoke_is_idempotent() {
        let mut key = create_test_key();

        key.revoke();
        assert!(!key.is_active());
        assert!(!key.is_valid());

        key.revoke();
        assert!(!key.is_active());
    }

    #[test]
    fn test_extend_from_existing_expiry() {
        let expires = Utc::now() + Duration::days(10);
        let mut key = create_test_key().with_expiration(expires);

        key.extend(30);
        assert_eq!(key.expires_at(), Some(expires + Duration::days(30)));
    }

    #[test]
    fn test_extend_without_expiry() {
        let mut key = create_test_key();

        key.extend(30);

        let expires_at = key.expires_at().unwrap();
        assert!(expires_at > Utc::now() + Duration::days(29));
        assert!(expires_at <= Utc::now() + Duration::days(30));
    }

    #[test]
    fn test_extend_restores_validity_of_expired_key() {
        let mut key = create_test_key().with_expiration(Utc::now() - Duration::hours(1));
        assert!(!key.is_valid());

        key.extend(365);
        assert!(key.is_valid());
    }

    #[test]
    fn test_record_usage() {
        let mut key = create_test_key();

        assert!(key.last_used_at().is_none());

        key.record_usage();
        assert!(key.last_used_at().is_some());
    }
}

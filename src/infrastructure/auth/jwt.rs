//! Session token issuance and verification
//!
//! Tokens are stateless HS256 JWTs: any holder of the signing secret can
//! verify one without a store lookup. Rotating the secret invalidates
//! every outstanding token. A revoked account therefore stays usable
//! until its tokens expire; that staleness window is accepted.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::account::AccountId;
use crate::domain::DomainError;

/// Kind of session token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Short-lived token presented on every authenticated request
    Access,
    /// Long-lived token exchanged for fresh access tokens
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Access => write!(f, "access"),
            Self::Refresh => write!(f, "refresh"),
        }
    }
}

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (account ID)
    pub sub: String,
    /// Issued at (Unix epoch seconds)
    pub iat: i64,
    /// Expiration (Unix epoch seconds)
    pub exp: i64,
    /// Token kind, so a refresh token cannot stand in for an access token
    pub kind: TokenKind,
}

impl SessionClaims {
    fn new(account_id: &AccountId, kind: TokenKind, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: account_id.as_str().to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            kind,
        }
    }

    /// Get the subject as an account ID
    pub fn account_id(&self) -> AccountId {
        AccountId::new(&self.sub)
    }

    /// Check if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Token verification failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token is malformed or its signature is invalid")]
    Malformed,

    #[error("token kind is not valid for this operation")]
    WrongKind,
}

/// Configuration for the session token service
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Signing secret. Strictly external configuration; there is no
    /// built-in default or override.
    pub secret: String,
    /// Access token lifetime in hours
    pub access_ttl_hours: u64,
    /// Refresh token lifetime in days
    pub refresh_ttl_days: u64,
}

impl JwtConfig {
    /// Create a configuration with the default lifetimes (1 hour access,
    /// 30 day refresh)
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_ttl_hours: 1,
            refresh_ttl_days: 30,
        }
    }

    /// Set the access token lifetime
    pub fn with_access_ttl_hours(mut self, hours: u64) -> Self {
        self.access_ttl_hours = hours;
        self
    }

    /// Set the refresh token lifetime
    pub fn with_refresh_ttl_days(mut self, days: u64) -> Self {
        self.refresh_ttl_days = days;
        self
    }
}

/// Stateless issuer and verifier for session tokens
#[derive(Clone)]
pub struct SessionTokenService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for SessionTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenService")
            .field("access_ttl_hours", &self.config.access_ttl_hours)
            .field("refresh_ttl_days", &self.config.refresh_ttl_days)
            .field("secret", &"[hidden]")
            .finish()
    }
}

impl SessionTokenService {
    /// Create a new service from configuration
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Lifetime of tokens of the given kind
    pub fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => Duration::hours(self.config.access_ttl_hours as i64),
            TokenKind::Refresh => Duration::days(self.config.refresh_ttl_days as i64),
        }
    }

    /// Mint a signed token asserting the account's identity
    pub fn issue(&self, account_id: &AccountId, kind: TokenKind) -> Result<String, DomainError> {
        let claims = SessionClaims::new(account_id, kind, self.ttl(kind));

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to sign session token: {}", e)))
    }

    /// Verify a token and return its claims. The claims must be of the
    /// expected kind.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<SessionClaims, TokenError> {
        let validation = Validation::default();

        let token_data =
            decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Malformed,
                }
            })?;

        if token_data.claims.kind != expected {
            return Err(TokenError::WrongKind);
        }

        Ok(token_data.claims)
    }
}

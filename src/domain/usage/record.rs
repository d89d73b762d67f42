//! Usage event entities

use chrono::{DateTime, Utc};

use crate::domain::api_key::ApiKeyId;

/// Unique identifier for a usage event
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UsageEventId(String);

impl UsageEventId {
    /// Create a usage event ID from an existing value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new unique ID
    pub fn generate() -> Self {
        Self(format!("usage-{}", uuid::Uuid::new_v4()))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for UsageEventId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UsageEventId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for UsageEventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Audit record of one authenticated API-key request.
///
/// The status code is written twice: provisionally when authentication
/// succeeds, and once more with the handler's real outcome. Every other
/// field is immutable after the append.
#[derive(Debug, Clone)]
pub struct UsageEvent {
    /// Unique ID
    id: UsageEventId,
    /// API key that authenticated the request
    pub api_key_id: ApiKeyId,
    /// Request path
    pub endpoint: String,
    /// HTTP method
    pub method: String,
    /// Response status code (provisional until finalized)
    pub status_code: u16,
    /// Time from request entry until the event was recorded
    pub latency_ms: u64,
    /// Client IP address, when known
    pub ip_address: Option<String>,
    /// Client user-agent string, when present
    pub user_agent: Option<String>,
    /// When the request was authenticated
    pub timestamp: DateTime<Utc>,
}

impl UsageEvent {
    /// Create a new usage event with a provisional status
    pub fn new(
        api_key_id: ApiKeyId,
        endpoint: impl Into<String>,
        method: impl Into<String>,
        status_code: u16,
    ) -> Self {
        Self {
            id: UsageEventId::generate(),
            api_key_id,
            endpoint: endpoint.into(),
            method: method.into(),
            status_code,
            latency_ms: 0,
            ip_address: None,
            user_agent: None,
            timestamp: Utc::now(),
        }
    }

    /// Set the measured latency
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Set the client IP address
    pub fn with_ip_address(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }

    /// Set the client user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Rebuild an event from stored fields
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: UsageEventId,
        api_key_id: ApiKeyId,
        endpoint: impl Into<String>,
        method: impl Into<String>,
        status_code: u16,
        latency_ms: u64,
        ip_address: Option<String>,
        user_agent: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            api_key_id,
            endpoint: endpoint.into(),
            method: method.into(),
            status_code,
            latency_ms,
            ip_address,
            user_agent,
            timestamp,
        }
    }

    pub fn id(&self) -> &UsageEventId {
        &self.id
    }
}

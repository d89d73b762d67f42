//! PostgreSQL usage event repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::api_key::ApiKeyId;
use crate::domain::usage::{UsageEvent, UsageEventId, UsageRepository};
use crate::domain::DomainError;

/// PostgreSQL implementation of UsageRepository
#[derive(Debug, Clone)]
pub struct PostgresUsageRepository {
    pool: PgPool,
}

impl PostgresUsageRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsageRepository for PostgresUsageRepository {
    async fn append(&self, event: UsageEvent) -> Result<UsageEvent, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO usage_events (id, api_key_id, endpoint, method, status_code,
                                      latency_ms, ip_address, user_agent, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(event.id().as_str())
        .bind(event.api_key_id.as_str())
        .bind(&event.endpoint)
        .bind(&event.method)
        .bind(event.status_code as i32)
        .bind(event.latency_ms as i64)
        .bind(event.ip_address.as_deref())
        .bind(event.user_agent.as_deref())
        .bind(event.timestamp)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to append usage event: {}", e)))?;

        Ok(event)
    }

    async fn set_status(&self, id: &UsageEventId, status_code: u16) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE usage_events SET status_code = $2 WHERE id = $1")
            .bind(id.as_str())
            .bind(status_code as i32)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to update usage event status: {}", e))
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Usage event '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn list_for_key(&self, api_key_id: &ApiKeyId) -> Result<Vec<UsageEvent>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, api_key_id, endpoint, method, status_code, latency_ms,
                   ip_address, user_agent, created_at
            FROM usage_events
            WHERE api_key_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(api_key_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list usage events: {}", e)))?;

        Ok(rows.iter().map(row_to_event).collect())
    }
}

fn row_to_event(row: &sqlx::postgres::PgRow) -> UsageEvent {
    let id: String = row.get("id");
    let api_key_id: String = row.get("api_key_id");
    let endpoint: String = row.get("endpoint");
    let method: String = row.get("method");
    let status_code: i32 = row.get("status_code");
    let latency_ms: i64 = row.get("latency_ms");
    let ip_address: Option<String> = row.get("ip_address");
    let user_agent: Option<String> = row.get("user_agent");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");

    UsageEvent::restore(
        UsageEventId::new(id),
        ApiKeyId::new(api_key_id),
        endpoint,
        method,
        status_code as u16,
        latency_ms as u64,
        ip_address,
        user_agent,
        created_at,
    )
}

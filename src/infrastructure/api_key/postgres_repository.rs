//! PostgreSQL API key repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::account::AccountId;
use crate::domain::api_key::{ApiKey, ApiKeyId, ApiKeyRepository};
use crate::domain::DomainError;

const KEY_COLUMNS: &str =
    "id, account_id, secret_hash, name, active, created_at, expires_at, last_used_at";

/// PostgreSQL implementation of ApiKeyRepository
#[derive(Debug, Clone)]
pub struct PostgresApiKeyRepository {
    pool: PgPool,
}

impl PostgresApiKeyRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApiKeyRepository for PostgresApiKeyRepository {
    async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM api_keys WHERE id = $1",
            KEY_COLUMNS
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get API key: {}", e)))?;

        Ok(row.map(|row| row_to_api_key(&row)))
    }

    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO api_keys (id, account_id, secret_hash, name, active,
                                  created_at, expires_at, last_used_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(api_key.id().as_str())
        .bind(api_key.account_id().as_str())
        .bind(api_key.secret_hash())
        .bind(api_key.name())
        .bind(api_key.is_active())
        .bind(api_key.created_at())
        .bind(api_key.expires_at())
        .bind(api_key.last_used_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!(
                    "API key with ID '{}' already exists",
                    api_key.id()
                ))
            } else {
                DomainError::storage(format!("Failed to create API key: {}", e))
            }
        })?;

        Ok(api_key)
    }

    async fn update(&self, api_key: &ApiKey) -> Result<ApiKey, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE api_keys
            SET secret_hash = $2, name = $3, active = $4, expires_at = $5, last_used_at = $6
            WHERE id = $1
            "#,
        )
        .bind(api_key.id().as_str())
        .bind(api_key.secret_hash())
        .bind(api_key.name())
        .bind(api_key.is_active())
        .bind(api_key.expires_at())
        .bind(api_key.last_used_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update API key: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "API key '{}' not found",
                api_key.id()
            )));
        }

        Ok(api_key.clone())
    }

    async fn list_for_account(&self, account_id: &AccountId) -> Result<Vec<ApiKey>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM api_keys WHERE account_id = $1 ORDER BY created_at",
            KEY_COLUMNS
        ))
        .bind(account_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list API keys: {}", e)))?;

        Ok(rows.iter().map(row_to_api_key).collect())
    }

    async fn list_all(&self) -> Result<Vec<ApiKey>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM api_keys ORDER BY created_at",
            KEY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list API keys: {}", e)))?;

        Ok(rows.iter().map(row_to_api_key).collect())
    }

    async fn record_usage(&self, id: &ApiKeyId) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE api_keys SET last_used_at = NOW() WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to record key usage: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "API key '{}' not found",
                id
            )));
        }

        Ok(())
    }
}

fn row_to_api_key(row: &sqlx::postgres::PgRow) -> ApiKey {
    let id: String = row.get("id");
    let account_id: String = row.get("account_id");
    let secret_hash: String = row.get("secret_hash");
    let name: Option<String> = row.get("name");
    let active: bool = row.get("active");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let expires_at: Option<chrono::DateTime<chrono::Utc>> = row.get("expires_at");
    let last_used_at: Option<chrono::DateTime<chrono::Utc>> = row.get("last_used_at");

    ApiKey::restore(
        ApiKeyId::new(id),
        AccountId::new(account_id),
        secret_hash,
        name,
        active,
        created_at,
        expires_at,
        last_used_at,
    )
}

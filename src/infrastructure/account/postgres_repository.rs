//! PostgreSQL account repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::account::{Account, AccountId, AccountRepository};
use crate::domain::DomainError;

/// PostgreSQL implementation of AccountRepository
#[derive(Debug, Clone)]
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_by_column(
        &self,
        column: &'static str,
        value: &str,
    ) -> Result<Option<Account>, DomainError> {
        let query = format!(
            "SELECT id, username, email, password_hash, is_admin, created_at, last_login_at \
             FROM accounts WHERE {} = $1",
            column
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get account: {}", e)))?;

        Ok(row.map(|row| row_to_account(&row)))
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn get(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        self.fetch_by_column("id", id.as_str()).await
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<Account>, DomainError> {
        self.fetch_by_column("username", username).await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        self.fetch_by_column("email", email).await
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, username, email, password_hash, is_admin,
                                  created_at, last_login_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(account.id().as_str())
        .bind(account.username())
        .bind(account.email())
        .bind(account.password_hash())
        .bind(account.is_admin())
        .bind(account.created_at())
        .bind(account.last_login_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                if msg.contains("email") {
                    DomainError::conflict("Email already registered")
                } else if msg.contains("username") {
                    DomainError::conflict("Username already exists")
                } else {
                    DomainError::conflict(format!(
                        "Account with ID '{}' already exists",
                        account.id()
                    ))
                }
            } else {
                DomainError::storage(format!("Failed to create account: {}", e))
            }
        })?;

        Ok(account)
    }

    async fn record_login(&self, id: &AccountId) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE accounts SET last_login_at = NOW() WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to record login: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Account '{}' not found",
                id
            )));
        }

        Ok(())
    }
}

fn row_to_account(row: &sqlx::postgres::PgRow) -> Account {
    let id: String = row.get("id");
    let username: String = row.get("username");
    let email: String = row.get("email");
    let password_hash: String = row.get("password_hash");
    let is_admin: bool = row.get("is_admin");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let last_login_at: Option<chrono::DateTime<chrono::Utc>> = row.get("last_login_at");

    Account::restore(
        AccountId::new(id),
        username,
        email,
        password_hash,
        is_admin,
        created_at,
        last_login_at,
    )
}

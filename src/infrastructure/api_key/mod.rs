//! API key infrastructure: generation, storage implementations, service

pub mod generator;
pub mod postgres_repository;
pub mod repository;
pub mod service;

pub use generator::ApiKeyGenerator;
pub use postgres_repository::PostgresApiKeyRepository;
pub use repository::InMemoryApiKeyRepository;
pub use service::{ApiKeyService, CreateApiKeyResult, DEFAULT_EXPIRES_IN_DAYS};

//! Usage accounting infrastructure: storage implementations and service

pub mod postgres_repository;
pub mod repository;
pub mod service;

pub use postgres_repository::PostgresUsageRepository;
pub use repository::InMemoryUsageRepository;
pub use service::UsageService;

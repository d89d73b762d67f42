//! Domain layer - Core business logic and entities

pub mod account;
pub mod api_key;
pub mod country;
pub mod error;
pub mod usage;

pub use account::{Account, AccountId, AccountRepository};
pub use api_key::{ApiKey, ApiKeyId, ApiKeyRepository};
pub use country::{Country, CurrencyInfo};
pub use error::DomainError;
pub use usage::{UsageEvent, UsageEventId, UsageRepository};

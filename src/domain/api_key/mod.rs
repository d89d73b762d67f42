//! API Key domain
//!
//! Domain types for machine credentials: the key entity with its
//! active/expiry semantics and the storage trait.

mod entity;
mod repository;

pub use entity::{ApiKey, ApiKeyId};
pub use repository::ApiKeyRepository;

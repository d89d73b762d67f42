//! Usage accounting domain
//!
//! Audit records for authenticated API-key requests.

mod record;
mod repository;

pub use record::{UsageEvent, UsageEventId};
pub use repository::UsageRepository;

#[cfg(test)]
pub use repository::mock;

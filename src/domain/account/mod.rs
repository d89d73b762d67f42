//! Account domain
//!
//! Domain types for registered user accounts: the entity, input
//! validation rules, and the storage trait.

mod entity;
mod repository;
mod validation;

pub use entity::{Account, AccountId};
pub use repository::AccountRepository;
pub use validation::{
    validate_email, validate_password, validate_username, AccountValidationError,
};

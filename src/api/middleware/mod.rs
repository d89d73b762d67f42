//! API middleware components

pub mod api_key;
pub mod session;

pub use api_key::{require_api_key, ApiKeyContext};
pub use session::RequireSession;

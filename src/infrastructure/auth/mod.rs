//! Session authentication infrastructure

mod jwt;

pub use jwt::{JwtConfig, SessionClaims, SessionTokenService, TokenError, TokenKind};

//! `stockroom-auth` — authentication boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it decodes and
//! validates tokens, and resolves actor ids to display summaries. The core
//! treats the actor id it produces as an opaque required identifier.

pub mod claims;
pub mod directory;
pub mod jwt;

pub use claims::{validate_claims, JwtClaims, TokenValidationError};
pub use directory::{InMemoryUserDirectory, UserDirectory, UserProfile};
pub use jwt::{Hs256JwtValidator, JwtError, JwtValidator};

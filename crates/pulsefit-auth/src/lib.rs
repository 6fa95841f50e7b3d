//! # Pulsefit Auth
//!
//! Stateless authentication and authorization primitives for the Pulsefit API:
//!
//! - [`claims`]: JWT claim structures for access and refresh tokens
//! - [`jwt`]: Token creation and verification (the credential verifier)
//! - [`identity`]: The per-request principal and the closed [`Role`] enum
//! - [`access`]: The declarative method/path/role access-control matrix
//! - [`config`]: JWT signing configuration loaded from the environment
//! - [`error`]: Typed token verification failures
//!
//! Token verification is pure computation over a process-wide secret; the
//! access matrix is built once at startup and only read afterwards, so
//! concurrent requests share both without synchronization.

pub mod access;
pub mod claims;
pub mod config;
pub mod error;
pub mod identity;
pub mod jwt;

pub use access::{AccessMatrix, AccessRule, Requirement};
pub use claims::{Claims, RefreshClaims};
pub use config::JwtConfig;
pub use error::TokenError;
pub use identity::{Identity, Role};
pub use jwt::{
    authenticate, create_access_token, create_refresh_token, verify_refresh_token, verify_token,
};

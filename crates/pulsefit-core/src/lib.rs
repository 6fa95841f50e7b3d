//! # Pulsefit Core
//!
//! Foundational types shared across the Pulsefit API:
//!
//! - [`de`]: String-tolerant deserializers for query parameters
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Pagination utilities for list endpoints
//! - [`password`]: Password hashing and verification

pub mod de;
pub mod errors;
pub mod pagination;
pub mod password;

pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};

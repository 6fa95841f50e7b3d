//! Configuration modules for the Pulsefit API.
//!
//! Each submodule handles one aspect of configuration, loaded once at
//! startup. JWT signing configuration lives in [`pulsefit_auth::JwtConfig`]
//! next to the verifier that consumes it.
//!
//! # Modules
//!
//! - [`access`]: the declarative route access-control table
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`database`]: PostgreSQL connection pool initialization

pub mod access;
pub mod cors;
pub mod database;

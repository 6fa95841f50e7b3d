//! Request middleware.
//!
//! - [`gate`]: the per-request authentication/authorization gate
//! - [`auth`]: extractors for the identity the gate attaches

pub mod auth;
pub mod gate;

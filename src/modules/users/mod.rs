//! User administration module.
//!
//! Listing, creation, verification and removal of accounts. The whole
//! surface is mounted under `/api/users` and restricted to admins by the
//! request gate.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;

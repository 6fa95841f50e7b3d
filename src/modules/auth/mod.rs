//! Authentication endpoints: registration, login, token refresh and the
//! current-user profile.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;

//! The member surface under `/api/my`: enrolling into programs, tracking
//! progress, and reading enrolled program content.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;

//! Training programs: the public catalog, reviews, and the instructor
//! authoring surface (programs, modules, lessons, resources).

pub mod controller;
pub mod model;
pub mod router;
pub mod service;

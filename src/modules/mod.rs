pub mod auth;
pub mod enrollments;
pub mod programs;
pub mod users;

pub use self::users::model::User;

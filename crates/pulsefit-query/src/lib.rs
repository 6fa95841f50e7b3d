//! # Pulsefit Query
//!
//! Dynamic, identity-scoped query filtering:
//!
//! - [`predicate`]: composable filter predicates with lazy no-op semantics
//! - [`spec`]: the specification composer that conjoins optional predicates
//!   with a mandatory owner scope for non-admin callers
//! - [`sql`]: the storage boundary, rendering a specification into a
//!   parameter-bound `WHERE` clause on a [`sqlx::QueryBuilder`]
//!
//! Predicates are plain data (a tagged variant per filter kind) and the
//! composer performs no I/O, so composition is deterministic and testable
//! without a database.

pub mod predicate;
pub mod spec;
pub mod sql;

pub use predicate::{Predicate, Relation, Value};
pub use spec::Specification;
pub use sql::push_where;

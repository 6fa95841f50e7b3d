//! The specification composer.
//!
//! A [`Specification`] is an ordered conjunction of predicates. Composition
//! starts from the caller's optional filters (no-ops already dropped by the
//! predicate constructors) and, for any caller whose role is not `Admin`,
//! ends with an owner-scope predicate bound to the caller's subject id.
//!
//! The scope predicate is appended last and cannot be displaced: a caller
//! filter naming the scope column is discarded, never merged, so no
//! combination of optional parameters widens results past the caller's own
//! records.

use pulsefit_auth::Identity;

use crate::predicate::Predicate;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Specification {
    predicates: Vec<Predicate>,
}

impl Specification {
    /// A specification with no constraints (matches every row).
    pub fn any() -> Self {
        Self::default()
    }

    /// Conjoins caller filters with the mandatory identity scope.
    ///
    /// `scope_column` names the ownership column on the filtered table
    /// (e.g. `instructor_id` for programs, `user_id` for enrollments).
    pub fn compose(
        caller: &Identity,
        scope_column: &'static str,
        filters: impl IntoIterator<Item = Option<Predicate>>,
    ) -> Self {
        let mut predicates: Vec<Predicate> = filters
            .into_iter()
            .flatten()
            .filter(|p| p.column() != Some(scope_column))
            .collect();

        if !caller.is_admin() {
            predicates.push(Predicate::OwnedBy {
                column: scope_column,
                owner_id: caller.subject_id,
            });
        }

        Self { predicates }
    }

    /// Conjunction of filters with no identity scope, for unscoped surfaces
    /// such as the public catalog.
    pub fn filters(filters: impl IntoIterator<Item = Option<Predicate>>) -> Self {
        Self {
            predicates: filters.into_iter().flatten().collect(),
        }
    }

    /// Appends a fixed predicate the handler itself imposes (e.g. a
    /// published-only constraint on the public catalog).
    pub fn also(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::{Predicate, Relation, Value};
    use pulsefit_auth::Role;

    fn instructor(id: i64) -> Identity {
        Identity {
            subject_id: id,
            role: Role::Instructor,
            verified: true,
        }
    }

    fn admin() -> Identity {
        Identity {
            subject_id: 1,
            role: Role::Admin,
            verified: true,
        }
    }

    #[test]
    fn test_zero_filters_for_non_admin_yields_scope_only() {
        let spec = Specification::compose(&instructor(42), "instructor_id", vec![None, None]);

        assert_eq!(
            spec.predicates(),
            &[Predicate::OwnedBy {
                column: "instructor_id",
                owner_id: 42,
            }]
        );
    }

    #[test]
    fn test_zero_filters_for_admin_is_unconstrained() {
        let spec = Specification::compose(&admin(), "instructor_id", vec![None]);
        assert!(spec.is_empty());
    }

    #[test]
    fn test_instructor_scenario_scope_is_last() {
        // name="yoga", minPrice=10 for instructor 42
        let spec = Specification::compose(
            &instructor(42),
            "instructor_id",
            vec![
                Predicate::search(&["name"], Some("yoga")),
                Predicate::range("price", Some(10.0), None::<f64>),
            ],
        );

        assert_eq!(
            spec.predicates(),
            &[
                Predicate::Search {
                    columns: &["name"],
                    term: "yoga".to_string(),
                },
                Predicate::Range {
                    column: "price",
                    min: Some(Value::Float(10.0)),
                    max: None,
                },
                Predicate::OwnedBy {
                    column: "instructor_id",
                    owner_id: 42,
                },
            ]
        );
    }

    #[test]
    fn test_admin_scenario_has_no_owner_constraint() {
        let spec = Specification::compose(
            &admin(),
            "instructor_id",
            vec![
                Predicate::search(&["name"], Some("yoga")),
                Predicate::range("price", Some(10.0), None::<f64>),
            ],
        );

        assert_eq!(spec.predicates().len(), 2);
        assert!(
            !spec
                .predicates()
                .iter()
                .any(|p| matches!(p, Predicate::OwnedBy { .. }))
        );
    }

    #[test]
    fn test_scope_column_cannot_be_overridden() {
        // A caller filter targeting the scope column is dropped, and the
        // injected scope still binds the caller's own id.
        let spec = Specification::compose(
            &instructor(42),
            "instructor_id",
            vec![
                Predicate::equals("instructor_id", Some(999i64)),
                Predicate::range("instructor_id", Some(0i64), Some(10_000i64)),
            ],
        );

        assert_eq!(
            spec.predicates(),
            &[Predicate::OwnedBy {
                column: "instructor_id",
                owner_id: 42,
            }]
        );
    }

    #[test]
    fn test_composition_is_idempotent() {
        let filters = || {
            vec![
                Predicate::search(&["name", "description"], Some("strength")),
                Predicate::equals_text("difficulty", Some("advanced")),
                Predicate::min_related_count(Relation::new("enrollments", "program_id"), Some(3)),
            ]
        };

        let first = Specification::compose(&instructor(7), "instructor_id", filters());
        let second = Specification::compose(&instructor(7), "instructor_id", filters());
        assert_eq!(first, second);
    }

    #[test]
    fn test_also_appends_fixed_predicate() {
        let spec = Specification::filters(vec![Predicate::search(&["name"], Some("hiit"))])
            .also(Predicate::Equals {
                column: "published",
                value: Value::Bool(true),
            });

        assert_eq!(spec.predicates().len(), 2);
        assert_eq!(
            spec.predicates()[1],
            Predicate::Equals {
                column: "published",
                value: Value::Bool(true),
            }
        );
    }
}

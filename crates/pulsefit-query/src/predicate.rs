//! Filter predicates over a tabular entity.
//!
//! Each predicate is stateless data, parameterized at call time through a
//! smart constructor. A constructor given an absent or blank parameter
//! returns `None`, the identity element of conjunction, so handlers can
//! pass every optional filter straight through without pre-checking.

use chrono::{DateTime, Utc};

/// A bindable filter parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

/// A one-to-many relation from the filtered table to a child table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    /// Child table name
    pub table: &'static str,
    /// Column on the child table referencing the filtered row's id
    pub foreign_key: &'static str,
}

impl Relation {
    pub const fn new(table: &'static str, foreign_key: &'static str) -> Self {
        Self { table, foreign_key }
    }
}

/// One filter condition, interpreted by [`crate::sql`] at the storage boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column = value`
    Equals { column: &'static str, value: Value },
    /// Case-insensitive substring match, OR'd across `columns`
    Search {
        columns: &'static [&'static str],
        term: String,
    },
    /// `column >= min AND column <= max`, each bound independently optional
    Range {
        column: &'static str,
        min: Option<Value>,
        max: Option<Value>,
    },
    /// At least one related row exists
    HasRelated { relation: Relation },
    /// Count of related rows meets a minimum, as a correlated subquery
    MinRelatedCount { relation: Relation, min: i64 },
    /// Mandatory identity scope; only ever injected by the composer
    OwnedBy {
        column: &'static str,
        owner_id: i64,
    },
}

impl Predicate {
    /// Equality filter; absent parameter contributes no constraint.
    pub fn equals(column: &'static str, value: Option<impl Into<Value>>) -> Option<Predicate> {
        value.map(|v| Predicate::Equals {
            column,
            value: v.into(),
        })
    }

    /// Equality on a text parameter; blank strings contribute no constraint.
    pub fn equals_text(column: &'static str, value: Option<&str>) -> Option<Predicate> {
        let value = value.map(str::trim).filter(|v| !v.is_empty())?;
        Some(Predicate::Equals {
            column,
            value: Value::Text(value.to_string()),
        })
    }

    /// Substring search across one or more text columns; blank or
    /// whitespace-only terms contribute no constraint.
    pub fn search(columns: &'static [&'static str], term: Option<&str>) -> Option<Predicate> {
        let term = term.map(str::trim).filter(|t| !t.is_empty())?;
        Some(Predicate::Search {
            columns,
            term: term.to_string(),
        })
    }

    /// Range filter; contributes no constraint when both bounds are absent.
    pub fn range(
        column: &'static str,
        min: Option<impl Into<Value>>,
        max: Option<impl Into<Value>>,
    ) -> Option<Predicate> {
        let min = min.map(Into::into);
        let max = max.map(Into::into);
        if min.is_none() && max.is_none() {
            return None;
        }
        Some(Predicate::Range { column, min, max })
    }

    /// Existence filter; only an explicit `true` constrains the result.
    pub fn has_related(relation: Relation, wanted: Option<bool>) -> Option<Predicate> {
        match wanted {
            Some(true) => Some(Predicate::HasRelated { relation }),
            _ => None,
        }
    }

    /// Count-threshold filter; absent or non-positive minimums contribute
    /// no constraint.
    pub fn min_related_count(relation: Relation, min: Option<i64>) -> Option<Predicate> {
        let min = min.filter(|m| *m > 0)?;
        Some(Predicate::MinRelatedCount { relation, min })
    }

    /// The column this predicate constrains directly, if any.
    ///
    /// Used by the composer to refuse caller filters that collide with the
    /// identity-scope column.
    pub fn column(&self) -> Option<&'static str> {
        match self {
            Predicate::Equals { column, .. }
            | Predicate::Range { column, .. }
            | Predicate::OwnedBy { column, .. } => Some(column),
            Predicate::Search { .. }
            | Predicate::HasRelated { .. }
            | Predicate::MinRelatedCount { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equals_absent_is_noop() {
        assert_eq!(Predicate::equals("difficulty", None::<i64>), None);
        assert!(Predicate::equals("difficulty", Some(3i64)).is_some());
    }

    #[test]
    fn test_equals_text_blank_is_noop() {
        assert_eq!(Predicate::equals_text("difficulty", None), None);
        assert_eq!(Predicate::equals_text("difficulty", Some("")), None);
        assert_eq!(Predicate::equals_text("difficulty", Some("   ")), None);
        assert_eq!(
            Predicate::equals_text("difficulty", Some(" beginner ")),
            Some(Predicate::Equals {
                column: "difficulty",
                value: Value::Text("beginner".to_string()),
            })
        );
    }

    #[test]
    fn test_search_blank_is_noop() {
        const COLS: &[&str] = &["name", "description"];
        assert_eq!(Predicate::search(COLS, None), None);
        assert_eq!(Predicate::search(COLS, Some("  \t ")), None);
        assert_eq!(
            Predicate::search(COLS, Some(" yoga ")),
            Some(Predicate::Search {
                columns: COLS,
                term: "yoga".to_string(),
            })
        );
    }

    #[test]
    fn test_range_requires_at_least_one_bound() {
        assert_eq!(Predicate::range("price", None::<f64>, None::<f64>), None);
        assert!(Predicate::range("price", Some(10.0), None::<f64>).is_some());
        assert!(Predicate::range("price", None::<f64>, Some(50.0)).is_some());
    }

    #[test]
    fn test_has_related_only_constrains_on_true() {
        let rel = Relation::new("enrollments", "user_id");
        assert_eq!(Predicate::has_related(rel, None), None);
        assert_eq!(Predicate::has_related(rel, Some(false)), None);
        assert_eq!(
            Predicate::has_related(rel, Some(true)),
            Some(Predicate::HasRelated { relation: rel })
        );
    }

    #[test]
    fn test_min_related_count_ignores_non_positive() {
        let rel = Relation::new("enrollments", "program_id");
        assert_eq!(Predicate::min_related_count(rel, None), None);
        assert_eq!(Predicate::min_related_count(rel, Some(0)), None);
        assert_eq!(Predicate::min_related_count(rel, Some(-3)), None);
        assert!(Predicate::min_related_count(rel, Some(5)).is_some());
    }

    #[test]
    fn test_column_reports_constrained_column() {
        assert_eq!(
            Predicate::equals("instructor_id", Some(9i64)).unwrap().column(),
            Some("instructor_id")
        );
        assert_eq!(
            Predicate::search(&["name"], Some("yoga")).unwrap().column(),
            None
        );
    }
}

//! Storage boundary: renders a [`Specification`] into SQL.
//!
//! Column and table names come exclusively from `&'static str` constants in
//! the predicate definitions; every caller-supplied value goes through
//! `push_bind`, so no filter parameter ever reaches the SQL text.

use sqlx::{Postgres, QueryBuilder};

use crate::predicate::{Predicate, Value};
use crate::spec::Specification;

/// Appends a `WHERE` clause for `spec` to `builder`, with all conditions
/// conjoined in specification order. Appends nothing for an empty spec.
///
/// `alias` is the table alias the surrounding query introduced for the
/// filtered table.
pub fn push_where(builder: &mut QueryBuilder<'_, Postgres>, alias: &str, spec: &Specification) {
    if spec.is_empty() {
        return;
    }

    builder.push(" WHERE ");

    for (i, predicate) in spec.predicates().iter().enumerate() {
        if i > 0 {
            builder.push(" AND ");
        }
        push_predicate(builder, alias, predicate);
    }
}

fn push_predicate(builder: &mut QueryBuilder<'_, Postgres>, alias: &str, predicate: &Predicate) {
    match predicate {
        Predicate::Equals { column, value } => {
            builder.push(format!("{alias}.{column} = "));
            push_value(builder, value);
        }
        Predicate::Search { columns, term } => {
            let pattern = format!("%{}%", escape_like(term));
            builder.push("(");
            for (i, column) in columns.iter().enumerate() {
                if i > 0 {
                    builder.push(" OR ");
                }
                builder.push(format!("{alias}.{column} ILIKE "));
                builder.push_bind(pattern.clone());
            }
            builder.push(")");
        }
        Predicate::Range { column, min, max } => {
            builder.push("(");
            if let Some(min) = min {
                builder.push(format!("{alias}.{column} >= "));
                push_value(builder, min);
            }
            if min.is_some() && max.is_some() {
                builder.push(" AND ");
            }
            if let Some(max) = max {
                builder.push(format!("{alias}.{column} <= "));
                push_value(builder, max);
            }
            builder.push(")");
        }
        Predicate::HasRelated { relation } => {
            builder.push(format!(
                "EXISTS (SELECT 1 FROM {table} WHERE {table}.{fk} = {alias}.id)",
                table = relation.table,
                fk = relation.foreign_key,
            ));
        }
        Predicate::MinRelatedCount { relation, min } => {
            builder.push(format!(
                "(SELECT COUNT(*) FROM {table} WHERE {table}.{fk} = {alias}.id) >= ",
                table = relation.table,
                fk = relation.foreign_key,
            ));
            builder.push_bind(*min);
        }
        Predicate::OwnedBy { column, owner_id } => {
            builder.push(format!("{alias}.{column} = "));
            builder.push_bind(*owner_id);
        }
    }
}

fn push_value(builder: &mut QueryBuilder<'_, Postgres>, value: &Value) {
    match value {
        Value::Int(v) => builder.push_bind(*v),
        Value::Float(v) => builder.push_bind(*v),
        Value::Text(v) => builder.push_bind(v.clone()),
        Value::Bool(v) => builder.push_bind(*v),
        Value::Timestamp(v) => builder.push_bind(*v),
    };
}

/// Escapes LIKE metacharacters so a search term matches literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::Relation;

    fn render(spec: &Specification) -> String {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM programs p");
        push_where(&mut builder, "p", spec);
        builder.sql().to_string()
    }

    #[test]
    fn test_empty_spec_adds_no_where_clause() {
        assert_eq!(render(&Specification::any()), "SELECT * FROM programs p");
    }

    #[test]
    fn test_single_equality() {
        let spec = Specification::filters(vec![Predicate::equals_text(
            "difficulty",
            Some("beginner"),
        )]);
        assert_eq!(
            render(&spec),
            "SELECT * FROM programs p WHERE p.difficulty = $1"
        );
    }

    #[test]
    fn test_search_ors_columns_inside_one_conjunct() {
        let spec = Specification::filters(vec![
            Predicate::search(&["name", "description"], Some("yoga")),
            Predicate::range("price", Some(10.0), None::<f64>),
        ]);
        assert_eq!(
            render(&spec),
            "SELECT * FROM programs p WHERE (p.name ILIKE $1 OR p.description ILIKE $2) \
             AND (p.price >= $3)"
        );
    }

    #[test]
    fn test_range_with_both_bounds() {
        let spec = Specification::filters(vec![Predicate::range("price", Some(10.0), Some(50.0))]);
        assert_eq!(
            render(&spec),
            "SELECT * FROM programs p WHERE (p.price >= $1 AND p.price <= $2)"
        );
    }

    #[test]
    fn test_existence_and_count_threshold() {
        let rel = Relation::new("enrollments", "program_id");
        let spec = Specification::filters(vec![
            Predicate::has_related(rel, Some(true)),
            Predicate::min_related_count(rel, Some(5)),
        ]);
        assert_eq!(
            render(&spec),
            "SELECT * FROM programs p WHERE EXISTS (SELECT 1 FROM enrollments \
             WHERE enrollments.program_id = p.id) AND (SELECT COUNT(*) FROM enrollments \
             WHERE enrollments.program_id = p.id) >= $1"
        );
    }

    #[test]
    fn test_owner_scope_renders_as_bound_equality() {
        let spec = Specification::any().also(Predicate::OwnedBy {
            column: "instructor_id",
            owner_id: 42,
        });
        assert_eq!(
            render(&spec),
            "SELECT * FROM programs p WHERE p.instructor_id = $1"
        );
    }

    #[test]
    fn test_like_metacharacters_are_escaped() {
        assert_eq!(escape_like("50%_off\\now"), "50\\%\\_off\\\\now");
    }
}

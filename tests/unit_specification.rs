use sqlx::{Postgres, QueryBuilder};

use pulsefit_auth::{Identity, Role};
use pulsefit_query::{Predicate, Relation, Specification, push_where};

const ENROLLMENTS_OF_PROGRAM: Relation = Relation::new("enrollments", "program_id");

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

fn render(spec: &Specification) -> String {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM programs p");
    push_where(&mut builder, "p", spec);
    builder.sql().to_string()
}

#[test]
fn test_instructor_listing_is_always_scoped() {
    let spec = Specification::compose(
        &instructor(42),
        "instructor_id",
        [
            Predicate::search(&["name", "description"], Some("yoga")),
            Predicate::range("price", Some(10.0), None::<f64>),
        ],
    );

    let sql = render(&spec);
    assert_eq!(
        sql,
        "SELECT * FROM programs p WHERE (p.name ILIKE $1 OR p.description ILIKE $2) \
         AND (p.price >= $3) AND p.instructor_id = $4"
    );
}

#[test]
fn test_no_filters_still_yields_the_scope() {
    let spec = Specification::compose(&instructor(42), "instructor_id", []);

    assert_eq!(
        render(&spec),
        "SELECT * FROM programs p WHERE p.instructor_id = $1"
    );
}

#[test]
fn test_admin_listing_is_unscoped() {
    let spec = Specification::compose(
        &admin(),
        "instructor_id",
        [Predicate::equals("published", Some(true))],
    );

    assert_eq!(
        render(&spec),
        "SELECT * FROM programs p WHERE p.published = $1"
    );
}

#[test]
fn test_admin_with_no_filters_matches_everything() {
    let spec = Specification::compose(&admin(), "instructor_id", []);

    assert!(spec.is_empty());
    assert_eq!(render(&spec), "SELECT * FROM programs p");
}

#[test]
fn test_caller_cannot_override_the_scope_column() {
    // A hostile caller smuggles an equality filter on the scope column,
    // trying to read instructor 7's programs as instructor 42.
    let spec = Specification::compose(
        &instructor(42),
        "instructor_id",
        [Predicate::equals("instructor_id", Some(7i64))],
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
fn test_blank_filters_fall_out_entirely() {
    let spec = Specification::compose(
        &instructor(42),
        "instructor_id",
        [
            Predicate::search(&["name", "description"], Some("   ")),
            Predicate::equals_text("difficulty", Some("")),
            Predicate::range("price", None::<f64>, None::<f64>),
            Predicate::min_related_count(ENROLLMENTS_OF_PROGRAM, Some(0)),
        ],
    );

    assert_eq!(
        render(&spec),
        "SELECT * FROM programs p WHERE p.instructor_id = $1"
    );
}

#[test]
fn test_related_count_renders_a_correlated_subquery() {
    let spec = Specification::compose(
        &instructor(42),
        "instructor_id",
        [Predicate::min_related_count(ENROLLMENTS_OF_PROGRAM, Some(5))],
    );

    assert_eq!(
        render(&spec),
        "SELECT * FROM programs p WHERE \
         (SELECT COUNT(*) FROM enrollments WHERE enrollments.program_id = p.id) >= $1 \
         AND p.instructor_id = $2"
    );
}

#[test]
fn test_catalog_filters_carry_the_published_constraint() {
    let spec = Specification::filters([
        Predicate::search(&["name", "description"], Some("strength")),
        Predicate::equals_text("difficulty", Some("beginner")),
    ])
    .also(Predicate::Equals {
        column: "published",
        value: true.into(),
    });

    assert_eq!(
        render(&spec),
        "SELECT * FROM programs p WHERE (p.name ILIKE $1 OR p.description ILIKE $2) \
         AND p.difficulty = $3 AND p.published = $4"
    );
}

#[test]
fn test_search_terms_escape_like_metacharacters() {
    let spec = Specification::filters([Predicate::search(&["name"], Some("100%_gains"))]);

    // Rendering binds the escaped pattern; the SQL text itself carries only
    // placeholders.
    let sql = render(&spec);
    assert_eq!(sql, "SELECT * FROM programs p WHERE (p.name ILIKE $1)");
}

#[test]
fn test_composition_is_deterministic() {
    let build = || {
        Specification::compose(
            &instructor(42),
            "instructor_id",
            [
                Predicate::equals_text("difficulty", Some("advanced")),
                Predicate::range("price", Some(10.0), Some(50.0)),
            ],
        )
    };

    assert_eq!(build(), build());
    assert_eq!(render(&build()), render(&build()));
}

use pulsefit_auth::Identity;
use pulsefit_core::{AppError, PaginationMeta};
use pulsefit_query::{Predicate, Specification, push_where};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use crate::modules::programs::model::{Lesson, LessonResource, Program, ProgramModule};

use super::model::{
    Enrollment, EnrollmentFilterParams, EnrollmentListResponse, LessonContent, ModuleContent,
    ProgramContent,
};

pub struct EnrollmentService;

impl EnrollmentService {
    /// Enrolls the caller into a published program.
    #[instrument(skip(db))]
    pub async fn enroll(
        db: &PgPool,
        caller: &Identity,
        program_id: i64,
    ) -> Result<Enrollment, AppError> {
        let published: Option<bool> =
            sqlx::query_scalar("SELECT published FROM programs WHERE id = $1")
                .bind(program_id)
                .fetch_optional(db)
                .await?;

        // Unpublished programs read as missing here, same as in the catalog.
        if published != Some(true) {
            return Err(AppError::not_found(format!(
                "Program with id {program_id} not found"
            )));
        }

        let enrollment = sqlx::query_as::<_, Enrollment>(
            "INSERT INTO enrollments (user_id, program_id) \
             VALUES ($1, $2) \
             RETURNING id, user_id, program_id, status, progress, enrolled_at, completed_at",
        )
        .bind(caller.subject_id)
        .bind(program_id)
        .fetch_one(db)
        .await
        .map_err(|err| match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::bad_request("Already enrolled")
            }
            _ => err.into(),
        })?;

        Ok(enrollment)
    }

    /// Lists the caller's enrollments. The composer pins the result to the
    /// caller's own rows; admins can see every enrollment.
    #[instrument(skip(db, params))]
    pub async fn list_enrollments(
        db: &PgPool,
        caller: &Identity,
        params: EnrollmentFilterParams,
    ) -> Result<EnrollmentListResponse, AppError> {
        let spec = Specification::compose(
            caller,
            "user_id",
            [
                Predicate::equals_text("status", params.status.as_deref()),
                Predicate::equals("program_id", params.program_id),
            ],
        );

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM enrollments e");
        push_where(&mut count, "e", &spec);
        let total: i64 = count.build_query_scalar().fetch_one(db).await?;

        let mut query = QueryBuilder::<Postgres>::new(
            "SELECT e.id, e.user_id, e.program_id, e.status, e.progress, e.enrolled_at, \
             e.completed_at FROM enrollments e",
        );
        push_where(&mut query, "e", &spec);
        query.push(" ORDER BY e.enrolled_at DESC, e.id DESC LIMIT ");
        query.push_bind(params.pagination.limit());
        query.push(" OFFSET ");
        query.push_bind(params.pagination.offset());

        let enrollments: Vec<Enrollment> = query.build_query_as().fetch_all(db).await?;

        Ok(EnrollmentListResponse {
            enrollments,
            meta: PaginationMeta::new(
                total,
                params.pagination.limit(),
                params.pagination.offset(),
            ),
        })
    }

    /// Updates completion progress on one of the caller's enrollments.
    ///
    /// Reaching 100 marks the enrollment completed and stamps the time;
    /// dropping back below 100 reopens it.
    #[instrument(skip(db))]
    pub async fn update_progress(
        db: &PgPool,
        caller: &Identity,
        enrollment_id: i64,
        progress: i32,
    ) -> Result<Enrollment, AppError> {
        let owner: Option<i64> =
            sqlx::query_scalar("SELECT user_id FROM enrollments WHERE id = $1")
                .bind(enrollment_id)
                .fetch_optional(db)
                .await?;

        let owner = owner.ok_or_else(|| {
            AppError::not_found(format!("Enrollment with id {enrollment_id} not found"))
        })?;

        if !caller.is_admin() && owner != caller.subject_id {
            return Err(AppError::not_found(format!(
                "Enrollment with id {enrollment_id} not found"
            )));
        }

        let enrollment = sqlx::query_as::<_, Enrollment>(
            "UPDATE enrollments SET \
             progress = $1, \
             status = CASE WHEN $1 >= 100 THEN 'completed' ELSE 'active' END, \
             completed_at = CASE WHEN $1 >= 100 THEN COALESCE(completed_at, NOW()) ELSE NULL END \
             WHERE id = $2 \
             RETURNING id, user_id, program_id, status, progress, enrolled_at, completed_at",
        )
        .bind(progress)
        .bind(enrollment_id)
        .fetch_one(db)
        .await?;

        Ok(enrollment)
    }

    /// Serves the full content tree of a program to its instructor, an
    /// admin, or an enrolled member.
    #[instrument(skip(db))]
    pub async fn program_content(
        db: &PgPool,
        caller: &Identity,
        program_id: i64,
    ) -> Result<ProgramContent, AppError> {
        let program = sqlx::query_as::<_, Program>(
            "SELECT id, instructor_id, name, description, difficulty, price, published, \
             created_at, updated_at FROM programs WHERE id = $1",
        )
        .bind(program_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Program with id {program_id} not found")))?;

        let is_owner = caller.subject_id == program.instructor_id;

        if !caller.is_admin() && !is_owner {
            if !program.published {
                return Err(AppError::not_found(format!(
                    "Program with id {program_id} not found"
                )));
            }

            let enrolled: Option<(i64,)> = sqlx::query_as(
                "SELECT id FROM enrollments WHERE user_id = $1 AND program_id = $2",
            )
            .bind(caller.subject_id)
            .bind(program_id)
            .fetch_optional(db)
            .await?;

            if enrolled.is_none() {
                return Err(AppError::forbidden("Access denied"));
            }
        }

        let modules = sqlx::query_as::<_, ProgramModule>(
            "SELECT id, program_id, name, position FROM program_modules \
             WHERE program_id = $1 ORDER BY position, id",
        )
        .bind(program_id)
        .fetch_all(db)
        .await?;

        let lessons = sqlx::query_as::<_, Lesson>(
            "SELECT l.id, l.module_id, l.name, l.video_url, l.duration_minutes, l.position \
             FROM lessons l \
             JOIN program_modules m ON m.id = l.module_id \
             WHERE m.program_id = $1 ORDER BY l.position, l.id",
        )
        .bind(program_id)
        .fetch_all(db)
        .await?;

        let resources = sqlx::query_as::<_, LessonResource>(
            "SELECT r.id, r.lesson_id, r.name, r.url \
             FROM lesson_resources r \
             JOIN lessons l ON l.id = r.lesson_id \
             JOIN program_modules m ON m.id = l.module_id \
             WHERE m.program_id = $1 ORDER BY r.id",
        )
        .bind(program_id)
        .fetch_all(db)
        .await?;

        Ok(assemble_content(program, modules, lessons, resources))
    }
}

/// Groups the flat rows into the nested module/lesson/resource tree. Rows
/// arrive in display order and grouping preserves it.
fn assemble_content(
    program: Program,
    modules: Vec<ProgramModule>,
    lessons: Vec<Lesson>,
    resources: Vec<LessonResource>,
) -> ProgramContent {
    let mut resources_by_lesson: std::collections::HashMap<i64, Vec<LessonResource>> =
        std::collections::HashMap::new();
    for resource in resources {
        resources_by_lesson
            .entry(resource.lesson_id)
            .or_default()
            .push(resource);
    }

    let mut lessons_by_module: std::collections::HashMap<i64, Vec<LessonContent>> =
        std::collections::HashMap::new();
    for lesson in lessons {
        let resources = resources_by_lesson.remove(&lesson.id).unwrap_or_default();
        lessons_by_module
            .entry(lesson.module_id)
            .or_default()
            .push(LessonContent { lesson, resources });
    }

    let modules = modules
        .into_iter()
        .map(|module| {
            let lessons = lessons_by_module.remove(&module.id).unwrap_or_default();
            ModuleContent { module, lessons }
        })
        .collect();

    ProgramContent { program, modules }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn program() -> Program {
        Program {
            id: 1,
            instructor_id: 7,
            name: "Strength Foundations".to_string(),
            description: "Twelve weeks of progressive overload".to_string(),
            difficulty: "beginner".to_string(),
            price: 49.0,
            published: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn module(id: i64, position: i32) -> ProgramModule {
        ProgramModule {
            id,
            program_id: 1,
            name: format!("Week {position}"),
            position,
        }
    }

    fn lesson(id: i64, module_id: i64, position: i32) -> Lesson {
        Lesson {
            id,
            module_id,
            name: format!("Session {position}"),
            video_url: None,
            duration_minutes: Some(30),
            position,
        }
    }

    fn resource(id: i64, lesson_id: i64) -> LessonResource {
        LessonResource {
            id,
            lesson_id,
            name: "Workout sheet".to_string(),
            url: "https://cdn.example.com/sheet.pdf".to_string(),
        }
    }

    #[test]
    fn test_assemble_content_nests_rows_under_their_parents() {
        let content = assemble_content(
            program(),
            vec![module(10, 1), module(11, 2)],
            vec![lesson(100, 10, 1), lesson(101, 10, 2), lesson(102, 11, 1)],
            vec![resource(1000, 100), resource(1001, 102)],
        );

        assert_eq!(content.modules.len(), 2);
        assert_eq!(content.modules[0].lessons.len(), 2);
        assert_eq!(content.modules[1].lessons.len(), 1);
        assert_eq!(content.modules[0].lessons[0].resources.len(), 1);
        assert_eq!(content.modules[0].lessons[1].resources.len(), 0);
        assert_eq!(content.modules[1].lessons[0].resources[0].id, 1001);
    }

    #[test]
    fn test_assemble_content_keeps_row_order() {
        let content = assemble_content(
            program(),
            vec![module(10, 1), module(11, 2)],
            vec![lesson(100, 10, 1), lesson(101, 10, 2)],
            vec![],
        );

        assert_eq!(content.modules[0].module.id, 10);
        assert_eq!(content.modules[0].lessons[0].lesson.id, 100);
        assert_eq!(content.modules[0].lessons[1].lesson.id, 101);
        assert!(content.modules[1].lessons.is_empty());
    }

    #[test]
    fn test_assemble_content_empty_program() {
        let content = assemble_content(program(), vec![], vec![], vec![]);
        assert!(content.modules.is_empty());
    }
}

use pulsefit_auth::Identity;
use pulsefit_core::{AppError, PaginationMeta, PaginationParams};
use pulsefit_query::{Predicate, Relation, Specification, Value, push_where};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use super::model::{
    CatalogFilterParams, CreateLessonDto, CreateModuleDto, CreateProgramDto, CreateResourceDto,
    CreateReviewDto, DIFFICULTIES, InstructorFilterParams, Lesson, LessonResource, Program,
    ProgramListResponse, ProgramModule, Review, UpdateProgramDto,
};

fn check_difficulty(value: &str) -> Result<(), AppError> {
    if DIFFICULTIES.contains(&value) {
        Ok(())
    } else {
        Err(AppError::unprocessable(
            "difficulty must be one of beginner, intermediate, advanced",
        ))
    }
}

const ENROLLMENTS_OF_PROGRAM: Relation = Relation::new("enrollments", "program_id");

pub struct ProgramService;

impl ProgramService {
    /// Lists published programs for the public catalog.
    ///
    /// Caller filters are conjoined with a fixed published-only constraint,
    /// so an unpublished program never appears regardless of parameters.
    #[instrument(skip(db, params))]
    pub async fn list_catalog(
        db: &PgPool,
        params: CatalogFilterParams,
    ) -> Result<ProgramListResponse, AppError> {
        let spec = Specification::filters([
            Predicate::search(&["name", "description"], params.search.as_deref()),
            Predicate::equals_text("difficulty", params.difficulty.as_deref()),
            Predicate::range("price", params.min_price, params.max_price),
        ])
        .also(Predicate::Equals {
            column: "published",
            value: Value::Bool(true),
        });

        Self::page(db, &spec, &params.pagination).await
    }

    /// Lists programs on the instructor surface, scoped to the caller's own
    /// programs unless the caller is an admin.
    #[instrument(skip(db, params))]
    pub async fn list_instructor_programs(
        db: &PgPool,
        caller: &Identity,
        params: InstructorFilterParams,
    ) -> Result<ProgramListResponse, AppError> {
        let spec = Specification::compose(
            caller,
            "instructor_id",
            [
                Predicate::search(&["name", "description"], params.search.as_deref()),
                Predicate::equals_text("difficulty", params.difficulty.as_deref()),
                Predicate::range("price", params.min_price, params.max_price),
                Predicate::equals("published", params.published),
                Predicate::min_related_count(ENROLLMENTS_OF_PROGRAM, params.min_enrollments),
            ],
        );

        Self::page(db, &spec, &params.pagination).await
    }

    async fn page(
        db: &PgPool,
        spec: &Specification,
        pagination: &PaginationParams,
    ) -> Result<ProgramListResponse, AppError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM programs p");
        push_where(&mut count, "p", spec);
        let total: i64 = count.build_query_scalar().fetch_one(db).await?;

        let mut query = QueryBuilder::<Postgres>::new(
            "SELECT p.id, p.instructor_id, p.name, p.description, p.difficulty, p.price, \
             p.published, p.created_at, p.updated_at FROM programs p",
        );
        push_where(&mut query, "p", spec);
        query.push(" ORDER BY p.created_at DESC, p.id DESC LIMIT ");
        query.push_bind(pagination.limit());
        query.push(" OFFSET ");
        query.push_bind(pagination.offset());

        let programs: Vec<Program> = query.build_query_as().fetch_all(db).await?;

        Ok(ProgramListResponse {
            programs,
            meta: PaginationMeta::new(total, pagination.limit(), pagination.offset()),
        })
    }

    /// Fetches a single program. Unpublished programs are visible only to
    /// their instructor and to admins; everyone else gets a 404 so drafts
    /// do not leak their existence.
    #[instrument(skip(db, viewer))]
    pub async fn get_program(
        db: &PgPool,
        id: i64,
        viewer: Option<&Identity>,
    ) -> Result<Program, AppError> {
        let program = Self::fetch_program(db, id).await?;

        if !program.published {
            let can_view = viewer
                .is_some_and(|v| v.is_admin() || v.subject_id == program.instructor_id);
            if !can_view {
                return Err(AppError::not_found(format!("Program with id {id} not found")));
            }
        }

        Ok(program)
    }

    #[instrument(skip(db, dto))]
    pub async fn create_program(
        db: &PgPool,
        caller: &Identity,
        dto: CreateProgramDto,
    ) -> Result<Program, AppError> {
        check_difficulty(&dto.difficulty)?;

        let program = sqlx::query_as::<_, Program>(
            "INSERT INTO programs (instructor_id, name, description, difficulty, price) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, instructor_id, name, description, difficulty, price, published, \
             created_at, updated_at",
        )
        .bind(caller.subject_id)
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(&dto.difficulty)
        .bind(dto.price)
        .fetch_one(db)
        .await?;

        Ok(program)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_program(
        db: &PgPool,
        caller: &Identity,
        id: i64,
        dto: UpdateProgramDto,
    ) -> Result<Program, AppError> {
        if let Some(difficulty) = dto.difficulty.as_deref() {
            check_difficulty(difficulty)?;
        }

        Self::ensure_program_owner(db, caller, id).await?;

        let program = sqlx::query_as::<_, Program>(
            "UPDATE programs SET \
             name = COALESCE($1, name), \
             description = COALESCE($2, description), \
             difficulty = COALESCE($3, difficulty), \
             price = COALESCE($4, price), \
             published = COALESCE($5, published), \
             updated_at = NOW() \
             WHERE id = $6 \
             RETURNING id, instructor_id, name, description, difficulty, price, published, \
             created_at, updated_at",
        )
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(&dto.difficulty)
        .bind(dto.price)
        .bind(dto.published)
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(program)
    }

    #[instrument(skip(db))]
    pub async fn delete_program(db: &PgPool, caller: &Identity, id: i64) -> Result<(), AppError> {
        Self::ensure_program_owner(db, caller, id).await?;

        sqlx::query("DELETE FROM programs WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn list_reviews(
        db: &PgPool,
        program_id: i64,
        pagination: PaginationParams,
    ) -> Result<Vec<Review>, AppError> {
        // The program must be publicly visible for its reviews to be.
        Self::get_program(db, program_id, None).await?;

        let reviews = sqlx::query_as::<_, Review>(
            "SELECT id, program_id, user_id, rating, comment, created_at \
             FROM reviews WHERE program_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3",
        )
        .bind(program_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(reviews)
    }

    /// Creates a review. Only enrolled users may review a program, and each
    /// user reviews a program at most once.
    #[instrument(skip(db, dto))]
    pub async fn create_review(
        db: &PgPool,
        caller: &Identity,
        program_id: i64,
        dto: CreateReviewDto,
    ) -> Result<Review, AppError> {
        Self::get_program(db, program_id, Some(caller)).await?;

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

        let review = sqlx::query_as::<_, Review>(
            "INSERT INTO reviews (program_id, user_id, rating, comment) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, program_id, user_id, rating, comment, created_at",
        )
        .bind(program_id)
        .bind(caller.subject_id)
        .bind(dto.rating)
        .bind(&dto.comment)
        .fetch_one(db)
        .await
        .map_err(|err| match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::bad_request("Program already reviewed")
            }
            _ => err.into(),
        })?;

        Ok(review)
    }

    #[instrument(skip(db, dto))]
    pub async fn create_module(
        db: &PgPool,
        caller: &Identity,
        program_id: i64,
        dto: CreateModuleDto,
    ) -> Result<ProgramModule, AppError> {
        Self::ensure_program_owner(db, caller, program_id).await?;

        let module = sqlx::query_as::<_, ProgramModule>(
            "INSERT INTO program_modules (program_id, name, position) \
             VALUES ($1, $2, $3) \
             RETURNING id, program_id, name, position",
        )
        .bind(program_id)
        .bind(&dto.name)
        .bind(dto.position)
        .fetch_one(db)
        .await?;

        Ok(module)
    }

    #[instrument(skip(db))]
    pub async fn list_modules(
        db: &PgPool,
        caller: &Identity,
        program_id: i64,
    ) -> Result<Vec<ProgramModule>, AppError> {
        Self::ensure_program_owner(db, caller, program_id).await?;

        let modules = sqlx::query_as::<_, ProgramModule>(
            "SELECT id, program_id, name, position FROM program_modules \
             WHERE program_id = $1 ORDER BY position, id",
        )
        .bind(program_id)
        .fetch_all(db)
        .await?;

        Ok(modules)
    }

    #[instrument(skip(db, dto))]
    pub async fn create_lesson(
        db: &PgPool,
        caller: &Identity,
        module_id: i64,
        dto: CreateLessonDto,
    ) -> Result<Lesson, AppError> {
        let program_id: i64 = sqlx::query_scalar(
            "SELECT program_id FROM program_modules WHERE id = $1",
        )
        .bind(module_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Module with id {module_id} not found")))?;

        Self::ensure_program_owner(db, caller, program_id).await?;

        let lesson = sqlx::query_as::<_, Lesson>(
            "INSERT INTO lessons (module_id, name, video_url, duration_minutes, position) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, module_id, name, video_url, duration_minutes, position",
        )
        .bind(module_id)
        .bind(&dto.name)
        .bind(&dto.video_url)
        .bind(dto.duration_minutes)
        .bind(dto.position)
        .fetch_one(db)
        .await?;

        Ok(lesson)
    }

    #[instrument(skip(db, dto))]
    pub async fn create_resource(
        db: &PgPool,
        caller: &Identity,
        lesson_id: i64,
        dto: CreateResourceDto,
    ) -> Result<LessonResource, AppError> {
        let program_id: i64 = sqlx::query_scalar(
            "SELECT m.program_id FROM lessons l \
             JOIN program_modules m ON m.id = l.module_id WHERE l.id = $1",
        )
        .bind(lesson_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Lesson with id {lesson_id} not found")))?;

        Self::ensure_program_owner(db, caller, program_id).await?;

        let resource = sqlx::query_as::<_, LessonResource>(
            "INSERT INTO lesson_resources (lesson_id, name, url) \
             VALUES ($1, $2, $3) \
             RETURNING id, lesson_id, name, url",
        )
        .bind(lesson_id)
        .bind(&dto.name)
        .bind(&dto.url)
        .fetch_one(db)
        .await?;

        Ok(resource)
    }

    async fn fetch_program(db: &PgPool, id: i64) -> Result<Program, AppError> {
        sqlx::query_as::<_, Program>(
            "SELECT id, instructor_id, name, description, difficulty, price, published, \
             created_at, updated_at FROM programs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Program with id {id} not found")))
    }

    /// A program is reported as missing, not forbidden, to callers who do
    /// not own it. The instructor surface never confirms other instructors'
    /// program ids.
    async fn ensure_program_owner(
        db: &PgPool,
        caller: &Identity,
        program_id: i64,
    ) -> Result<(), AppError> {
        let program = Self::fetch_program(db, program_id).await?;

        if !caller.is_admin() && program.instructor_id != caller.subject_id {
            return Err(AppError::not_found(format!(
                "Program with id {program_id} not found"
            )));
        }

        Ok(())
    }
}

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use pulsefit_auth::Role;
use pulsefit_core::PaginationMeta;

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, RegisterRequestDto,
};
use crate::modules::enrollments::model::{
    CreateEnrollmentDto, Enrollment, EnrollmentListResponse, LessonContent, ModuleContent,
    ProgramContent, UpdateProgressDto,
};
use crate::modules::programs::model::{
    CreateLessonDto, CreateModuleDto, CreateProgramDto, CreateResourceDto, CreateReviewDto,
    Lesson, LessonResource, Program, ProgramListResponse, ProgramModule, Review, UpdateProgramDto,
};
use crate::modules::users::model::{CreateUserDto, User, UserListResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::refresh_token,
        crate::modules::auth::controller::get_profile,
        crate::modules::users::controller::list_users,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::verify_user,
        crate::modules::users::controller::delete_user,
        crate::modules::programs::controller::list_catalog,
        crate::modules::programs::controller::get_program,
        crate::modules::programs::controller::list_reviews,
        crate::modules::programs::controller::create_review,
        crate::modules::programs::controller::list_instructor_programs,
        crate::modules::programs::controller::create_program,
        crate::modules::programs::controller::update_program,
        crate::modules::programs::controller::delete_program,
        crate::modules::programs::controller::list_modules,
        crate::modules::programs::controller::create_module,
        crate::modules::programs::controller::create_lesson,
        crate::modules::programs::controller::create_resource,
        crate::modules::enrollments::controller::enroll,
        crate::modules::enrollments::controller::list_enrollments,
        crate::modules::enrollments::controller::update_progress,
        crate::modules::enrollments::controller::program_content,
    ),
    components(
        schemas(
            ErrorResponse,
            RegisterRequestDto,
            LoginRequest,
            LoginResponse,
            RefreshRequest,
            RefreshResponse,
            User,
            Role,
            CreateUserDto,
            UserListResponse,
            Program,
            CreateProgramDto,
            UpdateProgramDto,
            ProgramListResponse,
            Review,
            CreateReviewDto,
            ProgramModule,
            CreateModuleDto,
            Lesson,
            CreateLessonDto,
            LessonResource,
            CreateResourceDto,
            Enrollment,
            CreateEnrollmentDto,
            UpdateProgressDto,
            EnrollmentListResponse,
            ProgramContent,
            ModuleContent,
            LessonContent,
            PaginationMeta,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login and token refresh"),
        (name = "Programs", description = "Public program catalog and reviews"),
        (name = "Instructor", description = "Program authoring for instructors"),
        (name = "My", description = "The caller's enrollments and content"),
        (name = "Users", description = "User administration"),
    ),
    info(
        title = "PulseFit API",
        description = "Fitness e-learning platform API",
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

//! The route access-control table.
//!
//! Every route's authorization requirement is declared here, in one ordered
//! table consumed by the request gate; routers themselves carry no auth
//! glue. Anything the table does not cover resolves to `Authenticated`, so
//! forgetting a route here locks it down rather than opening it up.

use axum::http::Method;
use pulsefit_auth::{AccessMatrix, AccessRule, Role};

pub fn access_rules() -> Vec<AccessRule> {
    vec![
        // Liveness and API docs
        AccessRule::public("/health"),
        AccessRule::public("/swagger-ui/**"),
        AccessRule::public("/api-docs/**"),
        // Authentication flows
        AccessRule::public("/api/auth/register"),
        AccessRule::public("/api/auth/login"),
        AccessRule::public("/api/auth/refresh"),
        AccessRule::authenticated("/api/auth/me"),
        // Public catalog reads; review submission on the same prefix needs
        // an authenticated caller
        AccessRule::public_for(Method::GET, "/api/programs/**"),
        AccessRule::authenticated_for(Method::POST, "/api/programs/**"),
        // The caller's own enrollments and learning content
        AccessRule::authenticated("/api/my/**"),
        // Content authoring
        AccessRule::roles("/api/instructor/**", vec![Role::Instructor, Role::Admin]),
        // User administration
        AccessRule::roles("/api/users/**", vec![Role::Admin]),
    ]
}

pub fn init_access_matrix() -> AccessMatrix {
    AccessMatrix::new(access_rules())
}

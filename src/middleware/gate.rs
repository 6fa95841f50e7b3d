//! The request gate.
//!
//! Runs exactly once per inbound request, ahead of every handler:
//!
//! 1. extract the bearer token, if any (absence alone is not fatal;
//!    public routes accept anonymous callers);
//! 2. verify the token when present; on a public route a failed
//!    verification degrades to an anonymous request instead of rejecting;
//! 3. resolve the route's requirement from the access matrix and authorize:
//!    401 when no identity is present, 403 when one is present but lacks
//!    the required role or account verification;
//! 4. attach the identity to the request extensions and forward.
//!
//! Rejections carry deliberately uniform messages. Which verification check
//! failed (expired vs malformed vs bad signature) appears only in logs, so
//! the API is not an oracle for credential probing.

use axum::{
    extract::{Request, State},
    http::{Method, header},
    middleware::Next,
    response::Response,
};
use pulsefit_auth::{Identity, Requirement, authenticate};
use pulsefit_core::AppError;
use tracing::{debug, warn};

use crate::state::AppState;

const AUTH_REQUIRED: &str = "Authentication required";
const ACCESS_DENIED: &str = "Access denied";

pub async fn request_gate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let requirement = state.access_matrix.resolve(&method, &path);

    let identity = match bearer_token(&req) {
        Some(token) => match authenticate(token, &state.jwt_config) {
            Ok(identity) => Some(identity),
            Err(err) if matches!(requirement, Requirement::Public) => {
                debug!(
                    %method,
                    path,
                    error = %err,
                    "ignoring invalid credential on public route"
                );
                None
            }
            Err(err) => {
                warn!(%method, path, error = %err, "rejected invalid credential");
                return Err(AppError::unauthorized(AUTH_REQUIRED));
            }
        },
        None => None,
    };

    authorize(&requirement, identity.as_ref(), &method, &path)?;

    if let Some(identity) = identity {
        req.extensions_mut().insert(identity);
    }

    Ok(next.run(req).await)
}

fn authorize(
    requirement: &Requirement,
    identity: Option<&Identity>,
    method: &Method,
    path: &str,
) -> Result<(), AppError> {
    match requirement {
        Requirement::Public => Ok(()),
        Requirement::Authenticated => {
            let identity = identity.ok_or_else(|| AppError::unauthorized(AUTH_REQUIRED))?;
            require_verified(identity, method, path)
        }
        Requirement::Roles(required) => {
            let identity = identity.ok_or_else(|| AppError::unauthorized(AUTH_REQUIRED))?;
            require_verified(identity, method, path)?;

            if !identity.role.satisfies(required) {
                warn!(
                    subject_id = identity.subject_id,
                    role = identity.role.as_str(),
                    %method,
                    path,
                    "rejected caller lacking required role"
                );
                return Err(AppError::forbidden(ACCESS_DENIED));
            }

            Ok(())
        }
    }
}

fn require_verified(identity: &Identity, method: &Method, path: &str) -> Result<(), AppError> {
    if !identity.verified {
        warn!(
            subject_id = identity.subject_id,
            %method,
            path,
            "rejected caller with unverified account"
        );
        return Err(AppError::forbidden(ACCESS_DENIED));
    }

    Ok(())
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

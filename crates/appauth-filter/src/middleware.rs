//! Bearer JWT middleware.

use crate::jwt::{JwtError, JwtService};
use appauth_types::JwtValidation;
use axum::{
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, warn};

const MISSING_JWT: &str = "Missing JWT";
const INVALID_JWT: &str = "Invalid JWT";
const UNEXPECTED_ERROR: &str = "Unexpected error, please contact the system administrator";

/// Validated user, stored in request extensions.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser(pub JwtValidation);

/// State for [`auth_filter`].
#[derive(Clone)]
pub struct AuthFilter {
    service: Arc<dyn JwtService>,
    excluded_paths: Arc<HashSet<String>>,
}

impl AuthFilter {
    pub fn new(service: Arc<dyn JwtService>) -> Self {
        Self {
            service,
            excluded_paths: Arc::new(HashSet::new()),
        }
    }

    /// Lets requests for exactly `path` through without a JWT.
    pub fn exclude_path(mut self, path: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.excluded_paths).insert(path.into());
        self
    }

    fn skips(&self, req: &Request) -> bool {
        req.method() == Method::OPTIONS || self.excluded_paths.contains(req.uri().path())
    }
}

/// Middleware requiring `Authorization: Bearer <jwt>`.
///
/// Install with `axum::middleware::from_fn_with_state(filter, auth_filter)`.
/// Failures answer with a JSON body `{"info": ...}`: 401 for a missing or
/// invalid token, 500 when the JWT service itself fails.
pub async fn auth_filter(
    State(filter): State<AuthFilter>,
    mut req: Request,
    next: Next,
) -> Response {
    if filter.skips(&req) {
        debug!(method = %req.method(), path = req.uri().path(), "authentication skipped");
        return next.run(req).await;
    }

    let Some(jwt) = bearer_token(&req) else {
        debug!(path = req.uri().path(), "request without bearer token");
        return reject(StatusCode::UNAUTHORIZED, MISSING_JWT);
    };

    match filter.service.parse_jwt_payload(&jwt).await {
        Ok(payload) => {
            debug!(user_id = %payload.user_id, "request authenticated");
            req.extensions_mut().insert(AuthenticatedUser(payload));
            next.run(req).await
        }
        Err(JwtError::Invalid(reason)) => {
            warn!(path = req.uri().path(), %reason, "rejected invalid jwt");
            reject(StatusCode::UNAUTHORIZED, INVALID_JWT)
        }
        Err(e @ JwtError::Unexpected(_)) => {
            error!(path = req.uri().path(), error = %e, "jwt validation failed");
            reject(StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_ERROR)
        }
    }
}

fn bearer_token(req: &Request) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn reject(status: StatusCode, info: &str) -> Response {
    (status, Json(json!({ "info": info }))).into_response()
}

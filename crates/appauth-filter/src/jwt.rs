use appauth_api::AuthApi;
use appauth_types::{CollaboratorError, JwtValidation};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtError {
    /// The token was refused or could not be parsed.
    #[error("invalid jwt: {0}")]
    Invalid(String),

    #[error("jwt service failed: {0}")]
    Unexpected(String),
}

#[async_trait]
pub trait JwtService: Send + Sync {
    /// Validates `jwt` and returns the user it was issued for.
    async fn parse_jwt_payload(&self, jwt: &str) -> Result<JwtValidation, JwtError>;
}

/// Validates user JWTs against the authentication backend.
#[derive(Clone)]
pub struct BackendJwtService {
    api: Arc<dyn AuthApi>,
}

impl BackendJwtService {
    pub fn new(api: Arc<dyn AuthApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl JwtService for BackendJwtService {
    async fn parse_jwt_payload(&self, jwt: &str) -> Result<JwtValidation, JwtError> {
        self.api.validate_jwt(jwt).await.map_err(classify)
    }
}

/// A 4xx from the backend is a verdict on the token; anything else is ours.
fn classify(err: CollaboratorError) -> JwtError {
    match &err {
        CollaboratorError::Rejected { status, .. } if (400..500).contains(status) => {
            JwtError::Invalid(err.to_string())
        }
        _ => JwtError::Unexpected(err.to_string()),
    }
}

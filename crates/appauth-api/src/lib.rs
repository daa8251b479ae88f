//! Client for the application authentication backend.
//!
//! Authenticating an app is a circle of trust between three parties: the
//! backend issues an app token (`tokenA`), the platform issues its own token
//! (`tokenS`) when the app registers with `tokenA`, and the backend then
//! checks that the pair belongs together. Once the app is trusted, user JWTs
//! handed out by the platform are validated by the backend to obtain the
//! user id.

pub mod config;
pub mod http;

pub use config::AuthConfig;
pub use http::HttpAuthApi;

use appauth_types::{AppConfig, AppData, AppTokens, CollaboratorError, JwtValidation, SymphonyToken};
use async_trait::async_trait;

#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Asks the backend for an app token.
    async fn authenticate_app(&self, app_id: &str) -> Result<AppTokens, CollaboratorError>;

    /// Registers the app with the platform, presenting the backend's token.
    async fn register_application(
        &self,
        config: &AppConfig,
        app_data: &AppData,
    ) -> Result<SymphonyToken, CollaboratorError>;

    /// Has the backend confirm that `token_a` and `token_s` belong to `app_id`.
    async fn validate_tokens(
        &self,
        token_a: &str,
        token_s: &str,
        app_id: &str,
    ) -> Result<serde_json::Value, CollaboratorError>;

    /// Validates a user JWT and returns the user it was issued for.
    async fn validate_jwt(&self, jwt: &str) -> Result<JwtValidation, CollaboratorError>;
}

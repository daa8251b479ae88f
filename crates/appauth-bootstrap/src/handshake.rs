//! The application authentication handshake.
//!
//! Each step consumes the stage produced by the previous one and returns the
//! next, so a step can only run once everything it depends on exists:
//!
//! ```text
//! hello -> Greeted -> AppAuthenticated -> Registered -> TokensValidated
//!       -> JwtAcquired -> JwtValidated -> UserInfo (cached)
//! ```

use crate::error::BootstrapError;
use appauth_api::AuthApi;
use appauth_cache::UserCache;
use appauth_platform::PlatformGateway;
use appauth_types::{
    AppConfig, AppData, AppTokens, CollaboratorError, HelloResponse, UserId, UserInfo,
    EXTENDED_USER_INFO_SERVICE,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, info_span, Instrument};

/// Drives applications through the handshake against injected collaborators.
///
/// Cheap to clone; clones share the collaborators. Runs are independent of
/// each other, including two runs for the same app.
#[derive(Clone)]
pub struct Bootstrapper {
    platform: Arc<dyn PlatformGateway>,
    auth: Arc<dyn AuthApi>,
    cache: Arc<dyn UserCache>,
}

impl Bootstrapper {
    pub fn new(
        platform: Arc<dyn PlatformGateway>,
        auth: Arc<dyn AuthApi>,
        cache: Arc<dyn UserCache>,
    ) -> Self {
        Self {
            platform,
            auth,
            cache,
        }
    }

    /// Authenticates `config.app_id` and caches the current user's identity.
    ///
    /// A failure at any step stops the run; nothing is retried and nothing is
    /// written to the cache. Exactly one error is logged per failed run.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when the app id is blank (no collaborator is called),
    /// `Registration` for any collaborator failure.
    pub async fn init_app(&self, config: &AppConfig) -> Result<UserInfo, BootstrapError> {
        if config.app_id.trim().is_empty() {
            let err = BootstrapError::InvalidConfig("app_id must not be empty".to_string());
            error!(error = %err, "refusing to register application");
            return Err(err);
        }

        let span = info_span!("init_app", app_id = %config.app_id);
        async {
            self.platform.register_service(&config.controller_service());

            match self.run(config).await {
                Ok(user_info) => {
                    info!(user_id = %user_info.user_id, "application registered");
                    Ok(user_info)
                }
                Err(source) => {
                    error!(
                        app_id = %config.app_id,
                        error = %source,
                        "failed to register application {}",
                        config.app_id
                    );
                    Err(BootstrapError::Registration {
                        app_id: config.app_id.clone(),
                        source,
                    })
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Runs [`init_app`](Self::init_app) on the tokio runtime.
    ///
    /// Dropping the handle leaves the run going; its only effects are then
    /// the cache write or the error log.
    pub fn spawn_init_app(&self, config: AppConfig) -> JoinHandle<Result<UserInfo, BootstrapError>> {
        let bootstrapper = self.clone();
        tokio::spawn(async move { bootstrapper.init_app(&config).await })
    }

    async fn run(&self, config: &AppConfig) -> Result<UserInfo, CollaboratorError> {
        let greeted = Greeted::hello(self.platform.as_ref()).await?;
        let authenticated = greeted.authenticate(self.auth.as_ref(), config).await?;
        let registered = authenticated.register(self.auth.as_ref(), config).await?;
        let validated = registered.validate(self.auth.as_ref(), config).await?;
        let acquired = validated.acquire_jwt(self.platform.as_ref()).await?;
        let jwt_validated = acquired.validate(self.auth.as_ref()).await?;
        jwt_validated.cache(self.cache.as_ref())
    }
}

struct Greeted {
    hello: HelloResponse,
}

impl Greeted {
    async fn hello(platform: &dyn PlatformGateway) -> Result<Self, CollaboratorError> {
        let hello = platform.hello().await?;
        debug!("platform hello completed");
        Ok(Self { hello })
    }

    async fn authenticate(
        self,
        auth: &dyn AuthApi,
        config: &AppConfig,
    ) -> Result<AppAuthenticated, CollaboratorError> {
        let tokens = auth.authenticate_app(&config.app_id).await?;
        debug!(hello = %self.hello.0, "application authenticated");
        Ok(AppAuthenticated { tokens })
    }
}

struct AppAuthenticated {
    tokens: AppTokens,
}

impl AppAuthenticated {
    async fn register(
        self,
        auth: &dyn AuthApi,
        config: &AppConfig,
    ) -> Result<Registered, CollaboratorError> {
        let app_data = AppData {
            app_id: config.app_id.clone(),
            token_a: self.tokens.app_token,
        };
        let symphony_token = auth.register_application(config, &app_data).await?;
        debug!("application registered with platform");
        Ok(Registered {
            token_a: app_data.token_a,
            token_s: symphony_token.token_s,
        })
    }
}

struct Registered {
    token_a: String,
    token_s: String,
}

impl Registered {
    async fn validate(
        self,
        auth: &dyn AuthApi,
        config: &AppConfig,
    ) -> Result<TokensValidated, CollaboratorError> {
        auth.validate_tokens(&self.token_a, &self.token_s, &config.app_id)
            .await?;
        debug!("app tokens validated");
        Ok(TokensValidated)
    }
}

struct TokensValidated;

impl TokensValidated {
    async fn acquire_jwt(
        self,
        platform: &dyn PlatformGateway,
    ) -> Result<JwtAcquired, CollaboratorError> {
        let service = platform.subscribe(EXTENDED_USER_INFO_SERVICE)?;
        let jwt = service.get_jwt().await?;
        debug!("user jwt acquired");
        Ok(JwtAcquired { jwt })
    }
}

struct JwtAcquired {
    jwt: String,
}

impl JwtAcquired {
    async fn validate(self, auth: &dyn AuthApi) -> Result<JwtValidated, CollaboratorError> {
        let validation = auth.validate_jwt(&self.jwt).await?;
        debug!(user_id = %validation.user_id, "user jwt validated");
        Ok(JwtValidated {
            jwt: self.jwt,
            user_id: validation.user_id,
        })
    }
}

struct JwtValidated {
    jwt: String,
    user_id: UserId,
}

impl JwtValidated {
    fn cache(self, cache: &dyn UserCache) -> Result<UserInfo, CollaboratorError> {
        let user_info = UserInfo {
            jwt: self.jwt,
            user_id: self.user_id,
        };
        cache.cache_user_info(&user_info)?;
        Ok(user_info)
    }
}

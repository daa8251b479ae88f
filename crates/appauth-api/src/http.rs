use crate::config::AuthConfig;
use crate::AuthApi;
use appauth_types::{
    AppConfig, AppData, AppTokens, CollaboratorError, JwtValidation, SymphonyToken, UserId,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

const AUTHENTICATE_PATH: &str = "/v1/application/authenticate";
const VALIDATE_TOKENS_PATH: &str = "/v1/application/tokens/validate";
const VALIDATE_JWT_PATH: &str = "/v1/application/jwt/validate";
const REGISTER_PATH: &str = "/application/register";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthenticateRequest<'a> {
    app_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest<'a> {
    app_id: &'a str,
    token_a: &'a str,
    dependencies: &'a [String],
    exported_services: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateTokensRequest<'a> {
    app_id: &'a str,
    app_token: &'a str,
    symphony_token: &'a str,
}

/// `AuthApi` over HTTP.
///
/// Token and JWT validation go to the authentication backend. Registration is
/// carried out by the host client, so it is sent to the platform bridge.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    base_url: String,
    registration_base_url: String,
    client: reqwest::Client,
}

impl HttpAuthApi {
    pub fn new(
        config: &AuthConfig,
        registration_base_url: impl Into<String>,
    ) -> Result<Self, CollaboratorError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(transport)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            registration_base_url: registration_base_url
                .into()
                .trim_end_matches('/')
                .to_string(),
            client,
        })
    }

    async fn post_json<B, T>(&self, url: String, body: &B) -> Result<T, CollaboratorError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        let text = success_body(response).await?;
        serde_json::from_str(&text).map_err(|e| CollaboratorError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn authenticate_app(&self, app_id: &str) -> Result<AppTokens, CollaboratorError> {
        debug!(app_id, "authenticating application");
        self.post_json(
            format!("{}{}", self.base_url, AUTHENTICATE_PATH),
            &AuthenticateRequest { app_id },
        )
        .await
    }

    async fn register_application(
        &self,
        config: &AppConfig,
        app_data: &AppData,
    ) -> Result<SymphonyToken, CollaboratorError> {
        debug!(app_id = %app_data.app_id, "registering application");
        let request = RegisterRequest {
            app_id: &app_data.app_id,
            token_a: &app_data.token_a,
            dependencies: &config.dependencies,
            exported_services: config.exported(),
        };
        self.post_json(
            format!("{}{}", self.registration_base_url, REGISTER_PATH),
            &request,
        )
        .await
    }

    async fn validate_tokens(
        &self,
        token_a: &str,
        token_s: &str,
        app_id: &str,
    ) -> Result<serde_json::Value, CollaboratorError> {
        debug!(app_id, "validating app tokens");
        let response = self
            .client
            .post(format!("{}{}", self.base_url, VALIDATE_TOKENS_PATH))
            .json(&ValidateTokensRequest {
                app_id,
                app_token: token_a,
                symphony_token: token_s,
            })
            .send()
            .await
            .map_err(transport)?;

        // The backend may answer with an empty 200.
        let text = success_body(response).await?;
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| CollaboratorError::MalformedResponse(e.to_string()))
    }

    async fn validate_jwt(&self, jwt: &str) -> Result<JwtValidation, CollaboratorError> {
        debug!("validating user jwt");
        let response = self
            .client
            .post(format!("{}{}", self.base_url, VALIDATE_JWT_PATH))
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(jwt.to_string())
            .send()
            .await
            .map_err(transport)?;

        let text = success_body(response).await?;
        let user_id: UserId = serde_json::from_str(&text)
            .map_err(|e| CollaboratorError::MalformedResponse(e.to_string()))?;
        Ok(JwtValidation { user_id })
    }
}

fn transport(e: reqwest::Error) -> CollaboratorError {
    CollaboratorError::Transport(e.to_string())
}

/// Reads the body of a 2xx response; anything else becomes `Rejected`.
async fn success_body(response: reqwest::Response) -> Result<String, CollaboratorError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CollaboratorError::Rejected {
            status: status.as_u16(),
            body,
        });
    }
    response.text().await.map_err(transport)
}

use crate::config::PlatformConfig;
use crate::registry::ServiceRegistry;
use crate::{PlatformGateway, ServiceHandle};
use appauth_types::{CollaboratorError, HelloResponse};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Serialize)]
struct RegisterServiceRequest<'a> {
    name: &'a str,
}

#[derive(Deserialize)]
struct JwtResponse {
    jwt: String,
}

/// Gateway that talks to the host client over its local HTTP bridge.
///
/// Service registration is recorded locally first, so it succeeds even when
/// the bridge is down; the announcement to the host runs in the background.
#[derive(Debug, Clone)]
pub struct HttpPlatformGateway {
    base_url: String,
    client: reqwest::Client,
    registry: ServiceRegistry,
}

impl HttpPlatformGateway {
    pub fn new(config: &PlatformConfig) -> Result<Self, CollaboratorError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| CollaboratorError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            registry: ServiceRegistry::new(),
        })
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `{base}/services/{name}/jwt`, with `name` encoded as one path segment.
    fn jwt_url(&self, name: &str) -> Result<reqwest::Url, CollaboratorError> {
        let invalid =
            || CollaboratorError::Unavailable(format!("invalid bridge url: {}", self.base_url));

        let mut url = reqwest::Url::parse(&self.url("/services")).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .push(name)
            .push("jwt");
        Ok(url)
    }
}

#[async_trait]
impl PlatformGateway for HttpPlatformGateway {
    fn register_service(&self, name: &str) {
        if !self.registry.register(name) {
            debug!(service = name, "service already registered");
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(
                service = name,
                "no async runtime available, service registered locally only"
            );
            return;
        };

        let client = self.client.clone();
        let url = self.url("/services");
        let name = name.to_string();
        runtime.spawn(async move {
            let result = client
                .post(&url)
                .json(&RegisterServiceRequest { name: &name })
                .send()
                .await
                .map_err(transport)
                .and_then(|response| check_status_code(response.status()));
            match result {
                Ok(()) => debug!(service = %name, "announced service to host"),
                Err(e) => warn!(service = %name, error = %e, "failed to announce service to host"),
            }
        });
    }

    fn subscribe(&self, name: &str) -> Result<Box<dyn ServiceHandle>, CollaboratorError> {
        if name.is_empty() {
            return Err(CollaboratorError::Unavailable(
                "service name must not be empty".to_string(),
            ));
        }

        Ok(Box::new(HttpServiceHandle {
            service: name.to_string(),
            url: self.jwt_url(name)?,
            client: self.client.clone(),
        }))
    }

    async fn hello(&self) -> Result<HelloResponse, CollaboratorError> {
        let response = self
            .client
            .post(self.url("/remote/hello"))
            .send()
            .await
            .map_err(transport)?;
        read_json(response).await
    }
}

#[derive(Debug)]
struct HttpServiceHandle {
    service: String,
    url: reqwest::Url,
    client: reqwest::Client,
}

#[async_trait]
impl ServiceHandle for HttpServiceHandle {
    async fn get_jwt(&self) -> Result<String, CollaboratorError> {
        debug!(service = %self.service, "requesting jwt");
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(transport)?;
        let body: JwtResponse = read_json(response).await?;
        Ok(body.jwt)
    }
}

fn transport(e: reqwest::Error) -> CollaboratorError {
    CollaboratorError::Transport(e.to_string())
}

fn check_status_code(status: reqwest::StatusCode) -> Result<(), CollaboratorError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(CollaboratorError::Rejected {
            status: status.as_u16(),
            body: String::new(),
        })
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, CollaboratorError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CollaboratorError::Rejected {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| CollaboratorError::MalformedResponse(e.to_string()))
}

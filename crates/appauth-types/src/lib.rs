//! Shared types for the appauth workspace.
//!
//! Holds the application configuration, the credentials exchanged during the
//! authentication handshake, the user identity produced at the end of it, and
//! the error type every handshake collaborator reports failures with.
//!
//! Field names on the wire follow the platform's camelCase JSON
//! (`appToken`, `tokenS`, ...). Types that carry credentials redact them in
//! their `Debug` output.

pub mod config;
pub mod error;

pub use config::{AppConfig, CONTROLLER_SERVICE_SUFFIX, EXTENDED_USER_INFO_SERVICE};
pub use error::CollaboratorError;

use serde::{Deserialize, Serialize};
use std::fmt;

const REDACTED: &str = "[REDACTED]";

/// Opaque payload returned by the platform's remote hello.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HelloResponse(pub serde_json::Value);

/// Tokens issued by the authentication backend for an application.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppTokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    pub app_token: String,
}

impl fmt::Debug for AppTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppTokens")
            .field("app_id", &self.app_id)
            .field("app_token", &REDACTED)
            .finish()
    }
}

/// Registration payload: the app identifier and its backend-issued token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    pub app_id: String,
    pub token_a: String,
}

impl fmt::Debug for AppData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppData")
            .field("app_id", &self.app_id)
            .field("token_a", &REDACTED)
            .finish()
    }
}

/// Platform-issued token returned by application registration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymphonyToken {
    #[serde(rename = "tokenS")]
    pub token_s: String,
}

impl fmt::Debug for SymphonyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymphonyToken")
            .field("token_s", &REDACTED)
            .finish()
    }
}

/// Platform user identifier.
///
/// The backend reports ids as JSON numbers, some deployments as strings;
/// both decode to the same value. Always serialized as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawUserId")]
pub struct UserId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUserId {
    Number(u64),
    Text(String),
}

impl From<RawUserId> for UserId {
    fn from(raw: RawUserId) -> Self {
        match raw {
            RawUserId::Number(n) => Self(n.to_string()),
            RawUserId::Text(s) => Self(s),
        }
    }
}

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Result of validating a user JWT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtValidation {
    pub user_id: UserId,
}

/// Validated user identity handed to the user cache.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub jwt: String,
    pub user_id: UserId,
}

impl fmt::Debug for UserInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserInfo")
            .field("jwt", &REDACTED)
            .field("user_id", &self.user_id)
            .finish()
    }
}

//! Platform gateway for appauth.
//!
//! The host messaging client exposes a service registry and remote procedures
//! to embedded applications. This crate defines the slice of that surface the
//! authentication handshake uses, as traits, plus an adapter that reaches the
//! host through its local HTTP bridge.

pub mod config;
pub mod http;
pub mod registry;

pub use config::PlatformConfig;
pub use http::HttpPlatformGateway;
pub use registry::ServiceRegistry;

use appauth_types::{CollaboratorError, HelloResponse};
use async_trait::async_trait;

/// Host client surface used during the handshake.
#[async_trait]
pub trait PlatformGateway: Send + Sync {
    /// Registers a service this application provides. Fire-and-forget.
    fn register_service(&self, name: &str);

    /// Obtains a handle on a service offered by the host.
    fn subscribe(&self, name: &str) -> Result<Box<dyn ServiceHandle>, CollaboratorError>;

    /// Opens the platform-level handshake.
    async fn hello(&self) -> Result<HelloResponse, CollaboratorError>;
}

/// A subscribed host service.
#[async_trait]
pub trait ServiceHandle: Send + Sync {
    /// Requests the signed JWT for the current user.
    async fn get_jwt(&self) -> Result<String, CollaboratorError>;
}

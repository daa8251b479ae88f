//! Application authentication bootstrap.
//!
//! Before an application embedded in the host messaging client can act for
//! its user it has to prove who it is and learn who the user is. This crate
//! runs that handshake in order: platform hello, app authentication against
//! the backend, registration with the platform, token cross-validation, and
//! finally JWT acquisition and validation, ending with the user's identity in
//! the user cache.
//!
//! The collaborators (platform gateway, auth API, user cache) are injected as
//! trait objects; the binary wires in the HTTP and SQLite implementations.

pub mod config;
pub mod error;
pub mod handshake;

pub use error::BootstrapError;
pub use handshake::Bootstrapper;

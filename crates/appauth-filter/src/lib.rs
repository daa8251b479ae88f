//! Request authentication for application backends.
//!
//! Protected routes require `Authorization: Bearer <jwt>`. The token is
//! checked by a [`JwtService`] and the validated user is attached to the
//! request as [`AuthenticatedUser`].

mod jwt;
pub mod middleware;

pub use jwt::{BackendJwtService, JwtError, JwtService};
pub use middleware::{auth_filter, AuthFilter, AuthenticatedUser};

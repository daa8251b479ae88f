//! User cache: the sink for the identity produced by a successful handshake.
//!
//! Concurrent handshakes may write the same user; both provided caches keep
//! the last write.

pub mod error;
pub mod memory;
pub mod sqlite;

pub use error::CacheError;
pub use memory::InMemoryUserCache;
pub use sqlite::SqliteUserCache;

use appauth_types::{CollaboratorError, UserInfo};

pub trait UserCache: Send + Sync {
    /// Stores the validated user identity.
    fn cache_user_info(&self, info: &UserInfo) -> Result<(), CollaboratorError>;
}

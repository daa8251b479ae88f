//! SQLite storage for appauth.
//!
//! Provides the `r2d2` connection pool and the embedded migrations that create
//! the user cache table. Query helpers live with the crates that own the
//! tables.

mod migrations;
mod pool;

pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool, DbPool, DbRuntimeSettings, PoolError, IN_MEMORY_PATH};

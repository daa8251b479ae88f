use crate::error::CacheError;
use crate::UserCache;
use appauth_db::{create_pool, run_migrations, DbPool, DbRuntimeSettings};
use appauth_types::{CollaboratorError, UserId, UserInfo};
use rusqlite::{params, Connection, OptionalExtension};

/// Inserts or replaces the cached entry for `info.user_id`.
pub fn upsert_user_info(conn: &Connection, info: &UserInfo) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO user_info (user_id, jwt) VALUES (?1, ?2)
         ON CONFLICT(user_id) DO UPDATE SET jwt = excluded.jwt, cached_at = datetime('now')",
        params![info.user_id.as_str(), info.jwt],
    )?;
    Ok(())
}

pub fn get_user_info(conn: &Connection, user_id: &UserId) -> rusqlite::Result<Option<UserInfo>> {
    conn.query_row(
        "SELECT user_id, jwt FROM user_info WHERE user_id = ?1",
        [user_id.as_str()],
        |row| {
            Ok(UserInfo {
                user_id: UserId::new(row.get::<_, String>(0)?),
                jwt: row.get(1)?,
            })
        },
    )
    .optional()
}

/// User cache persisted in SQLite.
#[derive(Clone)]
pub struct SqliteUserCache {
    pool: DbPool,
}

impl SqliteUserCache {
    /// Wraps a pool whose schema is already migrated.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Opens the database at `path` and brings its schema up to date.
    pub fn open(path: &str, settings: DbRuntimeSettings) -> Result<Self, CacheError> {
        let pool = create_pool(path, settings)?;
        let applied = run_migrations(&*pool.get()?)?;
        if applied > 0 {
            tracing::info!(count = applied, "applied user cache migrations");
        }
        Ok(Self::new(pool))
    }

    pub fn get(&self, user_id: &UserId) -> Result<Option<UserInfo>, CacheError> {
        let conn = self.pool.get()?;
        Ok(get_user_info(&conn, user_id)?)
    }
}

impl UserCache for SqliteUserCache {
    fn cache_user_info(&self, info: &UserInfo) -> Result<(), CollaboratorError> {
        let conn = self.pool.get().map_err(CacheError::from)?;
        upsert_user_info(&conn, info).map_err(CacheError::from)?;
        tracing::debug!(user_id = %info.user_id, "cached user info");
        Ok(())
    }
}

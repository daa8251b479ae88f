use crate::UserCache;
use appauth_types::{CollaboratorError, UserId, UserInfo};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Process-local cache, keyed by user id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserCache {
    entries: Arc<RwLock<HashMap<UserId, UserInfo>>>,
}

impl InMemoryUserCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user_id: &UserId) -> Option<UserInfo> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UserCache for InMemoryUserCache {
    fn cache_user_info(&self, info: &UserInfo) -> Result<(), CollaboratorError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(info.user_id.clone(), info.clone());
        tracing::debug!(user_id = %info.user_id, "cached user info in memory");
        Ok(())
    }
}

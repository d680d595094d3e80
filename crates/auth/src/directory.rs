//! Actor directory: resolves user ids to display summaries.
//!
//! Movements reference their actor by id only; the query side joins through
//! this directory to attach `{ name, email }` at read time.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use stockroom_core::UserId;

/// Display summary for an authenticated actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// Lookup seam for actor summaries.
pub trait UserDirectory: Send + Sync {
    fn get(&self, id: UserId) -> Option<UserProfile>;

    /// Record (or refresh) a profile, e.g. from verified token claims.
    fn record(&self, profile: UserProfile);
}

impl<D> UserDirectory for Arc<D>
where
    D: UserDirectory + ?Sized,
{
    fn get(&self, id: UserId) -> Option<UserProfile> {
        (**self).get(id)
    }

    fn record(&self, profile: UserProfile) {
        (**self).record(profile)
    }
}

/// In-memory directory for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    inner: RwLock<HashMap<UserId, UserProfile>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn get(&self, id: UserId) -> Option<UserProfile> {
        let map = self.inner.read().ok()?;
        map.get(&id).cloned()
    }

    fn record(&self, profile: UserProfile) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(profile.id, profile);
        }
    }
}

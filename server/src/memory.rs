use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rocket::{fairing::AdHoc, tokio::sync::RwLock};
use shared::{Contributor, ScoreSnapshot};

use crate::store::{ContributorStore, SharedStore, StoreError};

/// Contributor table kept in process memory. Same semantics as the Postgres store,
/// without persistence across restarts.
#[derive(Default)]
pub struct MemoryStore {
    contributors: RwLock<HashMap<String, Contributor>>,
}

#[async_trait]
impl ContributorStore for MemoryStore {
    async fn leaderboard(&self) -> Result<Vec<Contributor>, StoreError> {
        let mut contributors: Vec<Contributor> =
            self.contributors.read().await.values().cloned().collect();
        contributors.sort_by(|a, b| {
            b.score()
                .cmp(&a.score())
                .then_with(|| a.github_username.cmp(&b.github_username))
        });
        Ok(contributors)
    }

    async fn contributor(&self, github_username: &str) -> Result<Option<Contributor>, StoreError> {
        Ok(self.contributors.read().await.get(github_username).cloned())
    }

    async fn insert(&self, contributor: &Contributor) -> Result<Contributor, StoreError> {
        let mut contributors = self.contributors.write().await;
        if contributors.contains_key(&contributor.github_username) {
            return Err(StoreError::AlreadyRegistered(
                contributor.github_username.clone(),
            ));
        }
        contributors.insert(contributor.github_username.clone(), contributor.clone());
        Ok(contributor.clone())
    }

    async fn update_score(
        &self,
        github_username: &str,
        snapshot: ScoreSnapshot,
        refreshed_at: DateTime<Utc>,
        expected_last_refreshed: DateTime<Utc>,
    ) -> Result<Contributor, StoreError> {
        let mut contributors = self.contributors.write().await;
        let stored = contributors
            .get_mut(github_username)
            .ok_or_else(|| StoreError::NotFound(github_username.to_string()))?;
        if stored.last_refreshed != expected_last_refreshed {
            return Err(StoreError::Conflict(github_username.to_string()));
        }
        *stored = stored.with_snapshot(snapshot, refreshed_at);
        Ok(stored.clone())
    }
}

pub fn stage() -> AdHoc {
    AdHoc::on_ignite("In-memory contributor store", |rocket| async {
        tracing::warn!("Contributors are kept in memory and will be lost on shutdown");
        let store: SharedStore = Arc::new(MemoryStore::default());
        rocket.manage(store)
    })
}

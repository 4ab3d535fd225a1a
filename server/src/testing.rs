use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{Contributor, ScoreSnapshot};

use crate::store::{ContributorStore, StoreError};

pub use shared::github::testing::FakeGithub;

/// Store whose connection pool is exhausted on every call.
pub struct FailingStore;

fn unavailable() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl ContributorStore for FailingStore {
    async fn leaderboard(&self) -> Result<Vec<Contributor>, StoreError> {
        Err(unavailable())
    }

    async fn contributor(&self, _github_username: &str) -> Result<Option<Contributor>, StoreError> {
        Err(unavailable())
    }

    async fn insert(&self, _contributor: &Contributor) -> Result<Contributor, StoreError> {
        Err(unavailable())
    }

    async fn update_score(
        &self,
        _github_username: &str,
        _snapshot: ScoreSnapshot,
        _refreshed_at: DateTime<Utc>,
        _expected_last_refreshed: DateTime<Utc>,
    ) -> Result<Contributor, StoreError> {
        Err(unavailable())
    }
}

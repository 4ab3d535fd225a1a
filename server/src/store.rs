use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{Contributor, ScoreSnapshot};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Contributor {0} is not registered")]
    NotFound(String),

    #[error("Contributor {0} is already registered")]
    AlreadyRegistered(String),

    #[error("Contributor {0} was refreshed concurrently")]
    Conflict(String),

    #[error("Stored record for {0} has a score that does not match its merged PR count")]
    Corrupted(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Postgres `unique_violation`.
    pub fn is_unique_violation(error: &sqlx::Error) -> bool {
        error
            .as_database_error()
            .and_then(|e| e.code())
            .is_some_and(|code| code == "23505")
    }
}

/// Remote table of contributors.
#[async_trait]
pub trait ContributorStore: Send + Sync {
    /// Every contributor, highest score first. Ties are ordered by username.
    async fn leaderboard(&self) -> Result<Vec<Contributor>, StoreError>;

    async fn contributor(&self, github_username: &str) -> Result<Option<Contributor>, StoreError>;

    /// Appends a new record and returns it as stored.
    async fn insert(&self, contributor: &Contributor) -> Result<Contributor, StoreError>;

    /// Writes a new score for `github_username`.
    ///
    /// The write only applies while the stored `last_refreshed` still equals
    /// `expected_last_refreshed`; otherwise [`StoreError::Conflict`] is returned
    /// and nothing changes.
    async fn update_score(
        &self,
        github_username: &str,
        snapshot: ScoreSnapshot,
        refreshed_at: DateTime<Utc>,
        expected_last_refreshed: DateTime<Utc>,
    ) -> Result<Contributor, StoreError>;
}

pub type SharedStore = Arc<dyn ContributorStore>;

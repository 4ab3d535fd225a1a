use chrono::{DateTime, SubsecRound, Utc};
use shared::{
    github::{lookup_merged_prs, GithubApi},
    is_valid_github_login, Contributor, PrLookup, ScoreSnapshot,
};
use thiserror::Error;
use tracing::{info, instrument};

use crate::store::{ContributorStore, StoreError};

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("{0:?} is not a valid GitHub login")]
    InvalidUsername(String),

    #[error("Merged PR lookup for {username} is unavailable: {reason}")]
    LookupUnavailable { username: String, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub contributor: Contributor,
    pub previous_score: u32,
}

impl RefreshOutcome {
    pub fn score_delta(&self) -> i64 {
        self.contributor.score() as i64 - self.previous_score as i64
    }
}

async fn fresh_snapshot(
    github: &dyn GithubApi,
    username: &str,
) -> Result<ScoreSnapshot, WorkflowError> {
    match lookup_merged_prs(github, username).await {
        PrLookup::Found(count) => Ok(ScoreSnapshot::from_merged_prs(count)),
        PrLookup::Unavailable(reason) => Err(WorkflowError::LookupUnavailable {
            username: username.to_string(),
            reason,
        }),
    }
}

// Postgres keeps microseconds, so stored timestamps must compare equal to ours.
fn store_precision(now: DateTime<Utc>) -> DateTime<Utc> {
    now.trunc_subsecs(6)
}

/// Scores `github_username` and appends a new contributor record.
#[instrument(skip(store, github))]
pub async fn register(
    store: &dyn ContributorStore,
    github: &dyn GithubApi,
    wallet_address: String,
    github_username: String,
    now: DateTime<Utc>,
) -> Result<Contributor, WorkflowError> {
    if !is_valid_github_login(&github_username) {
        return Err(WorkflowError::InvalidUsername(github_username));
    }
    let snapshot = fresh_snapshot(github, &github_username).await?;
    let contributor = Contributor::new(
        wallet_address,
        github_username,
        snapshot,
        store_precision(now),
    );
    let stored = store.insert(&contributor).await?;
    info!(
        "Registered {} with score {}",
        stored.github_username,
        stored.score()
    );
    Ok(stored)
}

/// Recomputes the score of `current` and persists it.
///
/// `current` is never modified; on failure nothing has been written.
#[instrument(skip(store, github, current), fields(github_username = %current.github_username))]
pub async fn refresh(
    store: &dyn ContributorStore,
    github: &dyn GithubApi,
    current: &Contributor,
    now: DateTime<Utc>,
) -> Result<RefreshOutcome, WorkflowError> {
    let snapshot = fresh_snapshot(github, &current.github_username).await?;
    let contributor = store
        .update_score(
            &current.github_username,
            snapshot,
            store_precision(now),
            current.last_refreshed,
        )
        .await?;
    let outcome = RefreshOutcome {
        contributor,
        previous_score: current.score(),
    };
    info!(
        "Refreshed {}: {} -> {} ({:+})",
        current.github_username,
        outcome.previous_score,
        outcome.contributor.score(),
        outcome.score_delta()
    );
    Ok(outcome)
}

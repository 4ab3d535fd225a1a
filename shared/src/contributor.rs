use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{Badge, GithubHandle, ScoreSnapshot};

pub const MAX_GITHUB_LOGIN_LEN: usize = 39;

/// GitHub login syntax: ASCII alphanumerics and single inner hyphens, at most 39 characters.
pub fn is_valid_github_login(login: &str) -> bool {
    !login.is_empty()
        && login.len() <= MAX_GITHUB_LOGIN_LEN
        && login.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        && !login.starts_with('-')
        && !login.ends_with('-')
        && !login.contains("--")
}

/// A registered participant of the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contributor {
    pub wallet_address: String,
    pub github_username: GithubHandle,
    score: u32,
    merged_pr_count: u32,
    pub last_refreshed: DateTime<Utc>,
}

impl Contributor {
    pub fn new(
        wallet_address: String,
        github_username: GithubHandle,
        snapshot: ScoreSnapshot,
        last_refreshed: DateTime<Utc>,
    ) -> Self {
        Self {
            wallet_address,
            github_username,
            score: snapshot.score(),
            merged_pr_count: snapshot.merged_pr_count(),
            last_refreshed,
        }
    }

    /// Returns a copy carrying a freshly computed score.
    pub fn with_snapshot(&self, snapshot: ScoreSnapshot, refreshed_at: DateTime<Utc>) -> Self {
        Self {
            wallet_address: self.wallet_address.clone(),
            github_username: self.github_username.clone(),
            score: snapshot.score(),
            merged_pr_count: snapshot.merged_pr_count(),
            last_refreshed: refreshed_at,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn merged_pr_count(&self) -> u32 {
        self.merged_pr_count
    }

    pub fn snapshot(&self) -> ScoreSnapshot {
        ScoreSnapshot::from_merged_prs(self.merged_pr_count as u64)
    }

    pub fn badge(&self) -> Badge {
        Badge::classify(self.score)
    }
}

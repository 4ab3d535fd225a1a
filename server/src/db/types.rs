use chrono::{DateTime, Utc};
use shared::{Contributor, ScoreSnapshot};

use crate::store::StoreError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContributorRecord {
    pub wallet_address: String,
    pub github_username: String,
    pub score: i32,
    pub merged_pr_count: i32,
    pub last_refreshed: DateTime<Utc>,
}

impl TryFrom<ContributorRecord> for Contributor {
    type Error = StoreError;

    fn try_from(record: ContributorRecord) -> Result<Self, StoreError> {
        let snapshot =
            ScoreSnapshot::from_stored(record.score as i64, record.merged_pr_count as i64)
                .ok_or_else(|| StoreError::Corrupted(record.github_username.clone()))?;
        Ok(Contributor::new(
            record.wallet_address,
            record.github_username,
            snapshot,
            record.last_refreshed,
        ))
    }
}

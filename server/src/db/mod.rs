use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rocket::{
    fairing::{self, AdHoc},
    Build, Rocket,
};
use rocket_db_pools::Database;
use shared::{Contributor, ScoreSnapshot};
use sqlx::PgPool;
use tracing::instrument;

use crate::store::{ContributorStore, SharedStore, StoreError};

#[derive(Database, Clone, Debug)]
#[database("jupboard")]
pub struct DB(PgPool);

pub mod types;

use types::ContributorRecord;

const CONTRIBUTOR_COLUMNS: &str =
    "wallet_address, github_username, score, merged_pr_count, last_refreshed";

#[async_trait]
impl ContributorStore for DB {
    #[instrument(skip(self))]
    async fn leaderboard(&self) -> Result<Vec<Contributor>, StoreError> {
        let records = sqlx::query_as::<_, ContributorRecord>(&format!(
            r#"
            SELECT {CONTRIBUTOR_COLUMNS}
            FROM contributors
            ORDER BY score DESC, github_username ASC
            "#
        ))
        .fetch_all(&self.0)
        .await?;

        records.into_iter().map(Contributor::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn contributor(&self, github_username: &str) -> Result<Option<Contributor>, StoreError> {
        let record = sqlx::query_as::<_, ContributorRecord>(&format!(
            r#"
            SELECT {CONTRIBUTOR_COLUMNS}
            FROM contributors
            WHERE github_username = $1
            "#
        ))
        .bind(github_username)
        .fetch_optional(&self.0)
        .await?;

        record.map(Contributor::try_from).transpose()
    }

    #[instrument(skip(self, contributor), fields(github_username = %contributor.github_username))]
    async fn insert(&self, contributor: &Contributor) -> Result<Contributor, StoreError> {
        let record = sqlx::query_as::<_, ContributorRecord>(&format!(
            r#"
            INSERT INTO contributors (wallet_address, github_username, score, merged_pr_count, last_refreshed)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CONTRIBUTOR_COLUMNS}
            "#
        ))
        .bind(&contributor.wallet_address)
        .bind(&contributor.github_username)
        .bind(contributor.score() as i32)
        .bind(contributor.merged_pr_count() as i32)
        .bind(contributor.last_refreshed)
        .fetch_one(&self.0)
        .await
        .map_err(|e| {
            if StoreError::is_unique_violation(&e) {
                StoreError::AlreadyRegistered(contributor.github_username.clone())
            } else {
                e.into()
            }
        })?;

        record.try_into()
    }

    #[instrument(skip(self))]
    async fn update_score(
        &self,
        github_username: &str,
        snapshot: ScoreSnapshot,
        refreshed_at: DateTime<Utc>,
        expected_last_refreshed: DateTime<Utc>,
    ) -> Result<Contributor, StoreError> {
        let record = sqlx::query_as::<_, ContributorRecord>(&format!(
            r#"
            UPDATE contributors
            SET score = $2, merged_pr_count = $3, last_refreshed = $4
            WHERE github_username = $1 AND last_refreshed = $5
            RETURNING {CONTRIBUTOR_COLUMNS}
            "#
        ))
        .bind(github_username)
        .bind(snapshot.score() as i32)
        .bind(snapshot.merged_pr_count() as i32)
        .bind(refreshed_at)
        .bind(expected_last_refreshed)
        .fetch_optional(&self.0)
        .await?;

        if let Some(record) = record {
            return record.try_into();
        }

        // Nothing matched: either the row is gone or someone refreshed it first.
        let exists: Option<(String,)> =
            sqlx::query_as("SELECT github_username FROM contributors WHERE github_username = $1")
                .bind(github_username)
                .fetch_optional(&self.0)
                .await?;

        match exists {
            Some(_) => Err(StoreError::Conflict(github_username.to_string())),
            None => Err(StoreError::NotFound(github_username.to_string())),
        }
    }
}

async fn run_migrations(rocket: Rocket<Build>) -> fairing::Result {
    match DB::fetch(&rocket) {
        Some(db) => match sqlx::migrate!("./migrations").run(&**db).await {
            Ok(_) => Ok(rocket),
            Err(e) => {
                tracing::error!("Failed to initialize SQLx database: {}", e);
                Err(rocket)
            }
        },
        None => Err(rocket),
    }
}

async fn manage_store(rocket: Rocket<Build>) -> fairing::Result {
    match DB::fetch(&rocket) {
        Some(db) => {
            let store: SharedStore = Arc::new(db.clone());
            Ok(rocket.manage(store))
        }
        None => Err(rocket),
    }
}

pub fn stage() -> AdHoc {
    AdHoc::on_ignite("SQLx Stage", |rocket| async {
        rocket
            .attach(DB::init())
            .attach(AdHoc::try_on_ignite("SQLx Migrations", run_migrations))
            .attach(AdHoc::try_on_ignite("Contributor store", manage_store))
    })
}

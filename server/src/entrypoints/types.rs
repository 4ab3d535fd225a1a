use chrono::{DateTime, Utc};
use rocket::{
    http::Status,
    response::{self, Responder},
    serde::json::Json,
    Request, Response,
};
use serde::{Deserialize, Serialize};
use shared::{github::GithubUserInfo, Badge, Contributor};
use utoipa::ToSchema;

use crate::{
    store::StoreError,
    workflows::{RefreshOutcome, WorkflowError},
};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct BadgeResponse {
    pub tier: String,
    pub label: String,
}

impl From<Badge> for BadgeResponse {
    fn from(badge: Badge) -> Self {
        Self {
            tier: badge.to_string(),
            label: badge.label().to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ContributorResponse {
    pub wallet_address: String,
    pub github_username: String,
    pub score: u32,
    pub merged_pr_count: u32,
    pub last_refreshed: DateTime<Utc>,
    pub badge: BadgeResponse,
}

impl From<Contributor> for ContributorResponse {
    fn from(contributor: Contributor) -> Self {
        Self {
            score: contributor.score(),
            merged_pr_count: contributor.merged_pr_count(),
            badge: contributor.badge().into(),
            wallet_address: contributor.wallet_address,
            github_username: contributor.github_username,
            last_refreshed: contributor.last_refreshed,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardResponse {
    /// Competition rank: contributors with equal scores share a place and the
    /// next place skips accordingly (1, 2, 2, 4).
    pub place: u32,
    pub contributor: ContributorResponse,
}

impl LeaderboardResponse {
    /// Assigns places to contributors already sorted by score. Equal scores share a place.
    pub fn rank(contributors: Vec<Contributor>) -> Vec<Self> {
        let mut previous: Option<(u32, u32)> = None;
        contributors
            .into_iter()
            .enumerate()
            .map(|(index, contributor)| {
                let place = match previous {
                    Some((score, place)) if score == contributor.score() => place,
                    _ => index as u32 + 1,
                };
                previous = Some((contributor.score(), place));
                Self {
                    place,
                    contributor: contributor.into(),
                }
            })
            .collect()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct GithubProfileResponse {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub html_url: String,
    pub public_repos: u64,
    pub followers: u64,
}

impl From<GithubUserInfo> for GithubProfileResponse {
    fn from(info: GithubUserInfo) -> Self {
        Self {
            login: info.login,
            name: info.name,
            avatar_url: info.avatar_url,
            html_url: info.html_url,
            public_repos: info.public_repos,
            followers: info.followers,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub contributor: ContributorResponse,
    /// Missing when GitHub could not be reached.
    pub github: Option<GithubProfileResponse>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub wallet_address: String,
    pub github_username: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshResponse {
    pub contributor: ContributorResponse,
    pub previous_score: u32,
    pub score_delta: i64,
}

impl From<RefreshOutcome> for RefreshResponse {
    fn from(outcome: RefreshOutcome) -> Self {
        Self {
            score_delta: outcome.score_delta(),
            previous_score: outcome.previous_score,
            contributor: outcome.contributor.into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: Status,
    error: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: Status, error: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            error,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(Status::BadRequest, "bad_request", message)
    }

    pub fn status(&self) -> Status {
        self.status
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        let message = error.to_string();
        match error {
            StoreError::NotFound(_) => Self::new(Status::NotFound, "not_registered", message),
            StoreError::AlreadyRegistered(_) => {
                Self::new(Status::Conflict, "already_registered", message)
            }
            StoreError::Conflict(_) => Self::new(Status::Conflict, "refresh_conflict", message),
            StoreError::Corrupted(_) | StoreError::Database(_) => {
                tracing::error!("Contributor store failure: {message}");
                Self::new(
                    Status::InternalServerError,
                    "persistence_failure",
                    "Failed to access contributor store",
                )
            }
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(error: WorkflowError) -> Self {
        match error {
            WorkflowError::InvalidUsername(_) => Self::bad_request(error.to_string()),
            WorkflowError::LookupUnavailable { .. } => Self::new(
                Status::BadGateway,
                "github_unavailable",
                error.to_string(),
            ),
            WorkflowError::Store(error) => error.into(),
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let body = Json(ErrorResponse {
            error: self.error.to_string(),
            message: self.message,
        });
        Response::build_from(body.respond_to(req)?)
            .status(self.status)
            .ok()
    }
}

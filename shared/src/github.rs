use async_trait::async_trait;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::{is_valid_github_login, PrLookup};

/// Public profile fields shown next to a contributor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubUserInfo {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub html_url: String,
    pub public_repos: u64,
    pub followers: u64,
}

#[async_trait]
pub trait GithubApi: Send + Sync {
    /// Total number of merged pull requests authored by `username`.
    async fn merged_pull_requests(&self, username: &str) -> anyhow::Result<u64>;

    async fn user_info(&self, username: &str) -> anyhow::Result<GithubUserInfo>;
}

pub fn merged_prs_query(username: &str) -> String {
    format!("author:{username} is:pr is:merged")
}

#[derive(Clone)]
pub struct GithubClient {
    octocrab: Octocrab,
}

impl GithubClient {
    pub fn new(github_token: Option<String>) -> anyhow::Result<Self> {
        let builder = Octocrab::builder();
        let octocrab = match github_token {
            Some(token) => builder.personal_token(token).build()?,
            None => builder.build()?,
        };
        Ok(Self { octocrab })
    }
}

#[async_trait]
impl GithubApi for GithubClient {
    #[instrument(skip(self))]
    async fn merged_pull_requests(&self, username: &str) -> anyhow::Result<u64> {
        // Only the total is read, so a single item per page is enough.
        let page = self
            .octocrab
            .search()
            .issues_and_pull_requests(&merged_prs_query(username))
            .per_page(1)
            .send()
            .await?;
        Ok(page.total_count.unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn user_info(&self, username: &str) -> anyhow::Result<GithubUserInfo> {
        let profile = self.octocrab.users(username).profile().await?;
        Ok(GithubUserInfo {
            login: profile.login,
            name: profile.name,
            avatar_url: profile.avatar_url.to_string(),
            html_url: profile.html_url.to_string(),
            public_repos: profile.public_repos,
            followers: profile.followers,
        })
    }
}

/// Looks up merged pull requests, reporting failures as [`PrLookup::Unavailable`].
///
/// Names that are not GitHub logins never reach the search endpoint, since extra
/// search qualifiers would change whose pull requests are counted.
#[instrument(skip(github))]
pub async fn lookup_merged_prs(github: &dyn GithubApi, username: &str) -> PrLookup {
    if !is_valid_github_login(username) {
        warn!("Refusing to search merged PRs for invalid login {username:?}");
        return PrLookup::Unavailable(format!("{username:?} is not a valid GitHub login"));
    }
    match github.merged_pull_requests(username).await {
        Ok(count) => PrLookup::Found(count),
        Err(e) => {
            warn!("Failed to look up merged PRs for {username}: {e:#}");
            PrLookup::Unavailable(format!("{e:#}"))
        }
    }
}

/// Ten points per merged pull request, or zero if GitHub could not be reached.
pub async fn compute_score(github: &dyn GithubApi, username: &str) -> u32 {
    lookup_merged_prs(github, username).await.score()
}

#[cfg(any(test, feature = "testing"))]
pub mod testing {
    use std::{collections::HashMap, sync::Mutex};

    use async_trait::async_trait;

    use super::{GithubApi, GithubUserInfo};

    /// Canned GitHub responses. Logins without an entry fail like a rate-limited call.
    #[derive(Default)]
    pub struct FakeGithub {
        merged: Mutex<HashMap<String, u64>>,
        profiles: Mutex<HashMap<String, GithubUserInfo>>,
        searches: Mutex<Vec<String>>,
    }

    impl FakeGithub {
        pub fn with(self, login: &str, merged: u64) -> Self {
            self.set(login, merged);
            self
        }

        pub fn with_profile(self, login: &str, public_repos: u64, followers: u64) -> Self {
            self.profiles.lock().unwrap().insert(
                login.to_string(),
                GithubUserInfo {
                    login: login.to_string(),
                    name: None,
                    avatar_url: format!("https://avatars.githubusercontent.com/{login}"),
                    html_url: format!("https://github.com/{login}"),
                    public_repos,
                    followers,
                },
            );
            self
        }

        pub fn set(&self, login: &str, merged: u64) {
            self.merged.lock().unwrap().insert(login.to_string(), merged);
        }

        pub fn fail(&self, login: &str) {
            self.merged.lock().unwrap().remove(login);
        }

        /// Usernames the merged PR search was called with, in order.
        pub fn searches(&self) -> Vec<String> {
            self.searches.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GithubApi for FakeGithub {
        async fn merged_pull_requests(&self, username: &str) -> anyhow::Result<u64> {
            self.searches.lock().unwrap().push(username.to_string());
            self.merged
                .lock()
                .unwrap()
                .get(username)
                .copied()
                .ok_or_else(|| anyhow::anyhow!("403 Forbidden: API rate limit exceeded"))
        }

        async fn user_info(&self, username: &str) -> anyhow::Result<GithubUserInfo> {
            self.profiles
                .lock()
                .unwrap()
                .get(username)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("404 Not Found"))
        }
    }
}

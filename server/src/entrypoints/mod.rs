use rocket::fairing::AdHoc;
use utoipa::OpenApi;

pub mod contributors;
pub mod leaderboards;
pub mod types;

#[derive(OpenApi)]
#[openapi(
    info(title = "JupBoard API", description = "Contributor leaderboard scored by merged pull requests"),
    paths(
        leaderboards::get_leaderboard,
        contributors::get_profile,
        contributors::register,
        contributors::refresh,
        contributors::get_badge,
    ),
    components(schemas(
        types::BadgeResponse,
        types::ContributorResponse,
        types::LeaderboardResponse,
        types::GithubProfileResponse,
        types::ProfileResponse,
        types::RegisterRequest,
        types::RefreshResponse,
        types::ErrorResponse,
    ))
)]
pub struct ApiDoc;

pub fn stage() -> AdHoc {
    AdHoc::on_ignite("Installing entrypoints", |rocket| async {
        rocket
            .attach(contributors::stage())
            .attach(leaderboards::stage())
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::Client,
    };
    use serde_json::{json, Value};

    use crate::{memory::MemoryStore, store::SharedStore, testing::FakeGithub, SharedGithub};

    async fn client(github: Arc<FakeGithub>) -> Client {
        let store: SharedStore = Arc::new(MemoryStore::default());
        let github: SharedGithub = github;
        let rocket = rocket::build()
            .manage(store)
            .manage(github)
            .attach(super::stage());
        Client::tracked(rocket).await.expect("valid rocket instance")
    }

    async fn register(client: &Client, wallet: &str, username: &str) -> (Status, Value) {
        let response = client
            .post("/api/contributors")
            .header(ContentType::JSON)
            .body(json!({ "wallet_address": wallet, "github_username": username }).to_string())
            .dispatch()
            .await;
        let status = response.status();
        (status, response.into_json().await.unwrap_or(Value::Null))
    }

    #[rocket::async_test]
    async fn register_then_view_profile() {
        let github = Arc::new(
            FakeGithub::default()
                .with("alice", 5)
                .with_profile("alice", 12, 34),
        );
        let client = client(github).await;

        let (status, body) = register(&client, "0xABC", "alice").await;
        assert_eq!(status, Status::Created);
        assert_eq!(body["wallet_address"], "0xABC");
        assert_eq!(body["github_username"], "alice");
        assert_eq!(body["score"], 50);
        assert_eq!(body["merged_pr_count"], 5);
        assert_eq!(body["badge"]["tier"], "bronze");

        let response = client.get("/api/contributors/alice").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["contributor"]["score"], 50);
        assert_eq!(body["github"]["public_repos"], 12);
        assert_eq!(body["github"]["followers"], 34);
        assert_eq!(body["github"]["html_url"], "https://github.com/alice");
    }

    #[rocket::async_test]
    async fn profile_without_github_info_still_renders() {
        let github = Arc::new(FakeGithub::default().with("bob", 1));
        let client = client(github).await;
        register(&client, "0xB", "bob").await;

        let response = client.get("/api/contributors/bob").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["contributor"]["github_username"], "bob");
        assert!(body["github"].is_null());
    }

    #[rocket::async_test]
    async fn unknown_profile_is_not_registered() {
        let client = client(Arc::new(FakeGithub::default())).await;

        let response = client.get("/api/contributors/nobody").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error"], "not_registered");

        let response = client
            .post("/api/contributors/nobody/refresh")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::NotFound);
    }

    #[rocket::async_test]
    async fn registration_rejects_bad_input_and_duplicates() {
        let github = Arc::new(FakeGithub::default().with("alice", 2));
        let client = client(github).await;

        let (status, body) = register(&client, "  ", "alice").await;
        assert_eq!(status, Status::BadRequest);
        assert_eq!(body["error"], "bad_request");

        let (status, _) = register(&client, "0x1", "alice").await;
        assert_eq!(status, Status::Created);

        let (status, body) = register(&client, "0x2", "alice").await;
        assert_eq!(status, Status::Conflict);
        assert_eq!(body["error"], "already_registered");

        let (status, body) = register(&client, "0x3", "ghost").await;
        assert_eq!(status, Status::BadGateway);
        assert_eq!(body["error"], "github_unavailable");
    }

    #[rocket::async_test]
    async fn registration_rejects_usernames_that_are_not_github_logins() {
        let github = Arc::new(
            FakeGithub::default()
                .with("mallory", 0)
                .with("torvalds", 500),
        );
        let client = client(github.clone()).await;

        for username in ["mallory author:torvalds", "a:b", "-mallory", "mal--lory"] {
            let (status, body) = register(&client, "0xM", username).await;
            assert_eq!(status, Status::BadRequest, "{username}");
            assert_eq!(body["error"], "bad_request");
        }
        assert!(github.searches().is_empty());

        let response = client.get("/api/leaderboard").dispatch().await;
        let leaderboard: Value = response.into_json().await.unwrap();
        assert_eq!(leaderboard, json!([]));
    }

    #[rocket::async_test]
    async fn refresh_reports_delta() {
        let github = Arc::new(FakeGithub::default().with("alice", 5));
        let client = client(github.clone()).await;
        register(&client, "0xABC", "alice").await;

        github.set("alice", 7);
        let response = client
            .post("/api/contributors/alice/refresh")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["previous_score"], 50);
        assert_eq!(body["score_delta"], 20);
        assert_eq!(body["contributor"]["score"], 70);
        assert_eq!(body["contributor"]["badge"]["tier"], "silver");

        let response = client
            .post("/api/contributors/alice/refresh")
            .dispatch()
            .await;
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["score_delta"], 0);
        assert_eq!(body["contributor"]["score"], 70);

        github.fail("alice");
        let response = client
            .post("/api/contributors/alice/refresh")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadGateway);

        let response = client.get("/api/contributors/alice").dispatch().await;
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["contributor"]["score"], 70);
    }

    #[rocket::async_test]
    async fn leaderboard_is_ranked_with_badges() {
        let github = Arc::new(
            FakeGithub::default()
                .with("alice", 9)
                .with("bob", 3)
                .with("carol", 6)
                .with("dave", 3),
        );
        let client = client(github).await;
        for (wallet, name) in [("0x1", "bob"), ("0x2", "alice"), ("0x3", "dave"), ("0x4", "carol")] {
            register(&client, wallet, name).await;
        }

        let response = client.get("/api/leaderboard").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        let rows = body.as_array().unwrap();
        let summary: Vec<(u64, &str, &str)> = rows
            .iter()
            .map(|row| {
                (
                    row["place"].as_u64().unwrap(),
                    row["contributor"]["github_username"].as_str().unwrap(),
                    row["contributor"]["badge"]["tier"].as_str().unwrap(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                (1, "alice", "gold"),
                (2, "carol", "silver"),
                (3, "bob", "bronze"),
                (3, "dave", "bronze"),
            ]
        );
    }

    #[rocket::async_test]
    async fn badge_is_served_as_svg() {
        let github = Arc::new(FakeGithub::default().with("alice", 9));
        let client = client(github).await;
        register(&client, "0xA", "alice").await;

        let response = client.get("/api/contributors/alice/badge").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(response.content_type(), Some(ContentType::SVG));
        let svg = response.into_string().await.unwrap();
        assert!(svg.contains("GOLD · 90 pts · #1"));

        let response = client.get("/api/contributors/nobody/badge").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
    }
}

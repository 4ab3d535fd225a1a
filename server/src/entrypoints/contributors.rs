use rocket::{
    http::{ContentType, Header},
    response::{self, status::Created, Responder},
    serde::json::Json,
    Request, Response, State,
};

use shared::is_valid_github_login;

use super::types::{
    ApiError, ContributorResponse, ErrorResponse, LeaderboardResponse, ProfileResponse,
    RefreshResponse, RegisterRequest,
};
use crate::{
    store::{SharedStore, StoreError},
    svg::generate_svg_badge,
    workflows, SharedGithub,
};

pub struct Badge {
    svg: String,
}

impl<'r> Responder<'r, 'static> for Badge {
    fn respond_to(self, _req: &'r Request<'_>) -> response::Result<'static> {
        Response::build()
            .header(Header::new("Cache-Control", "no-cache"))
            .header(Header::new("Pragma", "no-cache"))
            .header(ContentType::SVG)
            .sized_body(self.svg.len(), std::io::Cursor::new(self.svg))
            .ok()
    }
}

#[utoipa::path(context_path = "/api/contributors", responses(
    (status = 200, description = "Contributor profile with live GitHub info", body = ProfileResponse),
    (status = 404, description = "Contributor is not registered", body = ErrorResponse)
))]
#[get("/<username>")]
pub async fn get_profile(
    username: &str,
    store: &State<SharedStore>,
    github: &State<SharedGithub>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let (contributor, github_info) =
        futures::join!(store.contributor(username), github.user_info(username));
    let contributor = contributor?.ok_or_else(|| StoreError::NotFound(username.to_string()))?;
    let github_info = match github_info {
        Ok(info) => Some(info.into()),
        Err(e) => {
            tracing::warn!("Failed to fetch GitHub profile of {username}: {e:#}");
            None
        }
    };

    Ok(Json(ProfileResponse {
        contributor: contributor.into(),
        github: github_info,
    }))
}

#[utoipa::path(context_path = "/api/contributors", request_body = RegisterRequest, responses(
    (status = 201, description = "Contributor registered", body = ContributorResponse),
    (status = 400, description = "Wallet address is empty or GitHub username is not a valid login", body = ErrorResponse),
    (status = 409, description = "GitHub username is already registered", body = ErrorResponse),
    (status = 502, description = "GitHub lookup failed", body = ErrorResponse)
))]
#[post("/", format = "json", data = "<request>")]
pub async fn register(
    request: Json<RegisterRequest>,
    store: &State<SharedStore>,
    github: &State<SharedGithub>,
) -> Result<Created<Json<ContributorResponse>>, ApiError> {
    let RegisterRequest {
        wallet_address,
        github_username,
    } = request.into_inner();
    let wallet_address = wallet_address.trim().to_string();
    let github_username = github_username.trim().to_string();
    if wallet_address.is_empty() || github_username.is_empty() {
        return Err(ApiError::bad_request(
            "Wallet address and GitHub username are required",
        ));
    }
    if !is_valid_github_login(&github_username) {
        return Err(ApiError::bad_request(format!(
            "{github_username:?} is not a valid GitHub login"
        )));
    }

    let contributor = workflows::register(
        store.inner().as_ref(),
        github.inner().as_ref(),
        wallet_address,
        github_username,
        chrono::Utc::now(),
    )
    .await?;

    let location = format!("/api/contributors/{}", contributor.github_username);
    Ok(Created::new(location).body(Json(contributor.into())))
}

#[utoipa::path(context_path = "/api/contributors", responses(
    (status = 200, description = "Score recomputed from GitHub", body = RefreshResponse),
    (status = 404, description = "Contributor is not registered", body = ErrorResponse),
    (status = 409, description = "Contributor was refreshed concurrently", body = ErrorResponse),
    (status = 502, description = "GitHub lookup failed", body = ErrorResponse)
))]
#[post("/<username>/refresh")]
pub async fn refresh(
    username: &str,
    store: &State<SharedStore>,
    github: &State<SharedGithub>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let current = store
        .contributor(username)
        .await?
        .ok_or_else(|| StoreError::NotFound(username.to_string()))?;

    let outcome = workflows::refresh(
        store.inner().as_ref(),
        github.inner().as_ref(),
        &current,
        chrono::Utc::now(),
    )
    .await?;

    Ok(Json(outcome.into()))
}

#[utoipa::path(context_path = "/api/contributors", responses(
    (status = 200, description = "SVG tier badge", content_type = "image/svg+xml", body = String),
    (status = 404, description = "Contributor is not registered", body = ErrorResponse)
))]
#[get("/<username>/badge")]
pub async fn get_badge(username: &str, store: &State<SharedStore>) -> Result<Badge, ApiError> {
    let contributor = store
        .contributor(username)
        .await?
        .ok_or_else(|| StoreError::NotFound(username.to_string()))?;
    let place = LeaderboardResponse::rank(store.leaderboard().await?)
        .into_iter()
        .find(|record| record.contributor.github_username == username)
        .map(|record| record.place as usize);

    Ok(Badge {
        svg: generate_svg_badge(&contributor, place),
    })
}

pub fn stage() -> rocket::fairing::AdHoc {
    rocket::fairing::AdHoc::on_ignite("Installing contributor entrypoints", |rocket| async {
        rocket.mount(
            "/api/contributors",
            routes![get_profile, register, refresh, get_badge],
        )
    })
}

use rocket::{serde::json::Json, State};

use super::types::{ApiError, ErrorResponse, LeaderboardResponse};
use crate::store::SharedStore;

#[utoipa::path(context_path = "/api", responses(
    (status = 200, description = "All contributors ranked by score", body = [LeaderboardResponse]),
    (status = 500, description = "Contributor store failure", body = ErrorResponse)
))]
#[get("/leaderboard")]
pub async fn get_leaderboard(
    store: &State<SharedStore>,
) -> Result<Json<Vec<LeaderboardResponse>>, ApiError> {
    let contributors = store.leaderboard().await?;
    Ok(Json(LeaderboardResponse::rank(contributors)))
}

pub fn stage() -> rocket::fairing::AdHoc {
    rocket::fairing::AdHoc::on_ignite("Installing leaderboard entrypoints", |rocket| async {
        rocket.mount("/api", routes![get_leaderboard])
    })
}

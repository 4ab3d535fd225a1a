#[macro_use]
extern crate rocket;

use std::sync::Arc;

use jupboard_server::{db, entrypoints, github_stage, memory, SharedGithub};
use rocket_prometheus::PrometheusMetrics;
use shared::github::GithubClient;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(Debug, serde::Deserialize)]
pub struct Env {
    github_token: Option<String>,
    #[serde(default)]
    in_memory_store: bool,
}

#[launch]
async fn rocket() -> _ {
    dotenv::dotenv().ok();

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().pretty());
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let env = envy::from_env::<Env>().expect("Failed to load environment variables");
    if env.github_token.is_none() {
        tracing::warn!("GITHUB_TOKEN is not set, GitHub search is rate limited per IP");
    }
    let github: SharedGithub =
        Arc::new(GithubClient::new(env.github_token).expect("Failed to create GitHub client"));

    let cors = rocket_cors::CorsOptions::default()
        .to_cors()
        .expect("Failed to create CORS fairing");
    let prometheus = PrometheusMetrics::new();

    let span = tracing::info_span!("Starting Rocket");
    let _enter = span.enter();

    let rocket = rocket::build();
    let rocket = if env.in_memory_store {
        rocket.attach(memory::stage())
    } else {
        rocket.attach(db::stage())
    };

    rocket
        .attach(github_stage(github))
        .attach(cors)
        .attach(prometheus.clone())
        .attach(entrypoints::stage())
        .mount("/metrics", prometheus)
        .mount(
            "/",
            SwaggerUi::new("/swagger-ui/<_..>")
                .url("/api-docs/openapi.json", entrypoints::ApiDoc::openapi()),
        )
}

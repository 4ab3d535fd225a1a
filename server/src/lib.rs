#[macro_use]
extern crate rocket;

use std::sync::Arc;

use rocket::fairing::AdHoc;
use shared::github::GithubApi;

pub mod db;
pub mod entrypoints;
pub mod memory;
pub mod store;
pub mod svg;
pub mod workflows;

#[cfg(test)]
pub(crate) mod testing;

pub type SharedGithub = Arc<dyn GithubApi>;

pub fn github_stage(github: SharedGithub) -> AdHoc {
    AdHoc::on_ignite("GitHub client", move |rocket| async move {
        rocket.manage(github)
    })
}

mod badge;
mod contributor;
mod score;

#[cfg(feature = "github")]
pub mod github;

pub use badge::*;
pub use contributor::*;
pub use score::*;

pub type GithubHandle = String;

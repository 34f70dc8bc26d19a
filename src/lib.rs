pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use api::{router, AppState, SharedState};
pub use config::AppConfig;
pub use crate::core::{fetcher::HttpFeedFetcher, search::FeedSearchEngine};
pub use utils::error::{AppError, Result};

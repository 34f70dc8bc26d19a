pub mod auth;
pub mod docs;
pub mod response;
pub mod search;
pub mod server;
pub mod users;

use crate::adapters::memory_users::InMemoryUserStore;
use crate::adapters::token_auth::TokenAuthService;
use crate::config::toml_config::{AppConfig, DocsConfig};
use crate::core::fetcher::HttpFeedFetcher;
use crate::core::search::FeedSearchEngine;
use crate::domain::ports::{AuthService, FeedSource, UserRepository};
use crate::utils::error::Result;
use axum::{
    http::{header, Method},
    routing::{get, post},
    Json, Router,
};
use response::ApiResponse;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub struct AppState {
    pub engine: FeedSearchEngine,
    pub auth: Arc<dyn AuthService>,
    pub users: Arc<dyn UserRepository>,
    pub docs: DocsConfig,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(
        source: Arc<dyn FeedSource>,
        auth: Arc<dyn AuthService>,
        users: Arc<dyn UserRepository>,
        config: &AppConfig,
    ) -> SharedState {
        Arc::new(Self {
            engine: FeedSearchEngine::new(source, config.search.clone()),
            auth,
            users,
            docs: config.docs.clone(),
        })
    }

    /// Wires the HTTP fetcher and the in-memory stores, seeding configured users.
    pub async fn from_config(config: &AppConfig) -> Result<SharedState> {
        let fetcher = HttpFeedFetcher::new(&config.feed)?;
        tracing::info!("📡 Feed endpoint: {}", fetcher.endpoint());

        let store = Arc::new(InMemoryUserStore::new());
        store.seed(&config.users).await?;

        let users: Arc<dyn UserRepository> = store;
        let auth = Arc::new(TokenAuthService::new(users.clone()));

        Ok(Self::new(Arc::new(fetcher), auth, users, config))
    }
}

pub fn router(state: SharedState) -> Router {
    let api = Router::new()
        // public
        .route("/health", get(health))
        .route("/login", post(auth::login))
        .route("/docs", get(docs::index))
        .route("/docs/json", get(docs::json))
        // bearer token
        .route("/me", get(auth::me))
        .route("/logout", post(auth::logout))
        .route("/search", get(search::search))
        .route("/search/name", get(search::search_by_name))
        .route("/search/nim", get(search::search_by_nim))
        .route("/search/ymd", get(search::search_by_ymd))
        .route("/search/exact", get(search::search_exact))
        // admin
        .route("/users", get(users::index).post(users::store))
        .route(
            "/users/{id}",
            get(users::show)
                .put(users::update)
                .patch(users::update)
                .delete(users::destroy),
        );

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<ApiResponse<()>> {
    Json(ApiResponse::message("ok"))
}

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::db::{ChatRepo, Database};
use crate::news::NewsService;
use crate::search::{GoogleSearchProvider, SearchPipeline, SearchTables};
use crate::summarizer::LlmClient;

pub mod handlers;
pub mod models;

/// Everything the handlers need for one deployment: the search pipeline,
/// the summarizer client, the news fetcher and the chat-history repository.
pub struct AppState {
    pub pipeline: SearchPipeline<GoogleSearchProvider>,
    pub llm: LlmClient,
    pub news: NewsService,
    pub chats: ChatRepo,
}

impl AppState {
    pub fn new(db: &Database) -> AppState {
        AppState {
            pipeline: SearchPipeline::new(GoogleSearchProvider::new(), SearchTables::default()),
            llm: LlmClient::new(),
            news: NewsService::new(),
            chats: ChatRepo::new(db),
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chat", post(handlers::chat_handler))
        .route("/api/news", post(handlers::news_handler))
        .route("/api/history/:user_id", get(handlers::history_handler))
        .with_state(state)
        .layer(cors)
}

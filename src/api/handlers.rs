use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use nanoid::nanoid;
use std::sync::Arc;

use crate::data_models::{ChatDoc, ChatResponseDoc};
use crate::db::DEFAULT_HISTORY_LIMIT;
use crate::summarizer;

use super::AppState;
use super::models::{
    ChatRequest, ChatResponse, HistoryEntry, HistoryParams, NewsRequest, NewsResponse,
};

const APOLOGY_MESSAGE: &str =
    "Maaf, terjadi kesalahan saat memproses permintaan Anda. Silakan coba lagi.";

pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, String)> {
    let message = request.message.trim().to_string();
    if message.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Message cannot be empty".to_string()));
    }

    log::info!("processing chat query: {message:?}");
    let results = state.pipeline.search(&message).await;

    let content = if results.is_empty() {
        format!(
            "Untuk topik \"{message}\", saya sarankan untuk memulai dengan konsep dasarnya dulu. Apa yang ingin Anda ketahui secara spesifik?"
        )
    } else {
        let references = summarizer::search_content_block(&results);
        match state
            .llm
            .generate_learning_response(&message, &references)
            .await
        {
            Ok(content) => content,
            Err(e) => {
                log::error!("learning response failed: {e:#}");
                APOLOGY_MESSAGE.to_string()
            }
        }
    };

    persist_turn(
        &state,
        request.user_id,
        request.session_id,
        message,
        ChatResponseDoc {
            content: content.clone(),
            references: results.clone(),
            articles: vec![],
        },
    );

    Ok(Json(ChatResponse {
        content,
        references: results,
        timestamp: Utc::now().to_rfc3339(),
    }))
}

pub async fn news_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewsRequest>,
) -> Result<Json<NewsResponse>, (StatusCode, String)> {
    let topic = request.topic.trim().to_string();
    if topic.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Topic cannot be empty".to_string()));
    }

    log::info!("fetching news for topic: {topic:?}");
    let articles = state.news.fetch_topic_news(&topic).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("News error: {e}"),
        )
    })?;

    let content = state.llm.summarize_news(&articles).await;

    persist_turn(
        &state,
        request.user_id,
        request.session_id,
        topic,
        ChatResponseDoc {
            content: content.clone(),
            references: vec![],
            articles: articles.clone(),
        },
    );

    Ok(Json(NewsResponse {
        content,
        articles,
        timestamp: Utc::now().to_rfc3339(),
    }))
}

pub async fn history_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Json<Vec<HistoryEntry>> {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    // History reads fail soft: the caller gets an empty list, not a 5xx.
    let docs = match state.chats.recent_for_user(&user_id, limit).await {
        Ok(docs) => docs,
        Err(e) => {
            log::error!("failed to load chat history for {user_id}: {e:#}");
            Vec::new()
        }
    };
    Json(docs.into_iter().map(HistoryEntry::from).collect())
}

/// Persists one chat turn in the background. Skipped when the request has no
/// user id; a missing session id gets a generated one.
fn persist_turn(
    state: &Arc<AppState>,
    user_id: Option<String>,
    session_id: Option<String>,
    query: String,
    response: ChatResponseDoc,
) {
    let Some(user_id) = user_id else {
        log::debug!("no user id on request, skipping history persistence");
        return;
    };
    let session_id = session_id.unwrap_or_else(|| nanoid!());

    let state = state.clone();
    tokio::spawn(async move {
        let turn = ChatDoc::new(user_id, session_id, query, response);
        if let Err(e) = state.chats.save_turn(&turn).await {
            log::error!("failed to persist chat turn: {e:#}");
        }
    });
}

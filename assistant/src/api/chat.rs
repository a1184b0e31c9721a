use tracing::info;
use uuid::Uuid;
use warp::{Rejection, Reply};

use crate::agents::ResponderAgent;
use crate::error::ApiError;
use crate::models::{ChatRequest, RetrieveRequest};

pub async fn handle_chat(
    request: ChatRequest,
    responder: ResponderAgent,
) -> Result<impl Reply, Rejection> {
    let request_id = Uuid::new_v4();
    let message = request.message.as_deref().unwrap_or_default().trim();
    if message.is_empty() {
        return Err(warp::reject::custom(ApiError::BadRequest(
            "message must not be empty".to_string(),
        )));
    }
    info!("Processing chat [{}]: {}", request_id, message);

    let response = responder.respond(
        message,
        request.filters.as_ref(),
        request.selected_deal_id.as_deref(),
    );
    info!(%request_id, sources = response.sources.len(), "Chat answered");

    Ok(warp::reply::json(&response))
}

pub async fn handle_retrieve(
    request: RetrieveRequest,
    responder: ResponderAgent,
    default_limit: usize,
) -> Result<impl Reply, Rejection> {
    let limit = request.limit.unwrap_or(default_limit);
    let scored = responder
        .retriever()
        .retrieve(&request.message, request.filters.as_ref(), limit);
    Ok(warp::reply::json(&scored))
}

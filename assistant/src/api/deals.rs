use tracing::info;
use warp::{Rejection, Reply};

use crate::agents::ResponderAgent;
use crate::error::ApiError;

pub async fn handle_list_deals(responder: ResponderAgent) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&responder.retriever().store().deals()))
}

pub async fn handle_get_deal(
    deal_id: String,
    responder: ResponderAgent,
) -> Result<impl Reply, Rejection> {
    info!("Fetching deal: {}", deal_id);
    match responder.retriever().store().get(&deal_id) {
        Some(deal) => Ok(warp::reply::json(deal)),
        None => Err(warp::reject::custom(ApiError::NotFound(format!(
            "deal {}",
            deal_id
        )))),
    }
}

pub async fn handle_get_filters(responder: ResponderAgent) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&responder.retriever().store().facets()))
}

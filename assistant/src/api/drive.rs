use serde::Deserialize;
use warp::{Rejection, Reply};

use crate::drive::{connect, SharedDriveTree};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct NodeQuery {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub async fn handle_get_node(
    query: NodeQuery,
    drive: SharedDriveTree,
) -> Result<impl Reply, Rejection> {
    let node = match query.id.as_deref() {
        None | Some("") => drive.root(),
        Some(id) => drive
            .get_by_id(id)
            .ok_or_else(|| warp::reject::custom(ApiError::NotFound(format!("drive node {}", id))))?,
    };
    Ok(warp::reply::json(node))
}

pub async fn handle_search(
    query: SearchQuery,
    drive: SharedDriveTree,
) -> Result<impl Reply, Rejection> {
    let term = query.q.as_deref().unwrap_or_default();
    Ok(warp::reply::json(&drive.search(term)))
}

pub async fn handle_connect(account: String) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&connect(&account)))
}

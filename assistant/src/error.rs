use std::convert::Infallible;
use std::path::PathBuf;

use thiserror::Error;
use warp::http::StatusCode;
use warp::{reject::Reject, Rejection, Reply};

/// Failures while loading one of the read-only datasets. Always fatal at start-up.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl Reject for ApiError {}

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (code, message, details) = if let Some(api_err) = err.find::<ApiError>() {
        let (code, message) = match api_err {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "Resource not found"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "Bad request"),
        };
        (code, message, api_err.to_string())
    } else if let Some(body_err) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, "Bad request", body_err.to_string())
    } else if let Some(query_err) = err.find::<warp::reject::InvalidQuery>() {
        (StatusCode::BAD_REQUEST, "Bad request", query_err.to_string())
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Resource not found", "no such route".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed",
            "method not allowed".to_string(),
        )
    } else {
        tracing::error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
            "unhandled rejection".to_string(),
        )
    };

    let json = warp::reply::json(&serde_json::json!({
        "error": message,
        "details": details,
    }));

    Ok(warp::reply::with_status(json, code))
}

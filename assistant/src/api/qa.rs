use tracing::info;
use warp::{Rejection, Reply};

use crate::drive::SharedDriveTree;
use crate::metrics;
use crate::models::{QaRequest, QaResponse};
use crate::qa::{chunk_answer, SharedQaIndex, NOT_FOUND_CHUNKS};

pub async fn handle_qa(
    request: QaRequest,
    qa: SharedQaIndex,
    drive: SharedDriveTree,
) -> Result<impl Reply, Rejection> {
    let message = request.message.as_deref().unwrap_or_default();
    info!("Q&A: {}", message);

    let entry = qa.find_answer(message);
    metrics::record_qa(entry.is_some());

    let response = match entry {
        Some(entry) => QaResponse {
            chunks: chunk_answer(&entry.answer),
            citations: drive.resolve(&entry.citations),
        },
        None => QaResponse {
            chunks: NOT_FOUND_CHUNKS.iter().map(|c| c.to_string()).collect(),
            citations: vec![],
        },
    };

    Ok(warp::reply::json(&response))
}

pub async fn handle_questions(qa: SharedQaIndex) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&qa.questions()))
}

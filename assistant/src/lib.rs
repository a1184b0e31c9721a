//! Deal-intelligence assistant: keyword retrieval over a fixed deal portfolio,
//! rule-based intent classification and templated replies, served over HTTP.

pub mod agents;
pub mod api;
pub mod config;
pub mod dataset;
pub mod drive;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod qa;

use std::sync::Arc;

use crate::agents::ResponderAgent;
use crate::api::AppState;
use crate::config::Config;
use crate::dataset::DealStore;
use crate::drive::DriveTree;
use crate::error::DatasetError;
use crate::qa::QaIndex;

/// Loads all three datasets. Any failure here is fatal to the process.
pub fn build_state(config: &Config) -> Result<AppState, DatasetError> {
    let store = DealStore::open(config.deals_path.as_deref())?;
    let qa = QaIndex::open(config.qa_path.as_deref())?;
    let drive = DriveTree::open(config.drive_path.as_deref())?;

    Ok(AppState {
        responder: ResponderAgent::new(Arc::clone(&store)),
        qa,
        drive,
        drive_account: config.drive_account.clone(),
        retrieve_limit: config.retrieve_limit,
    })
}

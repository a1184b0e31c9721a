use std::convert::Infallible;

use warp::{Filter, Rejection, Reply};

use crate::agents::ResponderAgent;
use crate::drive::SharedDriveTree;
use crate::qa::SharedQaIndex;

mod chat;
mod deals;
mod drive;
mod qa;

/// Everything the handlers need, cloned into each request.
#[derive(Clone)]
pub struct AppState {
    pub responder: ResponderAgent,
    pub qa: SharedQaIndex,
    pub drive: SharedDriveTree,
    pub drive_account: String,
    pub retrieve_limit: usize,
}

pub fn routes(state: AppState) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let api = warp::path("api").and(warp::path("v1"));

    let chat_route = api
        .and(warp::path("chat"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with_responder(state.responder.clone()))
        .and_then(chat::handle_chat);

    let retrieve_route = api
        .and(warp::path("retrieve"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with_responder(state.responder.clone()))
        .and(with_value(state.retrieve_limit))
        .and_then(chat::handle_retrieve);

    let deals_route = api
        .and(warp::path("deals"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_responder(state.responder.clone()))
        .and_then(deals::handle_list_deals);

    let deal_route = api
        .and(warp::path("deals"))
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::get())
        .and(with_responder(state.responder.clone()))
        .and_then(deals::handle_get_deal);

    let filters_route = api
        .and(warp::path("filters"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_responder(state.responder.clone()))
        .and_then(deals::handle_get_filters);

    let qa_route = api
        .and(warp::path("qa"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with_qa(state.qa.clone()))
        .and(with_drive(state.drive.clone()))
        .and_then(qa::handle_qa);

    let questions_route = api
        .and(warp::path("questions"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_qa(state.qa.clone()))
        .and_then(qa::handle_questions);

    let drive_search_route = api
        .and(warp::path("drive"))
        .and(warp::path("search"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<drive::SearchQuery>())
        .and(with_drive(state.drive.clone()))
        .and_then(drive::handle_search);

    let drive_route = api
        .and(warp::path("drive"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<drive::NodeQuery>())
        .and(with_drive(state.drive.clone()))
        .and_then(drive::handle_get_node);

    let connect_route = api
        .and(warp::path("connect"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_value(state.drive_account.clone()))
        .and_then(drive::handle_connect);

    chat_route
        .or(retrieve_route)
        .or(deals_route)
        .or(deal_route)
        .or(filters_route)
        .or(qa_route)
        .or(questions_route)
        .or(drive_search_route)
        .or(drive_route)
        .or(connect_route)
}

fn with_responder(
    responder: ResponderAgent,
) -> impl Filter<Extract = (ResponderAgent,), Error = Infallible> + Clone {
    warp::any().map(move || responder.clone())
}

fn with_qa(qa: SharedQaIndex) -> impl Filter<Extract = (SharedQaIndex,), Error = Infallible> + Clone {
    warp::any().map(move || qa.clone())
}

fn with_drive(
    drive: SharedDriveTree,
) -> impl Filter<Extract = (SharedDriveTree,), Error = Infallible> + Clone {
    warp::any().map(move || drive.clone())
}

fn with_value<T: Clone + Send + Sync + 'static>(
    value: T,
) -> impl Filter<Extract = (T,), Error = Infallible> + Clone {
    warp::any().map(move || value.clone())
}

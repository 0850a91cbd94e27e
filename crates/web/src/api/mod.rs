use axum::{
    response::IntoResponse,
    routing::{get, on},
    Json, Router,
};
use locator::database::Database;
use serde_json::json;

pub mod location;
pub mod location_history;
pub mod user;

use crate::{
    common::{route_not_found, METHOD_FILTER_ALL},
    WebState,
};

pub fn routes<D>(state: WebState<D>) -> Router
where
    D: Database + 'static,
{
    Router::new()
        .route("/ping", get(ping))
        .nest_service("/location", location::routes(state.clone()))
        .nest_service("/locationhistory", location_history::routes(state.clone()))
        .nest_service("/user", user::routes(state))
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn ping() -> impl IntoResponse {
    Json(json!({
        "message": "pong!"
    }))
}

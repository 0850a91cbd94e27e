use axum::{
    extract::{rejection::QueryRejection, OriginalUri, Query, State},
    http::Method,
    routing::{get, on},
    Json, Router,
};
use locator::{database::Database, RequestError};
use model::{timestamp, user::User};
use serde::Deserialize;
use utility::id::Id;

use crate::{
    common::{route_not_found, RouteErrorResponse, METHOD_FILTER_ALL},
    RouteResult, WebState,
};

pub(crate) fn routes<D>(state: WebState<D>) -> Router
where
    D: Database + 'static,
{
    Router::new()
        .route("/distancetraveled", get(distance_traveled::<D>))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DistanceTraveledQuery {
    #[serde(default)]
    datetime: String,
    user_id: Option<String>,
}

async fn distance_traveled<D>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client }): State<WebState<D>>,
    params: Result<Query<DistanceTraveledQuery>, QueryRejection>,
) -> RouteResult<Json<String>>
where
    D: Database + 'static,
{
    let failed = |why: RequestError| {
        let message = match why {
            RequestError::NotFound => "User not found",
            _ => "Failed to fetch locations",
        };
        RouteErrorResponse::from(why)
            .or_message(message)
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    };

    let Query(params) = params.map_err(|_| {
        RouteErrorResponse::bad_request("Invalid request format")
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    })?;
    let since = timestamp::parse_timestamp(&params.datetime)
        .map_err(|why| failed(why.into()))?;
    let user_id = params
        .user_id
        .map(|user_id| user_id.parse::<Id<User>>())
        .transpose()
        .map_err(|_| failed(RequestError::NotFound))?;

    let distance = client
        .distance_traveled(since, user_id.as_ref())
        .await
        .map_err(failed)?;

    Ok(Json(format!(
        "Total distance traveled since {}: {:.2} kilometers",
        params.datetime, distance
    )))
}

use axum::{
    extract::{rejection::JsonRejection, OriginalUri, Path, State},
    http::{Method, StatusCode},
    routing::{get, on, post},
    Json, Router,
};
use locator::{database::Database, RequestError};
use model::{
    user::{User, Username},
    WithId,
};
use serde::Deserialize;

use crate::{
    common::{route_not_found, RouteErrorResponse, METHOD_FILTER_ALL},
    RouteResult, WebState,
};

pub(crate) fn routes<D>(state: WebState<D>) -> Router
where
    D: Database + 'static,
{
    Router::new()
        .route("/", post(create_user::<D>))
        .route("/:username", get(user_by_username::<D>))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Debug, Deserialize)]
pub(crate) struct NewUser {
    username: String,
}

async fn create_user<D>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client }): State<WebState<D>>,
    body: Result<Json<NewUser>, JsonRejection>,
) -> RouteResult<(StatusCode, Json<WithId<User>>)>
where
    D: Database + 'static,
{
    let failed = |why: RequestError| {
        let message = match why {
            RequestError::Conflict => "Username is already taken",
            _ => "Failed to create user",
        };
        RouteErrorResponse::from(why)
            .or_message(message)
            .with_method(&Method::POST)
            .with_uri(original_uri.path())
    };

    let Json(new_user) = body.map_err(|_| {
        RouteErrorResponse::bad_request("Invalid request format")
            .with_method(&Method::POST)
            .with_uri(original_uri.path())
    })?;
    let username = new_user
        .username
        .parse::<Username>()
        .map_err(|why| failed(why.into()))?;

    let user = client.create_user(username).await.map_err(failed)?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn user_by_username<D>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client }): State<WebState<D>>,
    Path(username): Path<String>,
) -> RouteResult<Json<WithId<User>>>
where
    D: Database + 'static,
{
    let failed = |why: RequestError| {
        let message = match why {
            RequestError::NotFound => "User not found",
            _ => "Failed to fetch user",
        };
        RouteErrorResponse::from(why)
            .or_message(message)
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    };

    // a name that does not validate can not belong to anyone
    let username = username
        .parse::<Username>()
        .map_err(|_| failed(RequestError::NotFound))?;

    let user = client.user_by_username(&username).await.map_err(failed)?;
    Ok(Json(user))
}

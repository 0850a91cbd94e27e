use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        OriginalUri, Path, Query, State,
    },
    http::Method,
    routing::{get, on, put},
    Json, Router,
};
use locator::{database::Database, RequestError};
use model::{
    coordinate::{self, Coordinate},
    user::User,
    WithId,
};
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
        .route("/usersinlocation", get(users_in_location::<D>))
        .route("/:id", put(update_location::<D>))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Debug, Deserialize)]
pub(crate) struct LocationUpdate {
    latitude: f64,
    longitude: f64,
}

async fn update_location<D>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client }): State<WebState<D>>,
    Path(user_id): Path<String>,
    body: Result<Json<LocationUpdate>, JsonRejection>,
) -> RouteResult<Json<&'static str>>
where
    D: Database + 'static,
{
    let failed = |why: RequestError| {
        let message = match why {
            RequestError::NotFound => "User not found",
            _ => "Failed to update user location",
        };
        RouteErrorResponse::from(why)
            .or_message(message)
            .with_method(&Method::PUT)
            .with_uri(original_uri.path())
    };

    // the user is looked up before the body is inspected
    let user_id = user_id
        .parse::<Id<User>>()
        .map_err(|_| failed(RequestError::NotFound))?;
    client.get_user(&user_id).await.map_err(&failed)?;

    let Json(update) = body.map_err(|why| {
        log::debug!("rejected location update: {}", why);
        RouteErrorResponse::bad_request("Invalid request format")
            .with_method(&Method::PUT)
            .with_uri(original_uri.path())
    })?;
    let coordinate = Coordinate::new(update.latitude, update.longitude)
        .map_err(|why| failed(why.into()))?;

    client
        .update_location(&user_id, coordinate)
        .await
        .map_err(&failed)?;

    Ok(Json("User location updated successfully"))
}

#[derive(Debug, Deserialize)]
pub(crate) struct UsersInLocationQuery {
    #[serde(default)]
    latitude: String,
    #[serde(default)]
    longitude: String,
    #[serde(default)]
    radius: String,
}

/// Users whose latest location is within `radius` degrees of the given point.
async fn users_in_location<D>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client }): State<WebState<D>>,
    params: Result<Query<UsersInLocationQuery>, QueryRejection>,
) -> RouteResult<Json<Vec<WithId<User>>>>
where
    D: Database + 'static,
{
    let failed = |why: RequestError| {
        RouteErrorResponse::from(why)
            .or_message("Failed to get users in location")
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    };

    let Query(params) = params.map_err(|_| {
        RouteErrorResponse::bad_request("Invalid request format")
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    })?;
    let center = Coordinate::from_parts(&params.latitude, &params.longitude)
        .map_err(|why| failed(why.into()))?;
    let radius =
        coordinate::parse_degree_radius(&params.radius).map_err(|why| failed(why.into()))?;

    let users = client
        .users_in_location(center, radius)
        .await
        .map_err(failed)?;

    Ok(Json(users))
}

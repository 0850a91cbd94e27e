pub use crate::common::RouteResult;

use std::{env, io};

use axum::Router;
use locator::{client::Client, database::Database};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod common;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:1323";

pub struct WebConfig {
    pub bind_address: String,
}

impl WebConfig {
    pub fn from_env() -> Self {
        Self {
            bind_address: env::var("WEB_BIND_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_owned()),
        }
    }
}

#[derive(Clone)]
pub struct WebState<D>
where
    D: Database + 'static,
{
    pub client: Client<D>,
}

impl<D> WebState<D>
where
    D: Database + 'static,
{
    pub fn new(client: Client<D>) -> Self {
        Self { client }
    }
}

pub fn router<D>(state: WebState<D>) -> Router
where
    D: Database + 'static,
{
    api::routes(state).layer(TraceLayer::new_for_http())
}

pub async fn serve<D>(listener: TcpListener, state: WebState<D>) -> io::Result<()>
where
    D: Database + 'static,
{
    axum::serve(listener, router(state).into_make_service()).await
}

//! Endpoints backed by a store whose connection is gone.

use std::io;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use locator::{
    client::Client,
    database::{
        Database, DatabaseAutocommit, DatabaseError, DatabaseOperations,
        DatabaseTransaction, LocationRepo, Result, UserRepo,
    },
};
use model::{
    location::LocationRecord,
    user::{User, Username},
    WithId,
};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use utility::{geo::DegreeBox, id::Id};
use web::WebState;

fn connection_lost<T>() -> Result<T> {
    Err(DatabaseError::other(io::Error::new(
        io::ErrorKind::ConnectionReset,
        "connection reset by peer",
    )))
}

/// Knows every user, but fails everything else.
#[derive(Debug, Clone)]
struct LostDatabase;

struct LostConnection;

#[async_trait]
impl UserRepo for LostConnection {
    async fn get_user(&mut self, id: &Id<User>) -> Result<WithId<User>> {
        Ok(WithId::new(
            *id,
            User {
                username: "walker1".parse().unwrap(),
            },
        ))
    }

    async fn user_by_username(&mut self, _username: &Username) -> Result<WithId<User>> {
        connection_lost()
    }

    async fn insert_user(&mut self, _user: User) -> Result<WithId<User>> {
        connection_lost()
    }

    async fn users_in_area(&mut self, _area: &DegreeBox) -> Result<Vec<WithId<User>>> {
        connection_lost()
    }
}

#[async_trait]
impl LocationRepo for LostConnection {
    async fn save_location(
        &mut self,
        _record: LocationRecord,
    ) -> Result<WithId<LocationRecord>> {
        connection_lost()
    }

    async fn locations_since(
        &mut self,
        _user_id: Option<&Id<User>>,
        _since: DateTime<Utc>,
    ) -> Result<Vec<LocationRecord>> {
        connection_lost()
    }
}

impl DatabaseOperations for LostConnection {}

impl DatabaseAutocommit for LostConnection {}

#[async_trait]
impl DatabaseTransaction for LostConnection {
    async fn commit(self) -> Result<()> {
        connection_lost()
    }
}

#[async_trait]
impl Database for LostDatabase {
    type Transaction = LostConnection;
    type Autocommit = LostConnection;

    async fn transaction(&self) -> Result<Self::Transaction> {
        Ok(LostConnection)
    }

    fn auto(&self) -> Self::Autocommit {
        LostConnection
    }
}

async fn start() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let state = WebState::new(Client::new("test", LostDatabase));
    tokio::spawn(web::serve(listener, state));
    format!("http://{}", address)
}

async fn expect_failure(response: reqwest::Response, message: &str) {
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], message);
}

#[tokio::test]
async fn update_location_reports_store_failure() {
    let base_url = start().await;
    let response = reqwest::Client::new()
        .put(format!("{}/location/1", base_url))
        .json(&json!({ "latitude": 54.32, "longitude": 10.13 }))
        .send()
        .await
        .unwrap();
    expect_failure(response, "Failed to update user location").await;
}

#[tokio::test]
async fn users_in_location_reports_store_failure() {
    let base_url = start().await;
    let response = reqwest::Client::new()
        .get(format!("{}/location/usersinlocation", base_url))
        .query(&[("latitude", "54.3"), ("longitude", "10.1"), ("radius", "0.1")])
        .send()
        .await
        .unwrap();
    expect_failure(response, "Failed to get users in location").await;
}

#[tokio::test]
async fn distance_traveled_reports_store_failure() {
    let base_url = start().await;
    let http = reqwest::Client::new();

    for query in [
        vec![("datetime", "2024-04-01T00:00:00+00:00")],
        vec![("datetime", "2024-04-01T00:00:00+00:00"), ("userId", "1")],
    ] {
        let response = http
            .get(format!("{}/locationhistory/distancetraveled", base_url))
            .query(&query)
            .send()
            .await
            .unwrap();
        expect_failure(response, "Failed to fetch locations").await;
    }
}

#[tokio::test]
async fn user_endpoints_report_store_failure() {
    let base_url = start().await;
    let http = reqwest::Client::new();

    let response = http
        .post(format!("{}/user", base_url))
        .json(&json!({ "username": "walker1" }))
        .send()
        .await
        .unwrap();
    expect_failure(response, "Failed to create user").await;

    let response = http
        .get(format!("{}/user/walker1", base_url))
        .send()
        .await
        .unwrap();
    expect_failure(response, "Failed to fetch user").await;
}

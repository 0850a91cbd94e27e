use chrono::{TimeZone, Utc};
use locator::{client::Client, memory::MemoryDatabase};
use model::{coordinate::Coordinate, location::LocationRecord};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use utility::id::Id;
use web::WebState;

struct TestServer {
    base_url: String,
    client: Client<MemoryDatabase>,
    http: reqwest::Client,
}

impl TestServer {
    async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let client = Client::new("test", MemoryDatabase::new());
        tokio::spawn(web::serve(listener, WebState::new(client.clone())));
        Self {
            base_url: format!("http://{}", address),
            client,
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create_user(&self, username: &str) -> i64 {
        let response = self
            .http
            .post(self.url("/user"))
            .json(&json!({ "username": username }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        response.json::<Value>().await.unwrap()["id"].as_i64().unwrap()
    }

    async fn put_location(&self, user_id: &str, body: Value) -> (StatusCode, Value) {
        let response = self
            .http
            .put(self.url(&format!("/location/{}", user_id)))
            .json(&body)
            .send()
            .await
            .unwrap();
        (response.status(), response.json().await.unwrap())
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> (StatusCode, Value) {
        let response = self
            .http
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .unwrap();
        (response.status(), response.json().await.unwrap())
    }
}

#[tokio::test]
async fn ping() {
    let server = TestServer::start().await;
    let (status, body) = server.get("/ping", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "pong!" }));
}

#[tokio::test]
async fn unknown_route_is_a_json_404() {
    let server = TestServer::start().await;
    let (status, body) = server.get("/nowhere", &[]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["httpMethod"], "GET");
    assert_eq!(body["requestedUri"], "/nowhere");
}

#[tokio::test]
async fn users_are_created_and_found() {
    let server = TestServer::start().await;
    let id = server.create_user("user1212").await;

    let (status, body) = server.get("/user/user1212", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": id, "username": "user1212" }));

    let (status, body) = server.get("/user/nobody99", &[]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");

    let duplicate = server
        .http
        .post(server.url("/user"))
        .json(&json!({ "username": "user1212" }))
        .send()
        .await
        .unwrap();
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let invalid = server
        .http
        .post(server.url("/user"))
        .json(&json!({ "username": "ab1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    let body: Value = invalid.json().await.unwrap();
    assert_eq!(
        body["message"],
        "Invalid username. Use 4 to 16 letters and digits, e.g. user1212"
    );
}

#[tokio::test]
async fn location_update_is_persisted() {
    let server = TestServer::start().await;
    let id = server.create_user("walker1").await;

    let (status, body) = server
        .put_location(&id.to_string(), json!({ "latitude": 54.32, "longitude": 10.13 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("User location updated successfully"));
    assert_eq!(server.client.database.location_count().await, 1);
}

#[tokio::test]
async fn location_update_rejections() {
    let server = TestServer::start().await;
    let id = server.create_user("walker1").await.to_string();
    let valid = json!({ "latitude": 1.0, "longitude": 1.0 });

    let (status, body) = server.put_location("9999", valid.clone()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
    assert_eq!(body["httpMethod"], "PUT");
    assert_eq!(body["requestedUri"], "/location/9999");

    let (status, body) = server.put_location("walker1", valid).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");

    let (status, body) = server
        .put_location(&id, json!({ "latitude": "north", "longitude": 1.0 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid request format");

    let (status, body) = server
        .put_location(&id, json!({ "latitude": 91.0, "longitude": 0.0 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Latitude out of range (-90 to 90)");

    let (status, body) = server
        .put_location(&id, json!({ "latitude": 0.0, "longitude": -180.5 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Longitude out of range (-180 to 180)");

    assert_eq!(server.client.database.location_count().await, 0);
}

#[tokio::test]
async fn users_in_location() {
    let server = TestServer::start().await;
    let near = server.create_user("near1").await;
    let far = server.create_user("far1").await;
    server
        .put_location(&near.to_string(), json!({ "latitude": 54.32, "longitude": 10.13 }))
        .await;
    server
        .put_location(&far.to_string(), json!({ "latitude": 48.14, "longitude": 11.58 }))
        .await;

    let (status, body) = server
        .get(
            "/location/usersinlocation",
            &[("latitude", "54.3"), ("longitude", "10.1"), ("radius", "0.1")],
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "id": near, "username": "near1" }]));

    let (status, body) = server
        .get(
            "/location/usersinlocation",
            &[("latitude", "0"), ("longitude", "0"), ("radius", "1")],
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn users_in_location_rejects_bad_parameters() {
    let server = TestServer::start().await;
    let cases = [
        ([("latitude", "abc"), ("longitude", "0"), ("radius", "1")], "Invalid latitude"),
        ([("latitude", "0"), ("longitude", ""), ("radius", "1")], "Invalid longitude"),
        ([("latitude", "0"), ("longitude", "0"), ("radius", "wide")], "Invalid radius"),
        ([("latitude", "0"), ("longitude", "0"), ("radius", "-1")], "Invalid radius"),
    ];
    for (query, message) in cases {
        let (status, body) = server.get("/location/usersinlocation", &query).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{:?}", query);
        assert_eq!(body["message"], message);
    }
}

#[tokio::test]
async fn distance_traveled() {
    let server = TestServer::start().await;
    let id = Id::new(server.create_user("walker1").await);
    for (hour, longitude) in [(13, 1.0), (12, 0.0)] {
        let timestamp = Utc.with_ymd_and_hms(2024, 4, 1, hour, 0, 0).unwrap();
        let coordinate = Coordinate::new(0.0, longitude).unwrap();
        server
            .client
            .database
            .insert_location(LocationRecord::new(id, coordinate, timestamp))
            .await
            .unwrap();
    }

    let (status, body) = server
        .get(
            "/locationhistory/distancetraveled",
            &[("datetime", "2024-04-01T00:00:00+00:00")],
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!("Total distance traveled since 2024-04-01T00:00:00+00:00: 111.19 kilometers")
    );

    let user_id = id.to_string();
    let (status, body) = server
        .get(
            "/locationhistory/distancetraveled",
            &[("datetime", "2024-04-01T12:30:00Z"), ("userId", &user_id)],
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!("Total distance traveled since 2024-04-01T12:30:00Z: 0.00 kilometers")
    );
}

#[tokio::test]
async fn distance_traveled_rejections() {
    let server = TestServer::start().await;

    for datetime in ["2024-04-01", "2024-04-01T12:00:00", "2024/04/01T12:00:00+00:00"] {
        let (status, body) = server
            .get("/locationhistory/distancetraveled", &[("datetime", datetime)])
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", datetime);
        assert_eq!(body["message"], "Invalid date format");
    }

    let (status, body) = server
        .get(
            "/locationhistory/distancetraveled",
            &[("datetime", "2024-04-01T00:00:00Z"), ("userId", "42")],
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}

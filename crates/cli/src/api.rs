//! Requests against a running GoLocator server.

use model::user::Username;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Invalid Response ({status_code}) {url}: {message}")]
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        message: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserDto {
    pub id: i64,
    pub username: String,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DistanceQuery<'a> {
    datetime: &'a str,
    user_id: Option<i64>,
}

pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn user_by_username(&self, username: &Username) -> Result<UserDto, ApiError> {
        let url = self.url(&format!("/user/{}", username));
        log::debug!("GET {}", url);
        let response = self.http.get(&url).send().await?;
        parse(url, response).await
    }

    pub async fn update_location(
        &self,
        user_id: i64,
        latitude: f64,
        longitude: f64,
    ) -> Result<String, ApiError> {
        let url = self.url(&format!("/location/{}", user_id));
        log::debug!("PUT {}", url);
        let response = self
            .http
            .put(&url)
            .json(&json!({ "latitude": latitude, "longitude": longitude }))
            .send()
            .await?;
        parse(url, response).await
    }

    pub async fn users_in_location(
        &self,
        latitude: f64,
        longitude: f64,
        radius: f64,
    ) -> Result<Vec<UserDto>, ApiError> {
        let url = self.url("/location/usersinlocation");
        log::debug!("GET {}", url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("radius", radius.to_string()),
            ])
            .send()
            .await?;
        parse(url, response).await
    }

    pub async fn distance_traveled(
        &self,
        datetime: &str,
        user_id: Option<i64>,
    ) -> Result<String, ApiError> {
        let url = self.url("/locationhistory/distancetraveled");
        log::debug!("GET {}", url);
        let response = self
            .http
            .get(&url)
            .query(&DistanceQuery { datetime, user_id })
            .send()
            .await?;
        parse(url, response).await
    }
}

async fn parse<T>(url: String, response: reqwest::Response) -> Result<T, ApiError>
where
    T: for<'de> Deserialize<'de>,
{
    let status_code = response.status();
    if status_code.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.json::<Value>().await.ok();
    let message = body
        .as_ref()
        .and_then(|body| body.get("message"))
        .and_then(Value::as_str)
        .unwrap_or("no details")
        .to_owned();
    Err(ApiError::InvalidResponse {
        status_code,
        url,
        message,
    })
}

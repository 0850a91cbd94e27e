use axum::{
    extract::{OriginalUri, Request},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::MethodFilter,
    Json,
};
use locator::RequestError;
use serde::Serialize;

pub type RouteResult<O> = Result<O, RouteErrorResponse>;

/// A `MethodFilter` that matches all http methods.
pub(crate) const METHOD_FILTER_ALL: MethodFilter = MethodFilter::GET
    .or(MethodFilter::POST)
    .or(MethodFilter::PATCH)
    .or(MethodFilter::PUT)
    .or(MethodFilter::DELETE);

pub(crate) async fn route_not_found(
    OriginalUri(original_uri): OriginalUri,
    req: Request,
) -> impl IntoResponse {
    RouteErrorResponse::not_found(req.method(), original_uri.path())
}

// - Commonly used responeses -

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteErrorResponse {
    #[serde(skip)]
    pub status_code: StatusCode,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_uri: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RouteErrorResponse {
    pub fn new(status_code: StatusCode) -> Self {
        Self {
            status_code,
            http_method: None,
            requested_uri: None,
            message: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST).with_message(message)
    }

    pub fn not_found(method: &Method, uri: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND)
            .with_method(method)
            .with_uri(uri)
            .with_default_message()
    }

    pub fn with_method(mut self, method: &Method) -> Self {
        self.http_method = Some(method.to_string());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.requested_uri = Some(uri.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_default_message(self) -> Self {
        let message = self
            .status_code
            .canonical_reason()
            .unwrap_or("i dunno what happened here :/");
        self.with_message(message)
    }

    /// Replaces the message unless the error is a rejected input, whose
    /// message already tells the caller what to fix.
    pub fn or_message(self, message: impl Into<String>) -> Self {
        if self.status_code == StatusCode::BAD_REQUEST {
            self
        } else {
            self.with_message(message)
        }
    }
}

impl From<RequestError> for RouteErrorResponse {
    fn from(value: RequestError) -> Self {
        match value {
            RequestError::NotFound => Self::new(StatusCode::NOT_FOUND)
                .with_message("The requested item does not exist."),
            RequestError::Conflict => Self::new(StatusCode::CONFLICT)
                .with_message("The item conflicts with an existing one."),
            RequestError::Invalid(why) => Self::bad_request(why.to_string()),
            RequestError::StoreFailure(why) => {
                log::error!("store failure: {}", why);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR).with_default_message()
            }
        }
    }
}

impl IntoResponse for RouteErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (self.status_code, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use model::ValidationError;

    use super::*;

    #[test]
    fn request_errors_map_to_status_codes() {
        let cases = [
            (RequestError::NotFound, StatusCode::NOT_FOUND),
            (RequestError::Conflict, StatusCode::CONFLICT),
            (
                RequestError::Invalid(ValidationError::InvalidRadius),
                StatusCode::BAD_REQUEST,
            ),
            (
                RequestError::StoreFailure("connection reset".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status_code) in cases {
            assert_eq!(RouteErrorResponse::from(error).status_code, status_code);
        }
    }

    #[test]
    fn validation_message_survives_override() {
        let response = RouteErrorResponse::from(RequestError::Invalid(
            ValidationError::InvalidRadius,
        ))
        .or_message("Failed to get users in location");
        assert_eq!(response.message.as_deref(), Some("Invalid radius"));
    }

    #[test]
    fn serializes_without_missing_fields() {
        let response = RouteErrorResponse::not_found(&Method::GET, "/nowhere");
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({
                "httpMethod": "GET",
                "requestedUri": "/nowhere",
                "message": "Not Found",
            })
        );
    }
}

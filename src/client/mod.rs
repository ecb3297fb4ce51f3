//! HTTP client for the bug API.
//!
//! One method per operation, each a single round trip with no retry or
//! caching. Successful calls return the decoded response envelope unchanged.

mod error;

pub use error::ClientError;

use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::api::{ApiResponse, Empty};
use crate::models::{Bug, CreateBugRequest, UpdateBugRequest};

/// Collection path relative to the server root.
pub const BUGS_PATH: &str = "/api/v1/bugs";

pub const LIST_FAILED: &str = "Failed to fetch bugs";
pub const CREATE_FAILED: &str = "Failed to create bug";
pub const UPDATE_FAILED: &str = "Failed to update bug";
pub const DELETE_FAILED: &str = "Failed to delete bug";

/// Stateless client for the bug API.
#[derive(Debug, Clone)]
pub struct BugClient {
    http: reqwest::Client,
    base_url: String,
}

impl BugClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url)
    }

    /// Use a preconfigured `reqwest::Client` (headers, timeouts, proxies).
    pub fn with_http_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}{}", self.base_url, BUGS_PATH)
    }

    /// Item URL with `id` percent-encoded as a single path segment.
    fn item_url(&self, id: &str) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.collection_url())
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .push(id);
        Ok(url)
    }

    pub async fn list(&self) -> Result<ApiResponse<Vec<Bug>>, ClientError> {
        let response = self.http.get(self.collection_url()).send().await;
        decode(response, LIST_FAILED).await
    }

    pub async fn create(&self, fields: &CreateBugRequest) -> Result<ApiResponse<Bug>, ClientError> {
        let response = self
            .http
            .post(self.collection_url())
            .json(fields)
            .send()
            .await;
        decode(response, CREATE_FAILED).await
    }

    pub async fn update(
        &self,
        id: &str,
        fields: &UpdateBugRequest,
    ) -> Result<ApiResponse<Bug>, ClientError> {
        let response = self.http.put(self.item_url(id)?).json(fields).send().await;
        decode(response, UPDATE_FAILED).await
    }

    pub async fn delete(&self, id: &str) -> Result<ApiResponse<Empty>, ClientError> {
        let response = self.http.delete(self.item_url(id)?).send().await;
        decode(response, DELETE_FAILED).await
    }
}

/// Map a send result to the decoded envelope or the operation's fixed failure.
async fn decode<T: DeserializeOwned>(
    response: Result<Response, reqwest::Error>,
    failure: &'static str,
) -> Result<ApiResponse<T>, ClientError> {
    let response = response.map_err(|e| ClientError::Transport(e.to_string()))?;
    check_status(response.status(), failure)?;
    response
        .json::<ApiResponse<T>>()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}

fn check_status(status: StatusCode, failure: &'static str) -> Result<(), ClientError> {
    if status.is_success() {
        Ok(())
    } else {
        tracing::debug!(%status, "{}", failure);
        Err(ClientError::RequestFailed(failure))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        let client = BugClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.collection_url(), "http://localhost:5000/api/v1/bugs");
        assert_eq!(
            client.item_url("abc").unwrap().as_str(),
            "http://localhost:5000/api/v1/bugs/abc"
        );
    }

    #[test]
    fn item_url_encodes_id_as_one_segment() {
        let client = BugClient::new("http://localhost:5000");

        let url = client.item_url("a/b?c#d").unwrap();

        assert_eq!(url.as_str(), "http://localhost:5000/api/v1/bugs/a%2Fb%3Fc%23d");
        assert_eq!(url.query(), None);
        assert_eq!(url.path_segments().unwrap().count(), 4);
    }

    #[test]
    fn unparsable_base_url_is_reported() {
        let client = BugClient::new("not a url");
        assert!(matches!(client.item_url("abc"), Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn non_success_status_maps_to_fixed_message() {
        for status in [
            StatusCode::BAD_REQUEST,
            StatusCode::NOT_FOUND,
            StatusCode::CONFLICT,
            StatusCode::INTERNAL_SERVER_ERROR,
        ] {
            let err = check_status(status, UPDATE_FAILED).unwrap_err();
            assert_eq!(err, ClientError::RequestFailed(UPDATE_FAILED));
            assert_eq!(err.to_string(), "Failed to update bug");
        }
    }

    #[test]
    fn success_statuses_pass() {
        assert!(check_status(StatusCode::OK, LIST_FAILED).is_ok());
        assert!(check_status(StatusCode::CREATED, CREATE_FAILED).is_ok());
    }

    #[tokio::test]
    async fn unreachable_server_is_transport_error() {
        // Bind then drop so the port is very likely closed.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = BugClient::new(&format!("http://{}", addr));
        let err = client.list().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}

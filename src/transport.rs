// JSON API transport: GET per page resource, POST for appliance toggles.
// Every failure is normalized to ApiError here and never propagates further as a panic.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::instrument;

use crate::error::ApiError;
use crate::models::ApplianceState;
use crate::version;

/// Fixed path prefix of the dashboard API.
pub const API_PREFIX: &str = "/api";

/// Resources the dashboard talks to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Battery,
    Floors,
    Floor(String),
    Room(String),
    Visitors,
    ToggleAppliance,
}

impl Endpoint {
    /// Path below [`API_PREFIX`], e.g. `floor/floor1`.
    pub fn path(&self) -> String {
        match self {
            Endpoint::Battery => "battery".into(),
            Endpoint::Floors => "floors".into(),
            Endpoint::Floor(id) => format!("floor/{id}"),
            Endpoint::Room(id) => format!("room/{id}"),
            Endpoint::Visitors => "visitors".into(),
            Endpoint::ToggleAppliance => "toggle-appliance".into(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", API_PREFIX, self.path())
    }
}

/// Raw JSON exchange with the API. Implementations normalize transport and status
/// failures; inspecting the body for an `error` field is done by [`fetch`] and
/// [`toggle_appliance`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, endpoint: &Endpoint) -> Result<Value, ApiError>;
    async fn post_json(&self, endpoint: &Endpoint, body: &Value) -> Result<Value, ApiError>;
}

/// GET `endpoint` and decode the page snapshot.
pub async fn fetch<S: DeserializeOwned>(
    transport: &dyn Transport,
    endpoint: &Endpoint,
) -> Result<S, ApiError> {
    let body = transport.get_json(endpoint).await?;
    if let Some(e) = ApiError::from_body(&body) {
        return Err(e);
    }
    serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// POST `{ appliance_id, state }`. Success is the absence of an `error` field.
pub async fn toggle_appliance(
    transport: &dyn Transport,
    appliance_id: &str,
    state: ApplianceState,
) -> Result<(), ApiError> {
    let body = json!({ "appliance_id": appliance_id, "state": state });
    let response = transport
        .post_json(&Endpoint::ToggleAppliance, &body)
        .await?;
    match ApiError::from_body(&response) {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// reqwest-backed transport against `<base_url>/api/...`.
#[derive(Clone)]
pub struct HttpTransport {
    base_url: String,
    client: Client,
}

impl HttpTransport {
    /// `timeout` of None leaves requests unbounded.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(version::user_agent());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn send(&self, request: RequestBuilder, endpoint: &Endpoint) -> Result<Value, ApiError> {
        let response = request.send().await.map_err(|e| {
            tracing::debug!(error = %e, %endpoint, "request failed");
            ApiError::Transport(e.to_string())
        })?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), %endpoint, "non-success status");
            return Err(ApiError::Status(status.as_u16()));
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self), fields(operation = "get_json"))]
    async fn get_json(&self, endpoint: &Endpoint) -> Result<Value, ApiError> {
        self.send(self.client.get(self.url(endpoint)), endpoint)
            .await
    }

    #[instrument(skip(self, body), fields(operation = "post_json"))]
    async fn post_json(&self, endpoint: &Endpoint, body: &Value) -> Result<Value, ApiError> {
        self.send(self.client.post(self.url(endpoint)).json(body), endpoint)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_paths() {
        assert_eq!(Endpoint::Battery.to_string(), "/api/battery");
        assert_eq!(Endpoint::Floor("floor2".into()).to_string(), "/api/floor/floor2");
        assert_eq!(Endpoint::Room("r1".into()).path(), "room/r1");
        assert_eq!(
            Endpoint::ToggleAppliance.to_string(),
            "/api/toggle-appliance"
        );
    }

    #[test]
    fn url_joins_base_without_double_slash() {
        let t = HttpTransport::new("http://localhost:5004/", None).unwrap();
        assert_eq!(t.url(&Endpoint::Floors), "http://localhost:5004/api/floors");
    }
}

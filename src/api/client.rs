use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use super::model::{DeleteOutcome, HealthStatus, User, UserPayload};
use super::transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
use crate::config::ApiConfig;
use crate::error::{Error, Result};

/// Typed client for the `users` REST resource.
///
/// Holds only its fixed configuration: no session, no cache. Every call is a
/// single request; failures are returned to the caller untouched.
pub struct ApiClient<T = HttpTransport> {
    config: ApiConfig,
    headers: HeaderMap,
    transport: T,
}

impl ApiClient<HttpTransport> {
    /// Client over a fresh `reqwest` transport.
    pub fn new(config: ApiConfig) -> Result<Self> {
        Ok(Self::with_transport(config, HttpTransport::new()?))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(config: ApiConfig, transport: T) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self { config, headers, transport }
    }

    pub fn host(&self) -> &str {
        self.config.host()
    }

    pub fn base_url(&self) -> String {
        self.config.base_url()
    }

    /// Headers sent with every request.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `GET /users`. An empty or falsy body (`null`, `false`, `0`, `""`)
    /// yields an empty list; order is the backend's.
    pub async fn get_users(&self) -> Result<Vec<User>> {
        let response = self.request(Method::GET, "/users", None).await?;
        if response.is_empty_body() {
            return Ok(Vec::new());
        }
        let value: serde_json::Value = serde_json::from_slice(&response.body)?;
        if is_falsy(&value) {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(value)?)
    }

    /// `GET /users/{id}`.
    pub async fn get_user(&self, id: i64) -> Result<User> {
        let response = self.request(Method::GET, &format!("/users/{id}"), None).await?;
        decode(&response)
    }

    /// `POST /users` with `{name, email}`; the response carries the new `id`.
    pub async fn create_user(&self, name: &str, email: &str) -> Result<User> {
        let body = serde_json::to_vec(&UserPayload { name, email })?;
        let response = self.request(Method::POST, "/users", Some(body)).await?;
        decode(&response)
    }

    /// `PUT /users/{id}` with `{name, email}`.
    pub async fn update_user(&self, id: i64, name: &str, email: &str) -> Result<User> {
        let body = serde_json::to_vec(&UserPayload { name, email })?;
        let response = self.request(Method::PUT, &format!("/users/{id}"), Some(body)).await?;
        decode(&response)
    }

    /// `DELETE /users/{id}`, without a body. The response may be empty.
    pub async fn delete_user(&self, id: i64) -> Result<DeleteOutcome> {
        let response = self.request(Method::DELETE, &format!("/users/{id}"), None).await?;
        if response.is_empty_body() {
            return Ok(DeleteOutcome::default());
        }
        decode(&response)
    }

    /// `GET /health`.
    pub async fn health(&self) -> Result<HealthStatus> {
        let response = self.request(Method::GET, "/health", None).await?;
        decode(&response)
    }

    async fn request(&self, method: Method, endpoint: &str, body: Option<Vec<u8>>) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url(), endpoint);
        tracing::debug!(%method, %url, "sending request");
        let request = ApiRequest {
            method: method.clone(),
            url: url.clone(),
            headers: self.headers.clone(),
            body,
        };
        let response = match self.transport.send(request).await {
            Ok(r) => r,
            Err(err) => {
                tracing::warn!(%method, %url, error = %err, "request failed");
                return Err(err);
            }
        };
        if !response.is_success() {
            let message = error_message(&response);
            tracing::warn!(%method, %url, status = response.status, ?message, "backend rejected request");
            return Err(Error::Status { status: response.status, message });
        }
        Ok(response)
    }
}

fn is_falsy(value: &serde_json::Value) -> bool {
    use serde_json::Value;
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn decode<R: DeserializeOwned>(response: &ApiResponse) -> Result<R> {
    Ok(serde_json::from_slice(&response.body)?)
}

/// Pull `error` out of a `{"error": "..."}` body, if that is what we got.
fn error_message(response: &ApiResponse) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(&response.body).ok()?;
    value.get("error")?.as_str().map(str::to_string)
}

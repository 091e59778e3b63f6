use reqwest::{Client, Method, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::error::Error;
use std::fmt;

/// Default location of the remote API.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// A failed remote call: a transport failure, or a non-success status with its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    status: Option<u16>,
    message: String,
}

impl HttpError {
    /// An error that never produced an HTTP status (connection refused, bad body, ...).
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// An error response from the server.
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// The HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// The error details: the response body, or the transport error.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The server's `failureMessage`, when the error body carries one.
    pub fn failure_message(&self) -> Option<String> {
        let body: Value = serde_json::from_str(&self.message).ok()?;
        body.get("failureMessage")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {}: {}", status, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl Error for HttpError {}

impl From<reqwest::Error> for HttpError {
    fn from(e: reqwest::Error) -> Self {
        HttpError {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}

/// A JSON client for one API root.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Creates a client for the API rooted at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, HttpError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| HttpError::new(format!("Invalid base URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(HttpError::new(format!(
                "Invalid base URL '{}': expected an http(s) URL",
                base_url
            )));
        }
        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    /// The root every request path is appended to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Constructs a full API URL from path segments, percent-encoding each segment
    pub fn api_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Makes a GET request and deserializes the response
    pub async fn get<T>(&self, segments: &[&str]) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let body = self.send(Method::GET, segments, None::<&()>).await?;
        serde_json::from_value(body)
            .map_err(|e| HttpError::new(format!("Unexpected response body: {}", e)))
    }

    /// Makes a POST request with JSON body and returns the response body
    pub async fn post<B>(&self, segments: &[&str], body: &B) -> Result<Value, HttpError>
    where
        B: Serialize,
    {
        self.send(Method::POST, segments, Some(body)).await
    }

    /// Makes a PUT request with JSON body and returns the response body
    pub async fn put<B>(&self, segments: &[&str], body: &B) -> Result<Value, HttpError>
    where
        B: Serialize,
    {
        self.send(Method::PUT, segments, Some(body)).await
    }

    /// Makes a DELETE request (no body expected)
    pub async fn delete(&self, segments: &[&str]) -> Result<(), HttpError> {
        self.send(Method::DELETE, segments, None::<&()>)
            .await
            .map(|_| ())
    }

    async fn send<B>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<Value, HttpError>
    where
        B: Serialize,
    {
        let url = self.api_url(segments);
        tracing::debug!(%method, path = %logged_path(segments), "issuing request");
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Handles HTTP response, reading a success body leniently or returning error
    async fn handle_response(&self, response: Response) -> Result<Value, HttpError> {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if status.is_success() {
            if text.trim().is_empty() {
                Ok(Value::Null)
            } else {
                Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
            }
        } else {
            let msg = if text.is_empty() {
                "No error details".to_string()
            } else {
                text
            };
            Err(HttpError::with_status(status.as_u16(), msg))
        }
    }
}

/// The request path as logged.  Credentials travel in `user/...` paths, so only the
/// endpoint is kept for those.
fn logged_path(segments: &[&str]) -> String {
    match segments {
        ["user", endpoint, ..] => format!("user/{}", endpoint),
        _ => segments.join("/"),
    }
}

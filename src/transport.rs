// HTTP transport: URL construction, JSON bodies, default headers and the retry loop

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;
use serde::Serialize;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ApiError, ClientError, Result};
use crate::retry::{is_retryable_status, RetryConfig};

const IDLE_CONNECTION_TIMEOUT: Duration = Duration::from_secs(90);

/// One logical call into the backend. `path` is relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds the header only when `value` is non-empty.
    pub fn optional_header(self, name: impl Into<String>, value: &str) -> Self {
        if value.is_empty() {
            self
        } else {
            self.header(name, value)
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let value =
            serde_json::to_value(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }
}

/// What came back for the attempt that ended the retry loop.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

// Seam between the token manager / facade and the network
#[async_trait]
pub trait HttpExecutor: Send + Sync {
    async fn execute(&self, request: &HttpRequest, cancel: &CancellationToken)
        -> Result<HttpResponse>;
}

pub struct Transport {
    client: reqwest::Client,
    base_url: Url,
    user_agent: String,
    retry: RetryConfig,
}

impl Transport {
    pub fn new(config: &ClientConfig) -> std::result::Result<Self, ClientError> {
        config.validate()?;
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::Config(format!("invalid base url: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(config.http.timeout)
            .pool_idle_timeout(IDLE_CONNECTION_TIMEOUT)
            .pool_max_idle_per_host(config.http.max_idle_conns.min(config.http.max_conns_per_host))
            .build()
            .map_err(|e| ClientError::Init(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            user_agent: config.http.user_agent.clone(),
            retry: config.retry.clone(),
        })
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Resolves `path` against the base URL; a non-empty `query` replaces any query in `path`.
    pub fn build_url(&self, path: &str, query: &[(String, String)]) -> Result<Url> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))?;
        if !query.is_empty() {
            url.set_query(None);
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url)
    }

    fn build_headers(&self, request: &HttpRequest) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let user_agent = HeaderValue::from_str(&self.user_agent)
            .map_err(|e| ApiError::InvalidHeader(format!("User-Agent: {e}")))?;
        headers.insert(USER_AGENT, user_agent);

        for (name, value) in &request.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::InvalidHeader(format!("{name}: {e}")))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| ApiError::InvalidHeader(format!("{name}: {e}")))?;
            headers.insert(header_name, header_value);
        }
        Ok(headers)
    }

    async fn send_once(
        &self,
        method: &Method,
        url: &Url,
        headers: &HeaderMap,
        body: Option<&Bytes>,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse> {
        let mut builder = self
            .client
            .request(method.clone(), url.clone())
            .headers(headers.clone());
        if let Some(body) = body {
            builder = builder.body(body.clone());
        }

        let exchange = async {
            let response = builder
                .send()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;
            let status = response.status().as_u16();
            let headers = response.headers().clone();
            let body = response
                .bytes()
                .await
                .map_err(|e| ApiError::Network(format!("failed to read response body: {e}")))?;
            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ApiError::Cancelled),
            result = exchange => result,
        }
    }
}

#[async_trait]
impl HttpExecutor for Transport {
    async fn execute(
        &self,
        request: &HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse> {
        let url = self.build_url(&request.path, &request.query)?;
        let headers = self.build_headers(request)?;
        let body = match &request.body {
            Some(value) => Some(Bytes::from(
                serde_json::to_vec(value).map_err(|e| ApiError::Serialization(e.to_string()))?,
            )),
            None => None,
        };

        let max_attempts = self.retry.max_attempts();
        let mut last_error = None;

        for attempt in 0..max_attempts {
            if attempt > 0 {
                let delay = self.retry.delay_for_attempt(attempt);
                warn!(
                    "{} {} failed (attempt {}), retrying after {:?}: {}",
                    request.method,
                    request.path,
                    attempt,
                    delay,
                    last_error.as_ref().map(ToString::to_string).unwrap_or_default()
                );
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(ApiError::Cancelled),
                    _ = sleep(delay) => {}
                }
            }

            debug!(method = %request.method, %url, attempt, "sending request");
            match self
                .send_once(&request.method, &url, &headers, body.as_ref(), cancel)
                .await
            {
                Ok(response) if is_retryable_status(response.status) => {
                    last_error = Some(ApiError::Server {
                        status: response.status,
                        body: response.body_text(),
                    });
                }
                Ok(response) => return Ok(response),
                Err(ApiError::Cancelled) => return Err(ApiError::Cancelled),
                Err(e) => last_error = Some(e),
            }
        }

        Err(ApiError::RetriesExhausted {
            attempts: max_attempts,
            last: Box::new(
                last_error.unwrap_or_else(|| ApiError::Network("no attempt was made".to_string())),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use std::time::Instant;

    fn config_for(base_url: &str, max_retries: u32) -> ClientConfig {
        ClientConfig::default()
            .with_base_url(base_url)
            .unwrap()
            .with_credentials("key", "secret")
            .unwrap()
            .with_retry_config(max_retries, Duration::from_millis(10), Duration::from_millis(40))
            .unwrap()
    }

    #[test]
    fn test_build_url_joins_path_and_query() {
        let transport = Transport::new(&config_for("https://api.example.com", 0)).unwrap();

        let url = transport.build_url("/api/search/hotelList", &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/api/search/hotelList");

        let query = vec![
            ("pageNum".to_string(), "2".to_string()),
            ("q".to_string(), "Dubai Marina".to_string()),
        ];
        let url = transport.build_url("/api/x?old=1", &query).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/api/x?pageNum=2&q=Dubai+Marina"
        );
    }

    #[test]
    fn test_request_builder_skips_empty_optional_headers() {
        let request = HttpRequest::post("/api/trade/book")
            .optional_header("Session-Id", "")
            .optional_header("Test", "scenario=ok");
        assert_eq!(
            request.headers,
            vec![("Test".to_string(), "scenario=ok".to_string())]
        );
    }

    #[tokio::test]
    async fn test_sends_body_and_default_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/echo")
            .match_header("content-type", "application/json")
            .match_header("user-agent", "custom-agent")
            .match_header("authorization", "Bearer abc")
            .match_query(Matcher::UrlEncoded("lang".into(), "en".into()))
            .match_body(Matcher::Json(serde_json::json!({"hotelId": "42"})))
            .with_status(200)
            .with_header("Trace-Id", "trace-1")
            .with_body(r#"{"code":0,"data":{}}"#)
            .expect(1)
            .create_async()
            .await;

        let transport = Transport::new(&config_for(&server.url(), 2)).unwrap();
        let request = HttpRequest::post("/api/echo")
            .query("lang", "en")
            .header("User-Agent", "custom-agent")
            .header("Authorization", "Bearer abc")
            .json(&serde_json::json!({"hotelId": "42"}))
            .unwrap();

        let response = transport
            .execute(&request, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.header("trace-id"), Some("trace-1"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_errors_are_retried_until_exhausted() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/flaky")
            .with_status(500)
            .with_body("boom")
            .expect(4)
            .create_async()
            .await;

        let transport = Transport::new(&config_for(&server.url(), 3)).unwrap();
        let err = transport
            .execute(&HttpRequest::post("/api/flaky"), &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            ApiError::RetriesExhausted { attempts, last } => {
                assert_eq!(attempts, 4);
                assert!(matches!(*last, ApiError::Server { status: 500, .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_too_many_requests_is_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/limited")
            .with_status(429)
            .expect(2)
            .create_async()
            .await;

        let transport = Transport::new(&config_for(&server.url(), 1)).unwrap();
        let err = transport
            .execute(&HttpRequest::get("/api/limited"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(429));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_client_errors_are_returned_without_retry() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/missing")
            .with_status(404)
            .with_body("not found")
            .expect(1)
            .create_async()
            .await;

        let transport = Transport::new(&config_for(&server.url(), 3)).unwrap();
        let response = transport
            .execute(&HttpRequest::post("/api/missing"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.status, 404);
        assert_eq!(response.body_text(), "not found");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_connection_failures_are_retried_then_reported() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = Transport::new(&config_for(&format!("http://{addr}"), 2)).unwrap();
        let err = transport
            .execute(&HttpRequest::post("/api/down"), &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            ApiError::RetriesExhausted { attempts, last } => {
                assert_eq!(attempts, 3);
                assert!(matches!(*last, ApiError::Network(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cancellation_interrupts_backoff() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/slow-retry")
            .with_status(503)
            .expect(1)
            .create_async()
            .await;

        let config = config_for(&server.url(), 5)
            .with_retry_config(5, Duration::from_secs(30), Duration::from_secs(60))
            .unwrap();
        let transport = Transport::new(&config).unwrap();

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let err = transport
            .execute(&HttpRequest::post("/api/slow-retry"), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(5));
        mock.assert_async().await;
    }

    #[test]
    fn test_new_rejects_unvalidated_retry_policy() {
        let mut config = config_for("https://api.example.com", 3);
        config.retry.backoff_factor = -2.0;

        let err = Transport::new(&config).err().unwrap();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[tokio::test]
    async fn test_cancellation_aborts_in_flight_request() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accepts connections and never answers
        let silent = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let transport = Transport::new(&config_for(&format!("http://{addr}"), 3)).unwrap();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let err = transport
            .execute(&HttpRequest::post("/api/hang"), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(5));
        silent.abort();
    }

    #[tokio::test]
    async fn test_already_cancelled_token_makes_no_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/never")
            .with_status(200)
            .expect(0)
            .create_async()
            .await;

        let transport = Transport::new(&config_for(&server.url(), 3)).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = transport
            .execute(&HttpRequest::post("/api/never"), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Cancelled));
        mock.assert_async().await;
    }
}

// Bearer token lifecycle: acquisition, expiry tracking, proactive refresh, header value

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::Credentials;
use crate::envelope;
use crate::error::{ApiError, Result};
use crate::protocol::{AuthReq, AuthResp};
use crate::transport::{HttpExecutor, HttpRequest};

pub const AUTH_TICKET_PATH: &str = "/api/auth/ticket";

/// Lifetime requested for every ticket.
pub fn ticket_ttl() -> Duration {
    Duration::hours(24)
}

/// A token is treated as stale this long before it actually expires.
pub fn refresh_skew() -> Duration {
    Duration::minutes(5)
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// An empty value means "not authenticated"; a non-empty value always has an expiry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Token {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl Token {
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            expires_at: Some(expires_at),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) if !self.value.is_empty() => now < expires_at - refresh_skew(),
            _ => false,
        }
    }

    /// `"Bearer <token>"`, or an empty string for an empty token.
    pub fn authorization_header_value(&self) -> String {
        if self.value.is_empty() {
            String::new()
        } else {
            format!("Bearer {}", self.value)
        }
    }
}

pub struct TokenManager {
    credentials: Credentials,
    clock: Arc<dyn Clock>,
    token: RwLock<Token>,
    // Serializes ticket exchanges so concurrent callers share one result
    exchange: Mutex<()>,
}

impl TokenManager {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_clock(credentials, Arc::new(SystemClock))
    }

    pub fn with_clock(credentials: Credentials, clock: Arc<dyn Clock>) -> Self {
        Self {
            credentials,
            clock,
            token: RwLock::new(Token::default()),
            exchange: Mutex::new(()),
        }
    }

    pub fn token(&self) -> Token {
        self.token.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_fresh_at(self.clock.now())
    }

    /// `"Bearer <token>"`, or an empty string when no token is held.
    pub fn authorization_header_value(&self) -> String {
        self.token.read().authorization_header_value()
    }

    fn fresh_token(&self) -> Option<Token> {
        let token = self.token.read();
        if token.is_fresh_at(self.clock.now()) {
            Some(token.clone())
        } else {
            None
        }
    }

    pub fn clear(&self) {
        *self.token.write() = Token::default();
    }

    /// Returns the held token while it is fresh; otherwise exchanges credentials for a new ticket.
    ///
    /// The returned token is a snapshot and stays usable if another caller clears or
    /// replaces the held one afterwards.
    pub async fn ensure_authenticated(
        &self,
        executor: &dyn HttpExecutor,
        cancel: &CancellationToken,
    ) -> Result<Token> {
        if let Some(token) = self.fresh_token() {
            return Ok(token);
        }

        let _guard = self.lock_exchange(cancel).await?;
        // Another caller may have refreshed while we waited
        if let Some(token) = self.fresh_token() {
            debug!("reusing ticket acquired by a concurrent caller");
            return Ok(token);
        }
        self.exchange_ticket(executor, cancel).await
    }

    /// Drops the held token and unconditionally acquires a new one.
    pub async fn force_refresh(
        &self,
        executor: &dyn HttpExecutor,
        cancel: &CancellationToken,
    ) -> Result<Token> {
        let _guard = self.lock_exchange(cancel).await?;
        self.clear();
        self.exchange_ticket(executor, cancel).await
    }

    async fn lock_exchange(
        &self,
        cancel: &CancellationToken,
    ) -> Result<tokio::sync::MutexGuard<'_, ()>> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ApiError::Cancelled),
            guard = self.exchange.lock() => Ok(guard),
        }
    }

    async fn exchange_ticket(
        &self,
        executor: &dyn HttpExecutor,
        cancel: &CancellationToken,
    ) -> Result<Token> {
        let ttl = ticket_ttl();
        let issued_at = self.clock.now();
        let request = HttpRequest::post(AUTH_TICKET_PATH).json(&AuthReq {
            app_key: self.credentials.app_key.clone(),
            app_secret: self.credentials.app_secret.clone(),
            ttl: ttl.num_seconds(),
        })?;

        let response = match executor.execute(&request, cancel).await {
            Ok(response) => response,
            Err(ApiError::Cancelled) => return Err(ApiError::Cancelled),
            Err(e) => return Err(ApiError::authentication("ticket exchange failed", Some(e))),
        };

        if response.status >= 400 {
            return Err(ApiError::authentication(
                format!("ticket endpoint returned HTTP {}", response.status),
                Some(ApiError::HttpStatus {
                    status: response.status,
                    body: response.body_text(),
                }),
            ));
        }

        let ticket: AuthResp = envelope::decode_response(&response)
            .map_err(|e| ApiError::authentication("ticket exchange rejected", Some(e)))?;
        if ticket.ticket.is_empty() {
            return Err(ApiError::authentication(
                "backend returned an empty ticket",
                None,
            ));
        }

        let expires_at = issued_at + ttl;
        let token = Token::new(ticket.ticket, expires_at);
        *self.token.write() = token.clone();
        info!(app_key = %self.credentials.app_key, %expires_at, "acquired access ticket");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::HttpResponse;
    use async_trait::async_trait;
    use bytes::Bytes;
    use reqwest::header::HeaderMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ManualClock {
        now: parking_lot::Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                now: parking_lot::Mutex::new(Utc::now()),
            })
        }

        fn advance(&self, by: Duration) {
            *self.now.lock() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock()
        }
    }

    struct TicketServer {
        calls: AtomicUsize,
        status: u16,
        body: &'static str,
        latency: std::time::Duration,
    }

    impl TicketServer {
        fn replying(status: u16, body: &'static str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                status,
                body,
                latency: std::time::Duration::ZERO,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HttpExecutor for TicketServer {
        async fn execute(
            &self,
            request: &HttpRequest,
            _cancel: &CancellationToken,
        ) -> Result<HttpResponse> {
            assert_eq!(request.path, AUTH_TICKET_PATH);
            let body = request.body.as_ref().unwrap();
            assert_eq!(body["appKey"], "key");
            assert_eq!(body["ttl"], 86400);

            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            Ok(HttpResponse {
                status: self.status,
                headers: HeaderMap::new(),
                body: Bytes::from_static(self.body.as_bytes()),
            })
        }
    }

    const OK_TICKET: &str = r#"{"code":0,"msg":"","data":{"ticket":"tkt-1"}}"#;

    fn manager(clock: Arc<ManualClock>) -> TokenManager {
        TokenManager::with_clock(Credentials::new("key", "secret"), clock)
    }

    #[test]
    fn test_token_freshness_window() {
        let now = Utc::now();
        let token = Token::new("abc", now + Duration::hours(24));
        assert!(token.is_fresh_at(now));
        assert!(token.is_fresh_at(now + Duration::hours(23) + Duration::minutes(54)));
        assert!(!token.is_fresh_at(now + Duration::hours(23) + Duration::minutes(56)));
        assert!(!Token::default().is_fresh_at(now));
    }

    #[tokio::test]
    async fn test_fresh_token_skips_exchange() {
        let clock = ManualClock::new();
        let tokens = manager(clock.clone());
        let server = TicketServer::replying(200, OK_TICKET);
        let cancel = CancellationToken::new();

        tokens.ensure_authenticated(&server, &cancel).await.unwrap();
        assert_eq!(server.calls(), 1);
        assert_eq!(tokens.authorization_header_value(), "Bearer tkt-1");

        clock.advance(Duration::minutes(1));
        tokens.ensure_authenticated(&server, &cancel).await.unwrap();
        assert_eq!(server.calls(), 1);

        clock.advance(Duration::hours(23) + Duration::minutes(55));
        tokens.ensure_authenticated(&server, &cancel).await.unwrap();
        assert_eq!(server.calls(), 2);
    }

    #[tokio::test]
    async fn test_expiry_is_issue_time_plus_ttl() {
        let clock = ManualClock::new();
        let issued_at = clock.now();
        let tokens = manager(clock);
        let server = TicketServer::replying(200, OK_TICKET);

        tokens
            .ensure_authenticated(&server, &CancellationToken::new())
            .await
            .unwrap();
        let token = tokens.token();
        assert_eq!(token.value(), "tkt-1");
        assert_eq!(token.expires_at(), Some(issued_at + Duration::hours(24)));
    }

    #[tokio::test]
    async fn test_force_refresh_always_exchanges() {
        let tokens = manager(ManualClock::new());
        let server = TicketServer::replying(200, OK_TICKET);
        let cancel = CancellationToken::new();

        tokens.ensure_authenticated(&server, &cancel).await.unwrap();
        tokens.force_refresh(&server, &cancel).await.unwrap();
        tokens.force_refresh(&server, &cancel).await.unwrap();
        assert_eq!(server.calls(), 3);
    }

    #[tokio::test]
    async fn test_empty_ticket_is_rejected() {
        let tokens = manager(ManualClock::new());
        let server = TicketServer::replying(200, r#"{"code":0,"data":{"ticket":""}}"#);

        let err = tokens
            .ensure_authenticated(&server, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Authentication { source: None, .. }));
        assert_eq!(tokens.authorization_header_value(), "");
    }

    #[tokio::test]
    async fn test_business_error_becomes_authentication_error() {
        let tokens = manager(ManualClock::new());
        let server =
            TicketServer::replying(200, r#"{"code":401001,"msg":"bad secret","data":null}"#);

        let err = tokens
            .ensure_authenticated(&server, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Authentication { .. }));
        assert_eq!(err.business_code(), Some(401001));
    }

    #[tokio::test]
    async fn test_http_failure_becomes_authentication_error() {
        let tokens = manager(ManualClock::new());
        let server = TicketServer::replying(403, "forbidden");

        let err = tokens
            .ensure_authenticated(&server, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Authentication { .. }));
        assert_eq!(err.status_code(), Some(403));
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_exchange() {
        let tokens = Arc::new(manager(ManualClock::new()));
        let server = Arc::new(TicketServer {
            latency: std::time::Duration::from_millis(50),
            ..TicketServer::replying(200, OK_TICKET)
        });

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let tokens = tokens.clone();
                let server = server.clone();
                tokio::spawn(async move {
                    tokens
                        .ensure_authenticated(server.as_ref(), &CancellationToken::new())
                        .await
                })
            })
            .collect();

        for result in futures::future::join_all(tasks).await {
            result.unwrap().unwrap();
        }
        assert_eq!(server.calls(), 1);
    }

    #[tokio::test]
    async fn test_clear_drops_token() {
        let tokens = manager(ManualClock::new());
        let server = TicketServer::replying(200, OK_TICKET);
        tokens
            .ensure_authenticated(&server, &CancellationToken::new())
            .await
            .unwrap();

        tokens.clear();
        assert!(tokens.token().is_empty());
        assert_eq!(tokens.token().expires_at(), None);
        assert!(!tokens.is_authenticated());
    }

    #[tokio::test]
    async fn test_returned_token_outlives_concurrent_clear() {
        let tokens = manager(ManualClock::new());
        let server = TicketServer::replying(200, OK_TICKET);
        let cancel = CancellationToken::new();

        let acquired = tokens.ensure_authenticated(&server, &cancel).await.unwrap();
        tokens.clear();
        assert_eq!(acquired.authorization_header_value(), "Bearer tkt-1");
        assert_eq!(tokens.authorization_header_value(), "");

        let cached = tokens.ensure_authenticated(&server, &cancel).await.unwrap();
        let refreshed = tokens.force_refresh(&server, &cancel).await.unwrap();
        tokens.clear();
        assert_eq!(cached.value(), "tkt-1");
        assert_eq!(refreshed.authorization_header_value(), "Bearer tkt-1");
        assert_eq!(server.calls(), 3);
    }
}

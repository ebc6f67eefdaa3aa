// Client configuration: endpoint, credentials, HTTP pool sizing and retry policy

use std::time::Duration;

use url::Url;

use crate::error::ClientError;
use crate::retry::RetryConfig;

pub const DEFAULT_BASE_URL: &str = "https://api.hotelbyte.com";

pub const ENV_BASE_URL: &str = "HOTELBYTE_BASE_URL";
pub const ENV_APP_KEY: &str = "HOTELBYTE_APP_KEY";
pub const ENV_APP_SECRET: &str = "HOTELBYTE_APP_SECRET";
pub const ENV_TIMEOUT_SECS: &str = "HOTELBYTE_TIMEOUT_SECS";

#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub app_key: String,
    pub app_secret: String,
}

impl Credentials {
    pub fn new(app_key: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_key: app_key.into(),
            app_secret: app_secret.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.app_key.is_empty() || self.app_secret.is_empty()
    }
}

// Keeps the secret out of logs
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("app_key", &self.app_key)
            .field("app_secret", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub timeout: Duration,
    pub max_idle_conns: usize,
    pub max_conns_per_host: usize,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            max_idle_conns: 100,
            max_conns_per_host: 10,
            user_agent: format!("HotelByte-Rust-SDK/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub credentials: Credentials,
    pub http: HttpConfig,
    pub retry: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: Credentials::default(),
            http: HttpConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by the `HOTELBYTE_*` environment variables that are set.
    pub fn from_env() -> Result<Self, ClientError> {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var(ENV_BASE_URL) {
            config = config.with_base_url(base_url)?;
        }
        let app_key = std::env::var(ENV_APP_KEY).unwrap_or_default();
        let app_secret = std::env::var(ENV_APP_SECRET).unwrap_or_default();
        if !app_key.is_empty() || !app_secret.is_empty() {
            config = config.with_credentials(app_key, app_secret)?;
        }
        if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ClientError::Config(format!("{ENV_TIMEOUT_SECS} is not a number: {raw}"))
            })?;
            config = config.with_timeout(Duration::from_secs(secs))?;
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into();
        if base_url.is_empty() {
            return Err(ClientError::Config("empty base url".to_string()));
        }
        self.base_url = base_url;
        Ok(self)
    }

    pub fn with_credentials(
        mut self,
        app_key: impl Into<String>,
        app_secret: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let credentials = Credentials::new(app_key, app_secret);
        if credentials.is_empty() {
            return Err(ClientError::Config("empty credentials".to_string()));
        }
        self.credentials = credentials;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ClientError> {
        if timeout.is_zero() {
            return Err(ClientError::Config("timeout must be > 0".to_string()));
        }
        self.http.timeout = timeout;
        Ok(self)
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Result<Self, ClientError> {
        let user_agent = user_agent.into();
        if user_agent.is_empty() {
            return Err(ClientError::Config("empty user agent".to_string()));
        }
        self.http.user_agent = user_agent;
        Ok(self)
    }

    pub fn with_pool(
        mut self,
        max_idle_conns: usize,
        max_conns_per_host: usize,
    ) -> Result<Self, ClientError> {
        if max_conns_per_host == 0 {
            return Err(ClientError::Config(
                "max connections per host must be > 0".to_string(),
            ));
        }
        self.http.max_idle_conns = max_idle_conns;
        self.http.max_conns_per_host = max_conns_per_host;
        Ok(self)
    }

    /// Replaces the retry policy; the backoff factor resets to 2.0.
    pub fn with_retry_config(
        mut self,
        max_retries: u32,
        initial_delay: Duration,
        max_delay: Duration,
    ) -> Result<Self, ClientError> {
        let retry = RetryConfig::new(max_retries, initial_delay, max_delay);
        retry.validate()?;
        self.retry = retry;
        Ok(self)
    }

    pub fn with_backoff_factor(mut self, backoff_factor: f64) -> Result<Self, ClientError> {
        let retry = RetryConfig {
            backoff_factor,
            ..self.retry.clone()
        };
        retry.validate()?;
        self.retry = retry;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.base_url.is_empty() {
            return Err(ClientError::Config("empty base url".to_string()));
        }
        Url::parse(&self.base_url).map_err(|e| {
            ClientError::Config(format!("invalid base url {}: {}", self.base_url, e))
        })?;
        if self.credentials.is_empty() {
            return Err(ClientError::Config("empty credentials".to_string()));
        }
        if self.http.timeout.is_zero() {
            return Err(ClientError::Config("timeout must be > 0".to_string()));
        }
        if self.http.max_conns_per_host == 0 {
            return Err(ClientError::Config(
                "max connections per host must be > 0".to_string(),
            ));
        }
        self.retry.validate()
    }
}

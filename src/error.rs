// Error types shared by the transport, the token manager and the API facade

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

// Errors surfaced by any call into the backend
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error: HTTP {status}")]
    Server { status: u16, body: String },

    #[error("Request failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<ApiError>,
    },

    #[error("Request cancelled")]
    Cancelled,

    #[error("Authentication failed: {message}")]
    Authentication {
        message: String,
        #[source]
        source: Option<Box<ApiError>>,
    },

    #[error("ErrorCode=[{code}] Message=[{msg}]")]
    Business { code: i32, msg: String },

    #[error("Service unavailable (HTTP {status}, empty body)")]
    ServiceUnavailable { status: u16 },

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Envelope reported success but carried no data")]
    MissingData,

    #[error("HTTP {status}")]
    HttpStatus { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

impl ApiError {
    /// Whether the transport may retry the attempt that produced this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Server { .. })
    }

    /// Business code carried by the envelope, looking through authentication wrapping.
    pub fn business_code(&self) -> Option<i32> {
        match self {
            ApiError::Business { code, .. } => Some(*code),
            ApiError::Authentication {
                source: Some(inner),
                ..
            } => inner.business_code(),
            _ => None,
        }
    }

    /// HTTP status associated with the failure, if one was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. }
            | ApiError::HttpStatus { status, .. }
            | ApiError::ServiceUnavailable { status } => Some(*status),
            ApiError::RetriesExhausted { last, .. } => last.status_code(),
            ApiError::Authentication {
                source: Some(inner),
                ..
            } => inner.status_code(),
            _ => None,
        }
    }

    pub(crate) fn authentication(message: impl Into<String>, source: Option<ApiError>) -> Self {
        ApiError::Authentication {
            message: message.into(),
            source: source.map(Box::new),
        }
    }
}

// Raised while building a client; never recovered
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Initialization error: {0}")]
    Init(String),
}

// Envelope codec: every response body is `{"code": i32, "msg": string, "data": T | null}`
//
// Decoding order:
// 1. an empty body is never valid and maps to `ServiceUnavailable`
// 2. the envelope must parse and must carry `code`, otherwise `Protocol`
// 3. a non-zero `code` is a `Business` error regardless of `data`
// 4. `code == 0` with a null or absent `data` is `MissingData`
// 5. `data` must match the requested type, otherwise `Protocol`

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ApiError, Result};
use crate::transport::HttpResponse;

pub const HEADER_REQUEST_ID: &str = "Request-Id";
pub const HEADER_TRACE_ID: &str = "Trace-Id";
pub const HEADER_SESSION_ID: &str = "Session-Id";
pub const HEADER_SERVER_COST_MS: &str = "Server-Cost-Ms";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: i32,
    #[serde(default, deserialize_with = "crate::types::null_default")]
    pub msg: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            msg: String::new(),
            data: Some(data),
        }
    }

    pub fn failure(code: i32, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

/// Observability metadata the backend returns as response headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseHeaders {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub request_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub trace_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_cost_ms: Option<u64>,
}

impl ResponseHeaders {
    pub fn from_header_map(headers: &HeaderMap) -> Self {
        let get = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };
        Self {
            request_id: get(HEADER_REQUEST_ID),
            trace_id: get(HEADER_TRACE_ID),
            session_id: get(HEADER_SESSION_ID),
            server_cost_ms: get(HEADER_SERVER_COST_MS).trim().parse().ok(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.request_id.is_empty()
            && self.trace_id.is_empty()
            && self.session_id.is_empty()
            && self.server_cost_ms.is_none()
    }
}

/// Payloads that want the response header metadata copied into them.
pub trait ReceivesHeaders {
    fn receive_headers(&mut self, headers: ResponseHeaders);
}

fn decode_envelope(status: u16, body: &[u8]) -> Result<Option<serde_json::Value>> {
    if body.is_empty() {
        return Err(ApiError::ServiceUnavailable { status });
    }

    let envelope: Envelope<serde_json::Value> = serde_json::from_slice(body)
        .map_err(|e| ApiError::Protocol(format!("invalid envelope: {e}")))?;

    if envelope.code != 0 {
        return Err(ApiError::Business {
            code: envelope.code,
            msg: envelope.msg,
        });
    }
    Ok(envelope.data)
}

fn decode_payload<T: DeserializeOwned>(data: serde_json::Value) -> Result<T> {
    serde_json::from_value(data)
        .map_err(|e| ApiError::Protocol(format!("unexpected payload shape: {e}")))
}

/// Decodes a successful envelope whose `data` must be present.
pub fn decode<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T> {
    match decode_envelope(status, body)? {
        Some(data) => decode_payload(data),
        None => Err(ApiError::MissingData),
    }
}

/// Like [`decode`], but a null or absent `data` on success is `Ok(None)`.
pub fn decode_optional<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<Option<T>> {
    decode_envelope(status, body)?
        .map(decode_payload)
        .transpose()
}

pub fn decode_response<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    decode(response.status, &response.body)
}

/// Decodes the payload and hands it the response header metadata.
pub fn decode_with_headers<T>(response: &HttpResponse) -> Result<T>
where
    T: DeserializeOwned + ReceivesHeaders,
{
    let mut payload: T = decode_response(response)?;
    let headers = ResponseHeaders::from_header_map(&response.headers);
    if !headers.is_empty() {
        debug!(
            trace_id = %headers.trace_id,
            session_id = %headers.session_id,
            server_cost_ms = ?headers.server_cost_ms,
            "response metadata"
        );
    }
    payload.receive_headers(headers);
    Ok(payload)
}

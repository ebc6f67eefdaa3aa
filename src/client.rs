// HotelByte API client: authenticates, sends typed requests through the retry
// transport and unwraps the response envelope

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::auth::{Clock, SystemClock, TokenManager};
use crate::config::ClientConfig;
use crate::envelope::{self, ReceivesHeaders};
use crate::error::{ApiError, ClientError, Result};
use crate::protocol::{
    BookReq, BookResp, CancelReq, CancelResp, CheckAvailReq, CheckAvailResp, HotelListReq,
    HotelListResp, HotelRatesReq, HotelRatesResp, OperationHeaders, QueryOrdersReq,
    QueryOrdersResp,
};
use crate::transport::{HttpExecutor, HttpRequest, HttpResponse, Transport};

pub const HOTEL_LIST_PATH: &str = "/api/search/hotelList";
pub const HOTEL_RATES_PATH: &str = "/api/search/hotelRates";
pub const CHECK_AVAIL_PATH: &str = "/api/search/checkAvail";
pub const BOOK_PATH: &str = "/api/trade/book";
pub const QUERY_ORDERS_PATH: &str = "/api/trade/queryOrders";
pub const CANCEL_PATH: &str = "/api/trade/cancel";

const HEADER_AUTHORIZATION: &str = "Authorization";
const HEADER_CURRENCY: &str = "Currency";
const HEADER_TEST: &str = "Test";

/// Client for the HotelByte booking API.
///
/// Safe to share between tasks. Every instance owns its own token and connection pool.
pub struct HotelByteClient {
    config: ClientConfig,
    transport: Transport,
    tokens: TokenManager,
}

impl HotelByteClient {
    pub fn new(config: ClientConfig) -> std::result::Result<Self, ClientError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Same as [`HotelByteClient::new`] with an explicit time source for token expiry.
    pub fn with_clock(
        config: ClientConfig,
        clock: Arc<dyn Clock>,
    ) -> std::result::Result<Self, ClientError> {
        config.validate()?;
        let transport = Transport::new(&config)?;
        let tokens = TokenManager::with_clock(config.credentials.clone(), clock);
        info!(base_url = %config.base_url, app_key = %config.credentials.app_key, "HotelByte client created");

        Ok(Self {
            config,
            transport,
            tokens,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn app_key(&self) -> &str {
        &self.config.credentials.app_key
    }

    /// Current bearer token, if one has been acquired.
    pub fn token(&self) -> Option<String> {
        let token = self.tokens.token();
        if token.is_empty() {
            None
        } else {
            Some(token.value().to_string())
        }
    }

    pub fn authorization_header(&self) -> String {
        self.tokens.authorization_header_value()
    }

    pub async fn authenticate(&self, cancel: &CancellationToken) -> Result<()> {
        self.tokens
            .ensure_authenticated(&self.transport, cancel)
            .await
            .map(|_| ())
    }

    pub async fn refresh_token(&self, cancel: &CancellationToken) -> Result<()> {
        self.tokens
            .force_refresh(&self.transport, cancel)
            .await
            .map(|_| ())
    }

    /// Sends `request` through the retry transport as-is, without authentication or decoding.
    pub async fn execute(
        &self,
        request: &HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse> {
        self.transport.execute(request, cancel).await
    }

    pub async fn hotel_list(
        &self,
        request: &HotelListReq,
        cancel: &CancellationToken,
    ) -> Result<HotelListResp> {
        self.call_with_headers(HOTEL_LIST_PATH, request, cancel)
            .await
    }

    pub async fn hotel_rates(
        &self,
        request: &HotelRatesReq,
        cancel: &CancellationToken,
    ) -> Result<HotelRatesResp> {
        self.call_with_headers(HOTEL_RATES_PATH, request, cancel)
            .await
    }

    pub async fn check_avail(
        &self,
        request: &CheckAvailReq,
        cancel: &CancellationToken,
    ) -> Result<CheckAvailResp> {
        self.call_with_headers(CHECK_AVAIL_PATH, request, cancel)
            .await
    }

    pub async fn book(&self, request: &BookReq, cancel: &CancellationToken) -> Result<BookResp> {
        self.call_decoded(BOOK_PATH, request, cancel).await
    }

    pub async fn query_orders(
        &self,
        request: &QueryOrdersReq,
        cancel: &CancellationToken,
    ) -> Result<QueryOrdersResp> {
        self.call_decoded(QUERY_ORDERS_PATH, request, cancel).await
    }

    pub async fn cancel(
        &self,
        request: &CancelReq,
        cancel: &CancellationToken,
    ) -> Result<CancelResp> {
        self.call_decoded(CANCEL_PATH, request, cancel).await
    }

    /// Drops the client and its pooled connections.
    pub fn close(self) {
        debug!(app_key = %self.config.credentials.app_key, "closing HotelByte client");
    }

    async fn call_decoded<Req, Resp>(
        &self,
        path: &str,
        request: &Req,
        cancel: &CancellationToken,
    ) -> Result<Resp>
    where
        Req: Serialize + OperationHeaders + Sync,
        Resp: DeserializeOwned,
    {
        let response = self.call(path, request, cancel).await?;
        envelope::decode_response(&response)
    }

    async fn call_with_headers<Req, Resp>(
        &self,
        path: &str,
        request: &Req,
        cancel: &CancellationToken,
    ) -> Result<Resp>
    where
        Req: Serialize + OperationHeaders + Sync,
        Resp: DeserializeOwned + ReceivesHeaders,
    {
        let response = self.call(path, request, cancel).await?;
        envelope::decode_with_headers(&response)
    }

    async fn call<Req>(
        &self,
        path: &str,
        request: &Req,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse>
    where
        Req: Serialize + OperationHeaders + Sync,
    {
        let token = self
            .tokens
            .ensure_authenticated(&self.transport, cancel)
            .await?;

        let http_request = HttpRequest::post(path)
            .header(HEADER_AUTHORIZATION, token.authorization_header_value())
            .optional_header(envelope::HEADER_SESSION_ID, request.session_id())
            .optional_header(HEADER_CURRENCY, request.currency())
            .optional_header(HEADER_TEST, request.test_flags())
            .json(request)?;

        debug!(path, "calling HotelByte API");
        let response = self.transport.execute(&http_request, cancel).await?;

        if response.status >= 400 {
            warn!(path, status = response.status, "HotelByte API returned an error status");
            return Err(ApiError::HttpStatus {
                status: response.status,
                body: response.body_text(),
            });
        }
        Ok(response)
    }
}

impl std::fmt::Debug for HotelByteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HotelByteClient")
            .field("base_url", &self.config.base_url)
            .field("app_key", &self.config.credentials.app_key)
            .field("authenticated", &self.tokens.is_authenticated())
            .finish()
    }
}

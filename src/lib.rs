// HotelByte client SDK: typed hotel search and booking calls over an
// authenticated, retrying JSON transport

pub mod auth;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod protocol;
pub mod retry;
pub mod transport;
pub mod types;

// Re-export key types for convenience
pub use auth::{Clock, SystemClock, Token, TokenManager};
pub use client::HotelByteClient;
pub use config::{ClientConfig, Credentials, HttpConfig};
pub use envelope::{decode, decode_optional, Envelope, ReceivesHeaders, ResponseHeaders};
pub use error::{ApiError, ClientError, Result};
pub use protocol::{
    AuthReq, AuthResp, BoardId, BookReq, BookResp, CancelFee, CancelReq, CancelResp,
    CheckAvailReq, CheckAvailResp, CheckAvailStatus, CheckInOut, ComputedCancelPolicy,
    Destination, DestinationType, DistanceFilter, Guest, GuestPerRoom, Holder, Hotel,
    HotelDestination, HotelListBasicInfo, HotelListFilter, HotelListReq, HotelListResp,
    HotelLoyaltyProgram, HotelOrder, HotelRatesReq, HotelRatesResp, HotelStaticProfile,
    Occupancies, OperationHeaders, OrderBasic, OrderHotelInfo, OrderRoomInfo,
    OrderRoomRefundInfo, OrderStatus, OriginalRoomNaming, Phone, PriceFilter, QueryOrdersReq,
    QueryOrdersResp, Rate, RefundableMode, Room, RoomRatePkg, Tax, TaxItem,
};
pub use retry::RetryConfig;
pub use tokio_util::sync::CancellationToken;
pub use transport::{HttpExecutor, HttpRequest, HttpResponse, Transport};
pub use types::{DateInt, I18n, Id, Ids, Latlng, LatlngCoordinator, Money, PageReq, PageResp, TimeWindow};

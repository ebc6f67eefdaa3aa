// Request/response contracts for the HotelByte backend endpoints
//
// Field names follow the backend's camelCase JSON. Response types default every
// missing or null field so partial payloads still decode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::envelope::{ReceivesHeaders, ResponseHeaders};
use crate::types::{null_default, DateInt, I18n, Id, Ids, LatlngCoordinator, Money, PageReq, PageResp, TimeWindow};

/// Per-request values the backend also expects as HTTP headers.
pub trait OperationHeaders {
    fn session_id(&self) -> &str {
        ""
    }

    fn currency(&self) -> &str {
        ""
    }

    fn test_flags(&self) -> &str {
        ""
    }
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthReq {
    pub app_key: String,
    pub app_secret: String,
    /// Requested ticket lifetime in seconds.
    pub ttl: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthResp {
    #[serde(deserialize_with = "null_default")]
    pub ticket: String,
}

// ---------------------------------------------------------------------------
// Shared shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInOut {
    pub check_in: DateInt,
    pub check_out: DateInt,
}

impl CheckInOut {
    pub fn nights(&self) -> Option<i64> {
        self.check_in.days_until(self.check_out)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelDestination {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub destination_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HotelListFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<DistanceFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceFilter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistanceFilter {
    pub latlng: LatlngCoordinator,
    /// Metres around `latlng`.
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceFilter {
    pub low_price: f64,
    pub high_price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Guest {
    /// Starts from 1.
    pub room_index: i64,
    pub first_name: String,
    pub last_name: String,
    pub nationality_code: String,
    #[serde(skip_serializing_if = "crate::types::is_zero_i64")]
    pub age: i64,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_child: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GuestPerRoom {
    pub adult_count: i64,
    #[serde(deserialize_with = "null_default")]
    pub children_ages: Vec<i64>,
    #[serde(deserialize_with = "null_default", skip_serializing_if = "Vec::is_empty")]
    pub guests: Vec<Guest>,
}

/// Point of sale, residency and the room-by-room guest layout of a search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Occupancies {
    /// ISO 3166-1 alpha-2, e.g. "US".
    pub country_code: String,
    pub residency_code: String,
    pub nationality_code: String,
    #[serde(deserialize_with = "null_default")]
    pub room_occupancies: Vec<GuestPerRoom>,
}

impl Occupancies {
    pub fn adult_count(&self) -> i64 {
        if self.room_occupancies.is_empty() {
            return 1;
        }
        self.room_occupancies
            .iter()
            .map(|room| room.adult_count.max(0))
            .sum()
    }

    pub fn children_count(&self) -> i64 {
        self.room_occupancies
            .iter()
            .map(|room| room.children_ages.len() as i64)
            .sum()
    }

    pub fn room_count(&self) -> i64 {
        if self.room_occupancies.is_empty() {
            return 1;
        }
        self.room_occupancies.len() as i64
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HotelLoyaltyProgram {
    pub group_id: i64,
    pub brand_id: i64,
    pub group_name: I18n,
    pub brand_name: I18n,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HotelStaticProfile {
    pub destination_id: Id,
    pub name: I18n,
    /// 3 to 7.
    pub star: f64,
    pub loyalty_program: HotelLoyaltyProgram,
    pub address: I18n,
    pub latlng_coordinator: LatlngCoordinator,
    #[serde(rename = "logoURL", skip_serializing_if = "String::is_empty")]
    pub logo_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub phone: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(rename = "websiteURL", skip_serializing_if = "String::is_empty")]
    pub website_url: String,
    pub desc: I18n,
    pub open_year: i64,
    pub fitment_year: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Rate {
    pub commissionable_rate: Money,
    pub net_rate: Money,
    pub gross_rate: Money,
    /// When set, sell at `gross_rate`.
    pub respect_gross_rate: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefundableMode {
    Full,
    Partial,
    No,
    #[default]
    #[serde(other)]
    Unknown,
}

impl RefundableMode {
    pub fn is_refundable(&self) -> bool {
        !matches!(self, RefundableMode::No)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CancelFee {
    pub until: Option<DateTime<Utc>>,
    /// Zero means free cancellation.
    pub fee: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComputedCancelPolicy {
    pub refundable_mode: RefundableMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refundable_until: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_default")]
    pub cancel_fees: Vec<CancelFee>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OriginalRoomNaming {
    pub id: String,
    pub name: String,
    pub supplier: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaxItem {
    pub tax_type: String,
    pub tax_name: String,
    pub amount: Money,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub desc: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tax {
    pub total: Money,
    #[serde(deserialize_with = "null_default")]
    pub items: Vec<TaxItem>,
}

/// A bookable offer. `rate_pkg_id` is the key for check-availability and booking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoomRatePkg {
    pub rate_pkg_id: String,
    #[serde(flatten)]
    pub cancel_policy: ComputedCancelPolicy,
    pub original_room_naming: OriginalRoomNaming,
    /// Single room, all nights.
    pub rate: Rate,
    /// All rooms, all nights.
    pub total_rate: Rate,
    pub rate_comment: String,
    pub tax: Tax,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Room {
    pub room_type_id: String,
    pub room_type_name: I18n,
    pub hotel_id: Id,
    #[serde(deserialize_with = "null_default")]
    pub rates: Vec<RoomRatePkg>,
}

// ---------------------------------------------------------------------------
// POST /api/search/hotelList
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelListReq {
    #[serde(default)]
    pub hotel_ids: Ids,
    #[serde(default)]
    pub max_rates_per_hotel: i64,
    #[serde(flatten)]
    pub stay: CheckInOut,
    #[serde(flatten)]
    pub occupancies: Occupancies,
    #[serde(flatten)]
    pub destination: HotelDestination,
    #[serde(flatten)]
    pub filter: HotelListFilter,
    #[serde(flatten)]
    pub page: PageReq,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sort_by: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub currency: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub test: String,
}

impl OperationHeaders for HotelListReq {
    fn currency(&self) -> &str {
        &self.currency
    }

    fn test_flags(&self) -> &str {
        &self.test
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Hotel {
    pub id: Id,
    #[serde(flatten)]
    pub profile: HotelStaticProfile,
    /// Cheapest offer matching the search.
    pub min_price: Money,
    pub is_available: bool,
    #[serde(deserialize_with = "null_default")]
    pub rooms: Vec<Room>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HotelListBasicInfo {
    pub destination_id: i64,
    /// Pass on to rates, check-availability and booking.
    pub session_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotelListResp {
    #[serde(deserialize_with = "null_default")]
    pub list: Vec<Hotel>,
    #[serde(deserialize_with = "null_default")]
    pub basic: HotelListBasicInfo,
    #[serde(flatten)]
    pub page: PageResp,
    #[serde(deserialize_with = "null_default")]
    pub header: ResponseHeaders,
}

impl ReceivesHeaders for HotelListResp {
    fn receive_headers(&mut self, headers: ResponseHeaders) {
        if self.basic.session_id.is_empty() {
            self.basic.session_id = headers.session_id.clone();
        }
        self.header = headers;
    }
}

// ---------------------------------------------------------------------------
// POST /api/search/hotelRates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelRatesReq {
    pub hotel_id: Id,
    #[serde(flatten)]
    pub stay: CheckInOut,
    #[serde(flatten)]
    pub occupancies: Occupancies,
    #[serde(flatten)]
    pub destination: HotelDestination,
    /// ISO 4217.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub currency: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub session_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub test: String,
}

impl OperationHeaders for HotelRatesReq {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn currency(&self) -> &str {
        &self.currency
    }

    fn test_flags(&self) -> &str {
        &self.test
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotelRatesResp {
    #[serde(deserialize_with = "null_default")]
    pub rooms: Vec<Room>,
    #[serde(deserialize_with = "null_default")]
    pub header: ResponseHeaders,
}

impl ReceivesHeaders for HotelRatesResp {
    fn receive_headers(&mut self, headers: ResponseHeaders) {
        self.header = headers;
    }
}

// ---------------------------------------------------------------------------
// POST /api/search/checkAvail
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAvailReq {
    pub rate_pkg_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub session_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub test: String,
}

impl OperationHeaders for CheckAvailReq {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn test_flags(&self) -> &str {
        &self.test
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckAvailStatus(pub i32);

impl CheckAvailStatus {
    pub const AVAILABLE: CheckAvailStatus = CheckAvailStatus(1);
    pub const UNAVAILABLE: CheckAvailStatus = CheckAvailStatus(2);

    pub fn is_available(&self) -> bool {
        *self == Self::AVAILABLE
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckAvailResp {
    pub status: CheckAvailStatus,
    /// Offer with refreshed price and availability.
    pub room_rate_pkg: Option<RoomRatePkg>,
    pub supplier: i64,
    #[serde(deserialize_with = "null_default")]
    pub header: ResponseHeaders,
}

impl ReceivesHeaders for CheckAvailResp {
    fn receive_headers(&mut self, headers: ResponseHeaders) {
        self.header = headers;
    }
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderStatus(pub i32);

impl OrderStatus {
    pub const UNKNOWN: OrderStatus = OrderStatus(0);
    pub const CONFIRMING: OrderStatus = OrderStatus(1);
    pub const CONFIRMED: OrderStatus = OrderStatus(2);
    pub const CANCELLED: OrderStatus = OrderStatus(3);
    pub const FAILED: OrderStatus = OrderStatus(4);
    pub const CANCEL_FAILED: OrderStatus = OrderStatus(5);
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Phone {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub country_code: String,
    #[serde(skip_serializing_if = "crate::types::is_zero_i64")]
    pub country_number: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Holder {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    pub phone: Phone,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderBasic {
    pub status: OrderStatus,
    pub check_in: DateInt,
    pub check_out: DateInt,
    pub night_count: i64,
    pub room_count: i64,
    pub booking_time: Option<DateTime<Utc>>,
    pub hotel_confirm_no: String,
    pub holder: Holder,
    pub customer_reference_no: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_time: Option<DateTime<Utc>>,
    pub cancel_reason: String,
    pub refunded_price: Money,
    pub supplier: i64,
    pub supplier_reference_no: String,
    #[serde(flatten)]
    pub rate: Rate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderHotelInfo {
    pub hotel_id: Id,
    #[serde(flatten)]
    pub profile: HotelStaticProfile,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderRoomRefundInfo {
    pub date: DateInt,
    pub refunded: bool,
    pub refunded_money: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderRoomInfo {
    pub room_type_id: String,
    pub room_type_name: I18n,
    #[serde(flatten)]
    pub rate_pkg: RoomRatePkg,
    pub room_index: i64,
    #[serde(deserialize_with = "null_default")]
    pub guests: Vec<Guest>,
    #[serde(deserialize_with = "null_default")]
    pub refund_info: Vec<OrderRoomRefundInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotelOrder {
    #[serde(flatten)]
    pub basic: OrderBasic,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel: Option<OrderHotelInfo>,
    #[serde(deserialize_with = "null_default")]
    pub rooms: Vec<OrderRoomInfo>,
}

// ---------------------------------------------------------------------------
// POST /api/trade/book
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookReq {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub customer_reference_no: String,
    pub rate_pkg_id: String,
    pub holder: Holder,
    #[serde(default)]
    pub guests: Vec<Guest>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub session_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub test: String,
}

impl OperationHeaders for BookReq {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn test_flags(&self) -> &str {
        &self.test
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookResp {
    pub hotel_order: Option<HotelOrder>,
}

// ---------------------------------------------------------------------------
// POST /api/trade/queryOrders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryOrdersReq {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub customer_reference_nos: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub supplier_reference_nos: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in_time_window: Option<TimeWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out_time_window: Option<TimeWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_time_window: Option<TimeWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_cancel_time_window: Option<TimeWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_time_window: Option<TimeWindow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub status_list: Vec<OrderStatus>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub test: String,
}

impl OperationHeaders for QueryOrdersReq {
    fn test_flags(&self) -> &str {
        &self.test
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOrdersResp {
    #[serde(deserialize_with = "null_default")]
    pub orders: Vec<HotelOrder>,
}

// ---------------------------------------------------------------------------
// POST /api/trade/cancel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelReq {
    pub customer_reference_no: String,
    pub supplier_reference_no: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub test: String,
}

impl OperationHeaders for CancelReq {
    fn test_flags(&self) -> &str {
        &self.test
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CancelResp {
    /// Charged by the supplier and not refunded.
    pub service_fee: Money,
    pub status: OrderStatus,
}

// ---------------------------------------------------------------------------
// Reference data: meal plans and destinations
// ---------------------------------------------------------------------------

/// Meal plan code of a rate, e.g. `"BB"`. Unrecognised codes are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BoardId {
    RoomOnly,
    BedBreakfast,
    HalfBoard,
    FullBoard,
    AllInclusive,
    BreakfastIncluded,
    LunchOnly,
    DinnerOnly,
    BreakfastDinner,
    BreakfastLunch,
    LunchDinner,
    /// Alternate all-inclusive code.
    AllInclusiveTi,
    BedBreakfast1,
    BedBreakfast2,
    BedBreakfast3,
    HalfBoard1,
    HalfBoard2,
    HalfBoard3,
    FullBoard1,
    FullBoard2,
    FullBoard3,
    AllInclusive1,
    AllInclusive2,
    AllInclusive3,
    Other(String),
}

impl BoardId {
    pub const ALL: [BoardId; 24] = [
        BoardId::RoomOnly,
        BoardId::BedBreakfast,
        BoardId::HalfBoard,
        BoardId::FullBoard,
        BoardId::AllInclusive,
        BoardId::BreakfastIncluded,
        BoardId::LunchOnly,
        BoardId::DinnerOnly,
        BoardId::BreakfastDinner,
        BoardId::BreakfastLunch,
        BoardId::LunchDinner,
        BoardId::AllInclusiveTi,
        BoardId::BedBreakfast1,
        BoardId::BedBreakfast2,
        BoardId::BedBreakfast3,
        BoardId::HalfBoard1,
        BoardId::HalfBoard2,
        BoardId::HalfBoard3,
        BoardId::FullBoard1,
        BoardId::FullBoard2,
        BoardId::FullBoard3,
        BoardId::AllInclusive1,
        BoardId::AllInclusive2,
        BoardId::AllInclusive3,
    ];

    pub fn code(&self) -> &str {
        match self {
            BoardId::RoomOnly => "RO",
            BoardId::BedBreakfast => "BB",
            BoardId::HalfBoard => "HB",
            BoardId::FullBoard => "FB",
            BoardId::AllInclusive => "AI",
            BoardId::BreakfastIncluded => "BI",
            BoardId::LunchOnly => "LU",
            BoardId::DinnerOnly => "DI",
            BoardId::BreakfastDinner => "BD",
            BoardId::BreakfastLunch => "BL",
            BoardId::LunchDinner => "LD",
            BoardId::AllInclusiveTi => "TI",
            BoardId::BedBreakfast1 => "BB1",
            BoardId::BedBreakfast2 => "BB2",
            BoardId::BedBreakfast3 => "BB3",
            BoardId::HalfBoard1 => "HB1",
            BoardId::HalfBoard2 => "HB2",
            BoardId::HalfBoard3 => "HB3",
            BoardId::FullBoard1 => "FB1",
            BoardId::FullBoard2 => "FB2",
            BoardId::FullBoard3 => "FB3",
            BoardId::AllInclusive1 => "AI1",
            BoardId::AllInclusive2 => "AI2",
            BoardId::AllInclusive3 => "AI3",
            BoardId::Other(code) => code,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, BoardId::Other(_))
    }

    /// Guests covered by a per-occupancy plan such as `"HB2"`.
    pub fn occupancy(&self) -> Option<u8> {
        match self {
            BoardId::BedBreakfast1 | BoardId::HalfBoard1 | BoardId::FullBoard1 | BoardId::AllInclusive1 => Some(1),
            BoardId::BedBreakfast2 | BoardId::HalfBoard2 | BoardId::FullBoard2 | BoardId::AllInclusive2 => Some(2),
            BoardId::BedBreakfast3 | BoardId::HalfBoard3 | BoardId::FullBoard3 | BoardId::AllInclusive3 => Some(3),
            _ => None,
        }
    }

    // English and Chinese names of the plan without its occupancy suffix
    fn base_names(&self) -> Option<(&'static str, &'static str)> {
        let names = match self {
            BoardId::RoomOnly => ("Room Only", "仅住宿"),
            BoardId::BedBreakfast
            | BoardId::BedBreakfast1
            | BoardId::BedBreakfast2
            | BoardId::BedBreakfast3 => ("Bed and Breakfast", "含早餐"),
            BoardId::HalfBoard | BoardId::HalfBoard1 | BoardId::HalfBoard2 | BoardId::HalfBoard3 => {
                ("Half Board", "半食宿")
            }
            BoardId::FullBoard | BoardId::FullBoard1 | BoardId::FullBoard2 | BoardId::FullBoard3 => {
                ("Full Board", "全食宿")
            }
            BoardId::AllInclusive
            | BoardId::AllInclusiveTi
            | BoardId::AllInclusive1
            | BoardId::AllInclusive2
            | BoardId::AllInclusive3 => ("All Inclusive", "全包"),
            BoardId::BreakfastIncluded => ("Breakfast Included", "仅早餐"),
            BoardId::LunchOnly => ("Lunch Only", "仅午餐"),
            BoardId::DinnerOnly => ("Dinner Only", "仅晚餐"),
            BoardId::BreakfastDinner => ("Breakfast and Dinner", "早餐和晚餐"),
            BoardId::BreakfastLunch => ("Breakfast and Lunch", "早餐和午餐"),
            BoardId::LunchDinner => ("Lunch and Dinner", "午餐和晚餐"),
            BoardId::Other(_) => return None,
        };
        Some(names)
    }

    pub fn name_en(&self) -> String {
        match (self.base_names(), self.occupancy()) {
            (Some((en, _)), Some(n)) => format!("{en} for {n}"),
            (Some((en, _)), None) => en.to_string(),
            (None, _) => "Unknown".to_string(),
        }
    }

    pub fn name_zh(&self) -> String {
        match (self.base_names(), self.occupancy()) {
            (Some((_, zh)), Some(n)) => format!("{zh} ({n}人)"),
            (Some((_, zh)), None) => zh.to_string(),
            (None, _) => "未知".to_string(),
        }
    }

    pub fn name(&self) -> I18n {
        I18n {
            en: self.name_en(),
            zh: self.name_zh(),
            ..I18n::default()
        }
    }

    /// Bilingual label shared by all occupancy variants, e.g. `"Half Board (半食宿)"`.
    pub fn description(&self) -> String {
        match self.base_names() {
            Some((en, zh)) => format!("{en} ({zh})"),
            None => format!("Unknown ({})", self.code()),
        }
    }
}

impl From<&str> for BoardId {
    fn from(code: &str) -> Self {
        BoardId::ALL
            .iter()
            .find(|known| known.code() == code)
            .cloned()
            .unwrap_or_else(|| BoardId::Other(code.to_string()))
    }
}

impl From<String> for BoardId {
    fn from(code: String) -> Self {
        BoardId::from(code.as_str())
    }
}

impl From<BoardId> for String {
    fn from(board: BoardId) -> Self {
        match board {
            BoardId::Other(code) => code,
            known => known.code().to_string(),
        }
    }
}

impl std::fmt::Display for BoardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DestinationType(pub i32);

impl DestinationType {
    pub const UNKNOWN: DestinationType = DestinationType(0);
    pub const CONTINENT: DestinationType = DestinationType(1);
    pub const COUNTRY: DestinationType = DestinationType(2);
    pub const PROVINCE_STATE: DestinationType = DestinationType(3);
    pub const HIGH_LEVEL_REGION: DestinationType = DestinationType(4);
    pub const MULTI_CITY_VICINITY: DestinationType = DestinationType(5);
    pub const CITY: DestinationType = DestinationType(6);
    pub const NEIGHBORHOOD: DestinationType = DestinationType(7);
    pub const AIRPORT: DestinationType = DestinationType(8);
    pub const POINT_OF_INTEREST: DestinationType = DestinationType(9);
    pub const TRAIN_STATION: DestinationType = DestinationType(10);
    pub const METRO_STATION: DestinationType = DestinationType(11);
    pub const BUS_STATION: DestinationType = DestinationType(12);

    pub fn as_str(&self) -> &'static str {
        match self.0 {
            1 => "continent",
            2 => "country",
            3 => "province_state",
            4 => "high_level_region",
            5 => "multi_city_vicinity",
            6 => "city",
            7 => "neighborhood",
            8 => "airport",
            9 => "point_of_interest",
            10 => "train_station",
            11 => "metro_station",
            12 => "bus_station",
            _ => "unknown",
        }
    }
}

impl std::fmt::Display for DestinationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the destination tree: continent, country, city, airport and so on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Destination {
    pub id: Id,
    #[serde(rename = "type")]
    pub kind: DestinationType,
    pub name: I18n,
    /// e.g. "Springfield, Missouri, United States of America".
    pub name_full: I18n,
    /// ISO 3166-1 alpha-2.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub country_code: String,
    /// ISO 3166-2.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub country_subdivision_code: String,
    /// Sorted from the root.
    #[serde(deserialize_with = "null_default", skip_serializing_if = "Vec::is_empty")]
    pub ancestors: Vec<Destination>,
    #[serde(deserialize_with = "null_default", skip_serializing_if = "Vec::is_empty")]
    pub descendants: Vec<Destination>,
    pub country_name: I18n,
    pub destination_name: I18n,
    pub parent_destination_name: I18n,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub parent_destination_id: String,
}

// Value types shared by the request/response contracts

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Deserializes `null` as `T::default()`; the backend sends null for empty lists and objects.
pub fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(i64),
    Text(String),
}

/// Numeric identifier that travels as a JSON string but also accepts numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(pub i64);

impl Id {
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Id(value)
    }
}

impl FromStr for Id {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Id(0));
        }
        s.parse().map(Id)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            Ok(())
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<NumberOrString>::deserialize(deserializer)? {
            None => Ok(Id(0)),
            Some(NumberOrString::Number(n)) => Ok(Id(n)),
            Some(NumberOrString::Text(s)) => s
                .parse()
                .map_err(|_| serde::de::Error::custom(format!("invalid ID string: {s}"))),
        }
    }
}

/// A list of ids; also accepts a single number or a comma separated string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Ids(pub Vec<Id>);

impl Ids {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn join(&self, sep: &str) -> String {
        self.0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(sep)
    }
}

impl From<Vec<i64>> for Ids {
    fn from(ids: Vec<i64>) -> Self {
        Ids(ids.into_iter().map(Id).collect())
    }
}

impl<'de> Deserialize<'de> for Ids {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            List(Vec<Id>),
            Number(i64),
            Text(String),
        }

        match Option::<Repr>::deserialize(deserializer)? {
            None => Ok(Ids::default()),
            Some(Repr::List(ids)) => Ok(Ids(ids)),
            Some(Repr::Number(0)) => Ok(Ids::default()),
            Some(Repr::Number(n)) => Ok(Ids(vec![Id(n)])),
            Some(Repr::Text(s)) => s
                .split(',')
                .filter(|part| !part.trim().is_empty())
                .map(|part| part.parse::<Id>())
                .collect::<Result<Vec<_>, _>>()
                .map(Ids)
                .map_err(|_| serde::de::Error::custom(format!("invalid ID list: {s}"))),
        }
    }
}

/// Calendar date packed as `YYYYMMDD`; zero means unset.
///
/// Serialized as `"YYYY-MM-DD"`. Deserializes from `20260101`, `"20260101"` or `"2026-01-01"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateInt(pub i32);

impl DateInt {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self::from)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        let value = self.0;
        if value < 10000101 {
            return None;
        }
        NaiveDate::from_ymd_opt(
            value / 10000,
            ((value % 10000) / 100) as u32,
            (value % 100) as u32,
        )
    }

    pub fn add_days(&self, days: i64) -> Option<Self> {
        self.to_naive_date()
            .and_then(|d| d.checked_add_signed(chrono::Duration::days(days)))
            .map(Self::from)
    }

    /// Whole days from `self` until `later` (check-in to check-out gives the night count).
    pub fn days_until(&self, later: DateInt) -> Option<i64> {
        Some((later.to_naive_date()? - self.to_naive_date()?).num_days())
    }
}

impl From<NaiveDate> for DateInt {
    fn from(date: NaiveDate) -> Self {
        DateInt(date.year() * 10000 + date.month() as i32 * 100 + date.day() as i32)
    }
}

impl FromStr for DateInt {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(DateInt(0));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(s, "%Y%m%d"))
            .map(DateInt::from)
            .map_err(|_| format!("invalid date string: {s}"))
    }
}

impl fmt::Display for DateInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_naive_date() {
            Some(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            None => Ok(()),
        }
    }
}

impl Serialize for DateInt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateInt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<NumberOrString>::deserialize(deserializer)? {
            None => Ok(DateInt(0)),
            Some(NumberOrString::Number(n)) => i32::try_from(n)
                .map(DateInt)
                .map_err(|_| serde::de::Error::custom(format!("invalid date number: {n}"))),
            Some(NumberOrString::Text(s)) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Money {
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub amount: f64,
}

impl Money {
    pub fn new(amount: f64, currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            amount,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0.0 && self.currency.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct I18n {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub en: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub zh: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ar: String,
}

impl I18n {
    pub fn en(text: impl Into<String>) -> Self {
        Self {
            en: text.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageReq {
    pub page_num: i64,
    pub page_size: i64,
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub cursor: i64,
}

impl Default for PageReq {
    fn default() -> Self {
        Self {
            page_num: 1,
            page_size: 10,
            cursor: 0,
        }
    }
}

impl PageReq {
    pub fn offset(&self) -> i64 {
        if self.page_num == 0 {
            return 0;
        }
        (self.page_num - 1) * self.page_size
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResp {
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Latlng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatlngCoordinator {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google: Option<Latlng>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gaode: Option<Latlng>,
}

pub(crate) fn is_zero_i64(value: &i64) -> bool {
    *value == 0
}

// In crates/core-types/src/types.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use rust_decimal::Decimal;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::wire::{self, AsText};
use crate::Error;

/// The JSON key that names which record shape an object encodes.
pub const DISCRIMINATOR: &str = "_type";

/// The closed set of record shapes known to the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Stock,
    Trade,
}

impl RecordKind {
    pub const ALL: [RecordKind; 2] = [RecordKind::Stock, RecordKind::Trade];

    /// The exact discriminator text written to `_type`.
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Stock => "Stock",
            RecordKind::Trade => "Trade",
        }
    }

    /// Matches a `_type` value. Only the exact discriminator text is recognized.
    pub fn from_discriminator(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lenient parsing for command-line use: `stock`, `Stock` and `STOCK` all work.
impl FromStr for RecordKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownRecordKind(s.to_string()))
    }
}

/// A wall-clock time of day, with the UTC offset it was written with if any.
///
/// Equality compares the written form, so `10:00+02:00` and `08:00+00:00` are
/// different timestamps even though they name the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp {
    local: NaiveDateTime,
    offset: Option<FixedOffset>,
}

impl Timestamp {
    /// The date and time as written, without applying the offset.
    pub fn naive_local(&self) -> NaiveDateTime {
        self.local
    }

    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    /// The fixed instant, when an offset was given.
    pub fn to_datetime(&self) -> Option<DateTime<FixedOffset>> {
        self.offset
            .and_then(|offset| offset.from_local_datetime(&self.local).single())
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(local: NaiveDateTime) -> Self {
        Self {
            local,
            offset: None,
        }
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(datetime: DateTime<FixedOffset>) -> Self {
        Self {
            local: datetime.naive_local(),
            offset: Some(*datetime.offset()),
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&wire::format_timestamp(self))
    }
}

/// An end-of-day OHLCV quote for a traded symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct PriceBar {
    pub symbol: String,
    #[serde(deserialize_with = "wire::deserialize_date")]
    pub date: NaiveDate,
    #[serde(deserialize_with = "wire::deserialize_decimal")]
    pub open: Decimal,
    #[serde(deserialize_with = "wire::deserialize_decimal")]
    pub high: Decimal,
    #[serde(deserialize_with = "wire::deserialize_decimal")]
    pub low: Decimal,
    #[serde(deserialize_with = "wire::deserialize_decimal")]
    pub close: Decimal,
    pub volume: u64,
}

impl PriceBar {
    pub fn new(
        symbol: impl Into<String>,
        date: NaiveDate,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: u64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Writes the discriminator first, then every field in declaration order.
impl Serialize for PriceBar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("PriceBar", 8)?;
        state.serialize_field(DISCRIMINATOR, RecordKind::Stock.as_str())?;
        state.serialize_field("symbol", &self.symbol)?;
        state.serialize_field("date", &AsText(&self.date))?;
        state.serialize_field("open", &AsText(&self.open))?;
        state.serialize_field("high", &AsText(&self.high))?;
        state.serialize_field("low", &AsText(&self.low))?;
        state.serialize_field("close", &AsText(&self.close))?;
        state.serialize_field("volume", &self.volume)?;
        state.end()
    }
}

/// A single buy/sell fill with its price, size and commission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct TradeExecution {
    pub symbol: String,
    /// Time of the fill. An offset is kept only when the input carried one.
    #[serde(deserialize_with = "wire::deserialize_timestamp")]
    pub timestamp: Timestamp,
    /// Order side as given by the caller, usually `"buy"` or `"sell"`.
    pub order: String,
    #[serde(deserialize_with = "wire::deserialize_decimal")]
    pub price: Decimal,
    pub volume: i64,
    #[serde(deserialize_with = "wire::deserialize_decimal")]
    pub commission: Decimal,
}

impl TradeExecution {
    pub fn new(
        symbol: impl Into<String>,
        timestamp: impl Into<Timestamp>,
        order: impl Into<String>,
        price: Decimal,
        volume: i64,
        commission: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp: timestamp.into(),
            order: order.into(),
            price,
            volume,
            commission,
        }
    }
}

impl Serialize for TradeExecution {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("TradeExecution", 7)?;
        state.serialize_field(DISCRIMINATOR, RecordKind::Trade.as_str())?;
        state.serialize_field("symbol", &self.symbol)?;
        state.serialize_field("timestamp", &AsText(&self.timestamp))?;
        state.serialize_field("order", &self.order)?;
        state.serialize_field("price", &AsText(&self.price))?;
        state.serialize_field("volume", &self.volume)?;
        state.serialize_field("commission", &AsText(&self.commission))?;
        state.end()
    }
}

/// Either record shape. Serializes exactly like the record it holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Record {
    Stock(PriceBar),
    Trade(TradeExecution),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Stock(_) => RecordKind::Stock,
            Record::Trade(_) => RecordKind::Trade,
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Record::Stock(bar) => &bar.symbol,
            Record::Trade(trade) => &trade.symbol,
        }
    }
}

impl From<PriceBar> for Record {
    fn from(bar: PriceBar) -> Self {
        Record::Stock(bar)
    }
}

impl From<TradeExecution> for Record {
    fn from(trade: TradeExecution) -> Self {
        Record::Trade(trade)
    }
}

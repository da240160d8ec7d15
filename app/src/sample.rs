// In app/src/sample.rs

use chrono::{NaiveDate, NaiveDateTime};
use codec::Document;
use core_types::{PriceBar, TradeExecution};
use rust_decimal_macros::dec;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 11, 22).expect("valid calendar date")
}

fn at(hour: u32, min: u32, sec: u32) -> NaiveDateTime {
    day().and_hms_opt(hour, min, sec).expect("valid time of day")
}

/// End-of-day quotes for 2018-11-22.
pub fn quotes() -> Vec<PriceBar> {
    vec![
        PriceBar::new("TSLA", day(), dec!(338.19), dec!(338.64), dec!(337.60), dec!(338.19), 365_607),
        PriceBar::new("AAPL", day(), dec!(176.66), dec!(177.25), dec!(176.64), dec!(176.78), 3_699_184),
        PriceBar::new("MSFT", day(), dec!(103.25), dec!(103.48), dec!(103.07), dec!(103.11), 4_493_689),
    ]
}

/// Fills made the same morning.
pub fn trades() -> Vec<TradeExecution> {
    vec![
        TradeExecution::new("TSLA", at(10, 5, 12), "buy", dec!(338.25), 100, dec!(9.99)),
        TradeExecution::new("AAPL", at(10, 30, 5), "sell", dec!(177.01), 20, dec!(9.99)),
    ]
}

/// The day's activity as one document: `{"quotes": [...], "trades": [...]}`.
pub fn activity() -> Document {
    [
        ("quotes", Document::from(quotes())),
        ("trades", Document::from(trades())),
    ]
    .into_iter()
    .collect()
}

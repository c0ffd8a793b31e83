//! Purpose: Typed view of an option-chain quote response.
//! Exports: `OptionChain`, `Quote`, `Contract`, `ContractKind`, `expiration_date`.
//! Role: Reference caller of the value model; walks `optionChain.result[0]` with
//! get-or-default lookups the way spreadsheet/report glue consumes quotes.
//! Invariants: Only a missing `optionChain.result[0]` is fatal; every other field defaults.
//! Invariants: Volume and open interest are integers; prices are floats.
//! Invariants: Expiration choices that match nothing fall back to the first date.
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::debug;

use crate::core::error::Error;
use crate::core::value::Value;
use crate::delta::{black_scholes_delta, years_to_expiry};
use crate::lookup::{Path, bool_or, f64_or, i64_or, str_or};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractKind {
    Call,
    Put,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Quote {
    pub symbol: String,
    pub regular_market_price: f64,
    pub currency: String,
}

impl Quote {
    pub fn from_value(quote: &Value) -> Self {
        // A zero or missing regular price falls back to `currentPrice`.
        let price = f64_or(quote, "regularMarketPrice", 0.0);
        let regular_market_price = if price == 0.0 {
            f64_or(quote, "currentPrice", 0.0)
        } else {
            price
        };
        Self {
            symbol: str_or(quote, "symbol", "").to_string(),
            regular_market_price,
            currency: str_or(quote, "currency", "").to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Contract {
    pub contract_symbol: String,
    pub kind: ContractKind,
    pub strike: f64,
    pub last_price: f64,
    pub bid: f64,
    pub ask: f64,
    pub change: f64,
    pub percent_change: f64,
    pub volume: i64,
    pub open_interest: i64,
    pub implied_volatility: f64,
    pub in_the_money: bool,
    pub expiration: i64,
}

impl Contract {
    pub fn from_value(entry: &Value, kind: ContractKind) -> Self {
        Self {
            contract_symbol: str_or(entry, "contractSymbol", "").to_string(),
            kind,
            strike: f64_or(entry, "strike", 0.0),
            last_price: f64_or(entry, "lastPrice", 0.0),
            bid: f64_or(entry, "bid", 0.0),
            ask: f64_or(entry, "ask", 0.0),
            change: f64_or(entry, "change", 0.0),
            percent_change: f64_or(entry, "percentChange", 0.0),
            volume: i64_or(entry, "volume", 0),
            open_interest: i64_or(entry, "openInterest", 0),
            implied_volatility: f64_or(entry, "impliedVolatility", 0.0),
            in_the_money: bool_or(entry, "inTheMoney", false),
            expiration: i64_or(entry, "expiration", 0),
        }
    }

    /// Midpoint of a two-sided market, else the last traded price.
    pub fn mid(&self) -> f64 {
        if self.bid > 0.0 && self.ask > 0.0 {
            (self.bid + self.ask) / 2.0
        } else {
            self.last_price
        }
    }

    /// Black-Scholes delta against `spot`, with time left measured from `now_unix`
    /// to this contract's `expiration`.
    pub fn delta(&self, spot: f64, now_unix: i64) -> f64 {
        black_scholes_delta(
            spot,
            self.strike,
            years_to_expiry(self.expiration, now_unix),
            self.implied_volatility,
            self.kind,
        )
    }
}

/// UTC calendar date of an expiration timestamp.
pub fn expiration_date(expiration: i64) -> Option<time::Date> {
    OffsetDateTime::from_unix_timestamp(expiration)
        .ok()
        .map(OffsetDateTime::date)
}

fn parse_date(text: &str) -> Option<time::Date> {
    OffsetDateTime::parse(&format!("{text}T00:00:00Z"), &Rfc3339)
        .ok()
        .map(OffsetDateTime::date)
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct OptionChain {
    pub underlying: Quote,
    pub expiration_dates: Vec<i64>,
    pub strikes: Vec<f64>,
    pub calls: Vec<Contract>,
    pub puts: Vec<Contract>,
}

impl OptionChain {
    pub fn from_value(root: &Value) -> Result<Self, Error> {
        let result = Path::root()
            .key("optionChain")
            .key("result")
            .index(0)
            .resolve(root)?;

        let underlying = result
            .as_object()
            .and_then(|obj| obj.try_get("quote"))
            .map(Quote::from_value)
            .unwrap_or_default();
        let expiration_dates = numbers(result, "expirationDates")
            .filter_map(Value::as_i64)
            .collect();
        let strikes = numbers(result, "strikes")
            .filter_map(Value::as_f64)
            .collect();

        let options = Path::root().key("options").index(0).find(result);
        let calls = contracts(options, "calls", ContractKind::Call);
        let puts = contracts(options, "puts", ContractKind::Put);
        debug!(
            symbol = %underlying.symbol,
            calls = calls.len(),
            puts = puts.len(),
            "extracted option chain"
        );

        Ok(Self {
            underlying,
            expiration_dates,
            strikes,
            calls,
            puts,
        })
    }

    /// Pick an expiration by 1-based position (`"2"`) or by date (`"2025-01-17"`).
    /// No choice, or one that matches nothing, selects the first expiration.
    /// `None` only when the chain lists no expirations.
    pub fn select_expiration(&self, choice: Option<&str>) -> Option<i64> {
        let first = *self.expiration_dates.first()?;
        let choice = choice.map(str::trim).unwrap_or_default();
        if choice.is_empty() {
            return Some(first);
        }
        let selected = if choice.bytes().all(|b| b.is_ascii_digit()) {
            choice
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|idx| self.expiration_dates.get(idx).copied())
        } else {
            parse_date(choice).and_then(|date| {
                self.expiration_dates
                    .iter()
                    .copied()
                    .find(|&ts| expiration_date(ts) == Some(date))
            })
        };
        if selected.is_none() {
            debug!(choice, first, "expiration choice matched nothing; using first");
        }
        Some(selected.unwrap_or(first))
    }
}

fn numbers<'v>(parent: &'v Value, key: &str) -> impl Iterator<Item = &'v Value> {
    parent
        .as_object()
        .and_then(|obj| obj.try_get(key))
        .and_then(Value::as_array)
        .into_iter()
        .flat_map(|items| items.iter())
}

fn contracts(options: Option<&Value>, key: &str, kind: ContractKind) -> Vec<Contract> {
    let Some(entries) = options
        .and_then(Value::as_object)
        .and_then(|obj| obj.try_get(key))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };
    entries
        .iter()
        .enumerate()
        .filter_map(|(idx, entry)| {
            if entry.as_object().is_none() {
                debug!(index = idx, found = %entry.kind(), kind = ?kind, "skipping non-object contract");
                return None;
            }
            Some(Contract::from_value(entry, kind))
        })
        .collect()
}

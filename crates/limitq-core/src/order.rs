//! Order-related enums and the venue order request.
//!
//! Every enum is closed and carries an explicit `wire()` mapping to the
//! venue API's string values, so an invalid exchange/product/side is a
//! construction-time error rather than a runtime lookup failure.

use crate::decimal::Price;
use crate::error::CoreError;
use crate::intent::{Classification, OrderIntent};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Exchange segment an instrument trades on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Exchange {
    /// NSE cash equities.
    Nse,
    /// NFO equity/index derivatives (options and futures).
    Nfo,
    /// CDS currency derivatives.
    Cds,
}

impl Exchange {
    /// Venue API wire value.
    pub fn wire(&self) -> &'static str {
        match self {
            Self::Nse => "NSE",
            Self::Nfo => "NFO",
            Self::Cds => "CDS",
        }
    }

    /// Quote lookup key for a symbol on this exchange, e.g. `NSE:INFY`.
    pub fn quote_key(&self, symbol: &str) -> String {
        format!("{}:{symbol}", self.wire())
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire())
    }
}

/// Order side: buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Venue API wire value.
    pub fn wire(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire())
    }
}

impl FromStr for Side {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            other => Err(CoreError::InvalidSide(other.to_string())),
        }
    }
}

/// Settlement/margin treatment of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Product {
    /// Cash and carry (delivery-style settlement, equities).
    Cnc,
    /// Intraday margin.
    Mis,
    /// Normal carry-forward margin (derivatives).
    Nrml,
}

impl Product {
    /// Venue API wire value.
    pub fn wire(&self) -> &'static str {
        match self {
            Self::Cnc => "CNC",
            Self::Mis => "MIS",
            Self::Nrml => "NRML",
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire())
    }
}

impl FromStr for Product {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CNC" => Ok(Self::Cnc),
            "MIS" => Ok(Self::Mis),
            "NRML" => Ok(Self::Nrml),
            other => Err(CoreError::InvalidProduct(other.to_string())),
        }
    }
}

/// Order placement variety.
///
/// After-market (`amo`) orders are queued by the venue until the next
/// session open; `regular` orders go straight to the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variety {
    /// After-market/queued order (the default for this bot).
    #[default]
    Amo,
    /// Immediate regular order.
    Regular,
}

impl Variety {
    /// Venue API wire value (also the URL path segment).
    pub fn wire(&self) -> &'static str {
        match self {
            Self::Amo => "amo",
            Self::Regular => "regular",
        }
    }
}

impl fmt::Display for Variety {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire())
    }
}

/// Venue-assigned order identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A fully-resolved single-leg limit order, ready for submission.
///
/// Always LIMIT order type with DAY validity; those are fixed for this
/// system and hard-coded at the transport layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitOrder {
    pub variety: Variety,
    pub exchange: Exchange,
    pub symbol: String,
    pub side: Side,
    pub quantity: u32,
    pub product: Product,
    pub price: Price,
}

impl LimitOrder {
    /// Assemble an order from an intent, its classification, and the
    /// resolved limit price.
    pub fn assemble(
        intent: &OrderIntent,
        classification: Classification,
        variety: Variety,
        price: Price,
    ) -> Self {
        Self {
            variety,
            exchange: classification.exchange,
            symbol: intent.symbol.clone(),
            side: intent.side,
            quantity: intent.quantity,
            product: classification.product,
            price,
        }
    }
}

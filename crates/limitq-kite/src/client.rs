//! HTTP client for the venue REST API.
//!
//! One client instance owns an established [`Session`] and exposes the
//! three operations the bot needs: an identity check, a live-quote
//! lookup, and limit-order submission. Every submission is a single
//! atomic attempt; retry policy belongs to the caller.

use crate::broker::{BoxFuture, Broker};
use crate::error::{KiteError, KiteResult};
use crate::session::{session_checksum, Credentials, Session};
use crate::types::{Envelope, OrderData, ProfileData, QuoteMap, TokenData};
use limitq_core::{Exchange, LimitOrder, OrderId, Price, Quote, Side};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// API version header required by the venue.
const VERSION_HEADER: (&str, &str) = ("X-Kite-Version", "3");

/// Fixed order attributes for this system: always a limit order, always
/// day validity.
const ORDER_TYPE: &str = "LIMIT";
const VALIDITY: &str = "DAY";

/// Venue user identity, returned by the profile endpoint.
#[derive(Debug, Clone)]
pub struct Profile {
    pub user_id: String,
    pub user_name: Option<String>,
}

/// Client for the venue REST API.
pub struct KiteClient {
    http: Client,
    base_url: String,
    session: Session,
}

impl KiteClient {
    /// Create a client bound to an established session.
    pub fn new(base_url: impl Into<String>, session: Session) -> KiteResult<Self> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| KiteError::Http(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            session,
        })
    }

    /// Exchange a one-time request token for an access token.
    ///
    /// Used during interactive login, before any session exists, so this
    /// is an associated function with its own short-lived client.
    pub async fn exchange_request_token(
        base_url: &str,
        credentials: &Credentials,
        request_token: &str,
    ) -> KiteResult<String> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| KiteError::Http(format!("Failed to create HTTP client: {e}")))?;

        let checksum = session_checksum(&credentials.api_key, request_token, &credentials.api_secret);
        let form = [
            ("api_key", credentials.api_key.as_str()),
            ("request_token", request_token),
            ("checksum", checksum.as_str()),
        ];

        let response = http
            .post(format!("{base_url}/session/token"))
            .header(VERSION_HEADER.0, VERSION_HEADER.1)
            .form(&form)
            .send()
            .await
            .map_err(|e| KiteError::Http(format!("HTTP request failed: {e}")))?;

        let data: TokenData = read_envelope(response)
            .await
            .map_err(|e| KiteError::Auth(e.to_string()))?;

        info!("Session token issued");
        Ok(data.access_token)
    }

    /// Lightweight identity check; succeeds iff the session token is
    /// still valid.
    pub async fn profile(&self) -> KiteResult<Profile> {
        let response = self
            .get("/user/profile")
            .send()
            .await
            .map_err(|e| KiteError::Http(format!("HTTP request failed: {e}")))?;

        let data: ProfileData = read_envelope(response).await?;
        Ok(Profile {
            user_id: data.user_id,
            user_name: data.user_name,
        })
    }

    /// Fetch the live two-sided quote for one instrument.
    ///
    /// Any failure along the way (transport, venue error, missing
    /// instrument, one-sided book) collapses into `QuoteUnavailable`;
    /// a synthetic or stale price is never substituted.
    pub async fn quote(&self, exchange: Exchange, symbol: &str) -> KiteResult<Quote> {
        let key = exchange.quote_key(symbol);
        let unavailable = |reason: String| KiteError::QuoteUnavailable {
            key: key.clone(),
            reason,
        };

        let response = self
            .get("/quote")
            .query(&[("i", key.as_str())])
            .send()
            .await
            .map_err(|e| unavailable(format!("transport: {e}")))?;

        let mut data: QuoteMap = read_envelope(response)
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let instrument = data
            .remove(&key)
            .ok_or_else(|| unavailable("instrument missing from response".to_string()))?;

        let quote = quote_from_depth(&key, &instrument.depth)?;
        debug!(%key, best_bid = %quote.best_bid, best_ask = %quote.best_ask, "Quote fetched");
        Ok(quote)
    }

    /// Resolve the limit price for an order: join the best bid when
    /// buying, the best ask when selling.
    pub async fn resolve_price(
        &self,
        exchange: Exchange,
        symbol: &str,
        side: Side,
    ) -> KiteResult<Price> {
        let quote = self.quote(exchange, symbol).await?;
        Ok(quote.join_price(side))
    }

    /// Submit a single limit order. One atomic attempt, no retry.
    pub async fn place_limit_order(&self, order: &LimitOrder) -> KiteResult<OrderId> {
        let response = self
            .http
            .post(format!(
                "{}/orders/{}",
                self.base_url,
                order.variety.wire()
            ))
            .header(VERSION_HEADER.0, VERSION_HEADER.1)
            .header("Authorization", self.session.auth_header())
            .form(&order_form(order))
            .send()
            .await
            .map_err(|e| KiteError::Http(format!("HTTP request failed: {e}")))?;

        let data: OrderData = read_envelope(response).await.map_err(|e| match e {
            KiteError::Api { message, .. } => KiteError::OrderRejected { message },
            other => other,
        })?;

        info!(
            order_id = %data.order_id,
            symbol = %order.symbol,
            side = %order.side,
            price = %order.price,
            "Order placed"
        );
        Ok(OrderId::new(data.order_id))
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .get(format!("{}{path}", self.base_url))
            .header(VERSION_HEADER.0, VERSION_HEADER.1)
            .header("Authorization", self.session.auth_header())
    }
}

impl Broker for KiteClient {
    fn resolve_price<'a>(
        &'a self,
        exchange: Exchange,
        symbol: &'a str,
        side: Side,
    ) -> BoxFuture<'a, KiteResult<Price>> {
        Box::pin(self.resolve_price(exchange, symbol, side))
    }

    fn place_limit_order<'a>(&'a self, order: &'a LimitOrder) -> BoxFuture<'a, KiteResult<OrderId>> {
        Box::pin(self.place_limit_order(order))
    }
}

/// Pick the best resting level on each side of the book.
///
/// Levels arrive best-first; an empty side means the quote is unusable
/// for limit pricing.
fn quote_from_depth(key: &str, depth: &crate::types::MarketDepth) -> KiteResult<Quote> {
    let unavailable = |reason: &str| KiteError::QuoteUnavailable {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    let best_bid = depth
        .buy
        .first()
        .map(|level| Price::new(level.price))
        .ok_or_else(|| unavailable("no resting bids"))?;
    let best_ask = depth
        .sell
        .first()
        .map(|level| Price::new(level.price))
        .ok_or_else(|| unavailable("no resting asks"))?;

    Ok(Quote::new(best_bid, best_ask))
}

/// Form fields for the order placement endpoint.
fn order_form(order: &LimitOrder) -> Vec<(&'static str, String)> {
    vec![
        ("exchange", order.exchange.wire().to_string()),
        ("tradingsymbol", order.symbol.clone()),
        ("transaction_type", order.side.wire().to_string()),
        ("quantity", order.quantity.to_string()),
        ("product", order.product.wire().to_string()),
        ("order_type", ORDER_TYPE.to_string()),
        ("price", order.price.to_string()),
        ("validity", VALIDITY.to_string()),
    ]
}

/// Decode a response envelope, mapping HTTP and venue-level errors to
/// `KiteError::Api`.
async fn read_envelope<T: DeserializeOwned>(response: reqwest::Response) -> KiteResult<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| KiteError::Http(format!("Failed to read response body: {e}")))?;

    let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| KiteError::Api {
        status: status.as_u16(),
        message: format!("malformed response: {e}"),
    })?;

    if !status.is_success() || !envelope.is_success() {
        return Err(KiteError::Api {
            status: status.as_u16(),
            message: envelope.error_message(),
        });
    }

    envelope.data.ok_or(KiteError::Api {
        status: status.as_u16(),
        message: "missing data in success response".to_string(),
    })
}

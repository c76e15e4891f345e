//! Symbol-to-exchange classification with product defaulting.
//!
//! The routing heuristic leans entirely on the venue's symbology:
//! derivative contracts encode strike/expiry digits in the trading symbol
//! (e.g. `NIFTY24DEC22000CE`), cash equities do not, and currency
//! derivatives carry an INR pair token (e.g. `USDINR24DECFUT`).

use crate::intent::Classification;
use crate::order::{Exchange, Product};

/// Currency-pair tokens that route a derivative symbol to CDS.
const CURRENCY_TOKENS: [&str; 5] = ["USDINR", "EURINR", "GBPINR", "JPYINR", "INR"];

/// Digit count at or above which a symbol is treated as a derivative
/// contract rather than a cash-market equity.
const DERIVATIVE_DIGIT_THRESHOLD: usize = 2;

/// Classify a raw trading symbol into its exchange segment and settlement
/// product. Pure and infallible: malformed symbols degrade to NSE equity.
///
/// An explicitly supplied product is never overridden; `None` resolves to
/// the per-exchange default (CNC for equities, NRML for derivatives).
pub fn classify(symbol: &str, explicit_product: Option<Product>) -> Classification {
    let exchange = detect_exchange(symbol);
    let product = explicit_product.unwrap_or(match exchange {
        Exchange::Nse => Product::Cnc,
        Exchange::Nfo | Exchange::Cds => Product::Nrml,
    });
    Classification { exchange, product }
}

fn detect_exchange(symbol: &str) -> Exchange {
    let digits = symbol.chars().filter(|c| c.is_ascii_digit()).count();
    if digits < DERIVATIVE_DIGIT_THRESHOLD {
        return Exchange::Nse;
    }

    let upper = symbol.to_ascii_uppercase();
    if CURRENCY_TOKENS.iter().any(|token| upper.contains(token)) {
        Exchange::Cds
    } else {
        Exchange::Nfo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_equity_symbol() {
        let c = classify("INFY", None);
        assert_eq!(c.exchange, Exchange::Nse);
        assert_eq!(c.product, Product::Cnc);
    }

    #[test]
    fn test_equity_with_suffix_and_no_digits() {
        let c = classify("AAPL-EQ", None);
        assert_eq!(c.exchange, Exchange::Nse);
        assert_eq!(c.product, Product::Cnc);
    }

    #[test]
    fn test_single_digit_stays_equity() {
        // One digit is below the derivative threshold.
        let c = classify("3MINDIA", None);
        assert_eq!(c.exchange, Exchange::Nse);
    }

    #[test]
    fn test_index_option_routes_to_nfo() {
        let c = classify("NIFTY24DEC22000CE", None);
        assert_eq!(c.exchange, Exchange::Nfo);
        assert_eq!(c.product, Product::Nrml);
    }

    #[test]
    fn test_stock_future_routes_to_nfo() {
        let c = classify("RELIANCE24JANFUT", None);
        assert_eq!(c.exchange, Exchange::Nfo);
        assert_eq!(c.product, Product::Nrml);
    }

    #[test]
    fn test_currency_future_routes_to_cds() {
        let c = classify("USDINR24DECFUT", None);
        assert_eq!(c.exchange, Exchange::Cds);
        assert_eq!(c.product, Product::Nrml);
    }

    #[test]
    fn test_all_currency_pairs_route_to_cds() {
        for symbol in ["EURINR24DECFUT", "GBPINR24DECFUT", "JPYINR24DECFUT"] {
            assert_eq!(classify(symbol, None).exchange, Exchange::Cds, "{symbol}");
        }
    }

    #[test]
    fn test_currency_token_match_is_case_insensitive() {
        let c = classify("usdinr24decfut", None);
        assert_eq!(c.exchange, Exchange::Cds);
    }

    #[test]
    fn test_currency_token_requires_derivative_digits() {
        // INR in the name but no contract digits: stays a cash symbol.
        let c = classify("INRBANK", None);
        assert_eq!(c.exchange, Exchange::Nse);
        assert_eq!(c.product, Product::Cnc);
    }

    #[test]
    fn test_explicit_product_never_overridden() {
        assert_eq!(classify("INFY", Some(Product::Mis)).product, Product::Mis);
        assert_eq!(
            classify("NIFTY24DEC22000CE", Some(Product::Mis)).product,
            Product::Mis
        );
        assert_eq!(
            classify("USDINR24DECFUT", Some(Product::Cnc)).product,
            Product::Cnc
        );
    }

    #[test]
    fn test_empty_symbol_degrades_to_equity() {
        let c = classify("", None);
        assert_eq!(c.exchange, Exchange::Nse);
        assert_eq!(c.product, Product::Cnc);
    }
}

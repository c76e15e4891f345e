//! Core domain types for the limitq order placement bot.
//!
//! This crate provides the fundamental types used throughout the system:
//! - `Exchange`, `Product`, `Side`, `Variety`: closed trading enums with
//!   explicit wire-value mappings
//! - `Price`: precision-safe decimal newtype
//! - `OrderIntent`, `Classification`, `LimitOrder`: the order life cycle
//!   from queue row to venue request
//! - `classify`: symbol-to-exchange routing with product defaulting

pub mod classify;
pub mod decimal;
pub mod error;
pub mod intent;
pub mod order;
pub mod quote;

pub use classify::classify;
pub use decimal::Price;
pub use error::{CoreError, Result};
pub use intent::{Classification, OrderIntent};
pub use order::{Exchange, LimitOrder, OrderId, Product, Side, Variety};
pub use quote::Quote;

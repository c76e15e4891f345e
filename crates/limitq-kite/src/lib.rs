//! Venue client for a Kite Connect-style brokerage REST API.
//!
//! Provides:
//! - `Session`/`Credentials`: explicit session state, no process-wide token
//! - `KiteClient`: live-quote lookup and limit-order submission
//! - `Broker`: trait seam over the client for testing the reconciler

pub mod broker;
pub mod client;
pub mod error;
pub mod session;

mod types;

pub use broker::{Broker, BoxFuture, MockBroker};
pub use client::{KiteClient, Profile};
pub use error::{KiteError, KiteResult};
pub use session::{login_url, session_checksum, Credentials, Session};

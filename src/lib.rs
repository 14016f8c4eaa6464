//! Solidity deploy relay library.
//!
//! Three HTTP services composed in a strict forward chain:
//!
//! ```text
//! Caller ──▶ gateway ──▶ worker ──▶ deployer ──▶ (solc, EVM node)
//!    ◀────────── envelope with contractAddress ◀──────────
//! ```
//!
//! Each hop validates its input, forwards the deploy request downstream, and
//! relays the downstream envelope back without discarding detail.

pub mod blockchain;
pub mod config;
pub mod deployer;
pub mod gateway;
pub mod http;
pub mod observability;
pub mod solc;
pub mod worker;

pub use config::schema::RelayConfig;
pub use http::response::Envelope;

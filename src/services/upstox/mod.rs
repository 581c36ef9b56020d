//! Upstox brokerage integration (daily historical candles)

pub mod client;
pub mod messages;
pub mod provider;

pub use client::{ClientError, UpstoxClient, DEFAULT_BASE_URL};
pub use provider::UpstoxMarketDataProvider;

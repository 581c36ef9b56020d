//! External collaborators: market data, notifications, export.

pub mod cache;
pub mod export;
pub mod market_data;
pub mod notification;
pub mod upstox;

pub use cache::CachedProvider;
pub use market_data::{DataError, DataUnavailable, MarketDataProvider};
pub use notification::{build_digest, NotificationError, NotificationSink, TelegramNotifier};

//! External data sources

pub mod bybit;
pub mod market_data;

pub use bybit::BybitMarketDataProvider;
pub use market_data::MarketDataProvider;

//! Market data provider interface.

use crate::error::MarketDataError;
use crate::models::bar::Bar;
use async_trait::async_trait;

#[async_trait]
pub trait MarketDataProvider {
    /// Most recent `limit` bars for `symbol`, oldest first
    async fn get_bars(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Bar>, MarketDataError>;
}

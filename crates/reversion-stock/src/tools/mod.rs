//! JSON tools over the screening engines
//!
//! Each tool takes already-fetched data in its parameters, so the routing
//! layer decides where prices and filings come from.

pub mod conversion;
pub mod low;
pub mod macd;
pub mod price;
pub mod range;
pub mod render;

pub use conversion::ConversionSearchTool;
pub use low::LowProximityTool;
pub use macd::MacdTool;
pub use price::PriceExtractionTool;
pub use range::PriceRangeTool;
pub use render::RenderTool;

use reversion_tools::ToolRegistry;
use std::sync::Arc;

use crate::config::ScreenerConfig;

/// Register every screening tool, returning how many were added
pub fn register_tools(registry: &ToolRegistry, config: Arc<ScreenerConfig>) -> usize {
    let before = registry.len();
    registry.register(Arc::new(MacdTool::new(config.clone())));
    registry.register(Arc::new(LowProximityTool::new(config.clone())));
    registry.register(Arc::new(PriceRangeTool));
    registry.register(Arc::new(ConversionSearchTool::new(config.clone())));
    registry.register(Arc::new(PriceExtractionTool));
    registry.register(Arc::new(RenderTool::new(config)));
    registry.len() - before
}

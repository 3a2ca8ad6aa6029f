// HTTP surface of the engine
pub mod candle_service;

pub use candle_service::{build_router, CandleEngine};

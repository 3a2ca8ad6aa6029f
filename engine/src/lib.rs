// Engine library root
// This file declares the modules for the engine crate.

pub mod candles;
pub mod config;
pub mod data;
pub mod error;
pub mod services;

pub use config::EngineSettings;
pub use error::EngineError;
pub use services::{build_router, CandleEngine};

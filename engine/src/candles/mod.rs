// Candle computation: the query window and the open/close/high/low reduction.
pub mod aggregate;
pub mod window;

pub use aggregate::CandleAggregator;
pub use window::{HourWindow, WindowZone};

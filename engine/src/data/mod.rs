// Dataset access: the CSV backing store and its row parser.
pub mod csv_parser;
pub mod market_data;

pub use market_data::{CsvTradeSource, TradeDataset, TradeSource};

// Backing store for trade records. Nothing is cached: every load reopens the file.
use csv::{ReaderBuilder, StringRecord};
use shared::models::TradeRecord;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use super::csv_parser::OrderBookCsvParser;
use crate::error::EngineError;

// Records that parsed, in file order, plus how many rows were dropped.
#[derive(Debug, Default, Clone)]
pub struct TradeDataset {
    pub records: Vec<TradeRecord>,
    pub skipped_rows: usize,
}

pub trait TradeSource: Send + Sync {
    fn describe(&self) -> String;
    fn load(&self) -> Result<TradeDataset, EngineError>;
}

pub struct CsvTradeSource {
    path: PathBuf,
}

impl CsvTradeSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvTradeSource { path: path.into() }
    }
}

impl TradeSource for CsvTradeSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<TradeDataset, EngineError> {
        let file = File::open(&self.path).map_err(|source| EngineError::DataSourceUnavailable {
            path: self.describe(),
            source,
        })?;
        // Header handling is left to the parser; rows must all have the
        // header's field count or the whole read fails.
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .from_reader(BufReader::new(file));

        let rows = rdr.records().collect::<Result<Vec<StringRecord>, csv::Error>>()?;
        if rows.is_empty() {
            return Err(EngineError::MalformedDataset(self.describe()));
        }

        let dataset = OrderBookCsvParser::parse_rows(&rows);
        tracing::debug!(
            path = %self.path.display(),
            records = dataset.records.len(),
            skipped = dataset.skipped_rows,
            "Loaded order book dataset"
        );
        Ok(dataset)
    }
}

// Hourly candle over the trade records of one code
use shared::models::{Candle, TradeRecord};
use std::sync::Arc;

use super::window::{HourWindow, WindowZone};
use crate::data::market_data::TradeSource;
use crate::error::EngineError;

#[derive(Clone)]
pub struct CandleAggregator {
    source: Arc<dyn TradeSource>,
    zone: WindowZone,
}

impl CandleAggregator {
    pub fn new(source: Arc<dyn TradeSource>, zone: WindowZone) -> Self {
        CandleAggregator { source, zone }
    }

    // Reads the whole dataset on every call; no state survives between calls.
    pub fn compute_candle(
        &self,
        code: &str,
        year: u16,
        month: u16,
        day: u16,
        hour: u16,
    ) -> Result<Candle, EngineError> {
        let dataset = self.source.load()?;
        let window = HourWindow::starting_at(&self.zone, year, month, day, hour)?;

        let matching: Vec<&TradeRecord> = records_in_window(&dataset.records, code, &window).collect();
        tracing::debug!(
            code = %code,
            start = %window.start(),
            matched = matching.len(),
            skipped_rows = dataset.skipped_rows,
            "Filtered trade records for candle"
        );

        summarize(&matching).ok_or_else(|| EngineError::NoData { code: code.to_string() })
    }
}

// Exact, case-sensitive code match; file order is preserved.
pub fn records_in_window<'a>(
    records: &'a [TradeRecord],
    code: &'a str,
    window: &'a HourWindow,
) -> impl Iterator<Item = &'a TradeRecord> + 'a {
    records
        .iter()
        .filter(move |record| record.code == code && window.contains(&record.timestamp))
}

// Open and close follow row order, not timestamp order. None for no records.
pub fn summarize(records: &[&TradeRecord]) -> Option<Candle> {
    let first = records.first()?;
    let last = records.last()?;
    let prices = records.iter().map(|record| record.price);

    Some(Candle {
        open: first.price,
        close: last.price,
        high: prices.clone().max()?,
        low: prices.min()?,
    })
}

use anyhow::{anyhow, Result};
use csv::StringRecord;
use shared::models::TradeRecord;

use super::market_data::TradeDataset;

// Field formats of the order book CSV
pub mod order_book_format {
    use anyhow::{anyhow, Result};
    use chrono::{DateTime, FixedOffset};

    // Fractional seconds are optional even though the canonical rows omit them.
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f %z";

    // Parses "2021-12-22 10:05:00 +0900 JST". The trailing zone name must look
    // like an abbreviation but is not interpreted; the numeric offset decides
    // the instant.
    pub fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>> {
        let (stamp, zone_name) = s
            .rsplit_once(' ')
            .ok_or_else(|| anyhow!("Failed to parse timestamp '{}': missing zone name", s))?;
        if !is_zone_abbreviation(zone_name) {
            return Err(anyhow!(
                "Failed to parse timestamp '{}': '{}' is not a zone abbreviation",
                s,
                zone_name
            ));
        }
        DateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
            .map_err(|e| anyhow!("Failed to parse timestamp '{}': {}", s, e))
    }

    // Three upper-case letters, four or five ending in 'T', the odd ones out
    // (ChST, MeST, WITA), GMT with an optional signed hour, or a bare signed
    // offset such as +09.
    fn is_zone_abbreviation(name: &str) -> bool {
        if name.len() < 3 {
            return false;
        }
        if matches!(name, "ChST" | "MeST" | "WITA") {
            return true;
        }
        if let Some(rest) = name.strip_prefix("GMT") {
            return rest.is_empty() || is_signed_offset(rest);
        }
        if name.starts_with('+') || name.starts_with('-') {
            return is_signed_offset(name);
        }
        if !name.bytes().all(|b| b.is_ascii_uppercase()) {
            return false;
        }
        match name.len() {
            3 => true,
            4 | 5 => name.ends_with('T'),
            _ => false,
        }
    }

    fn is_signed_offset(s: &str) -> bool {
        let digits = match s.strip_prefix('+').or_else(|| s.strip_prefix('-')) {
            Some(digits) => digits,
            None => return false,
        };
        !digits.is_empty()
            && digits.bytes().all(|b| b.is_ascii_digit())
            && digits.parse::<u32>().is_ok_and(|n| n <= 24 * 60 * 60)
    }

    // Prices are whole minor units; signs, spaces and decimals are rejected.
    pub fn parse_price(s: &str) -> Result<u64> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(anyhow!("Failed to parse price '{}': not an unsigned integer", s));
        }
        s.parse::<u64>()
            .map_err(|e| anyhow!("Failed to parse price '{}': {}", s, e))
    }

}

pub struct OrderBookCsvParser;

impl OrderBookCsvParser {
    // CSV Header: time,code,price
    // Example Row: 2021-12-22 10:05:00 +0900 JST,FTHD,3122
    //
    // The first row is always treated as the header. Rows that fail to parse
    // are logged and skipped; the rest are kept in file order.
    pub fn parse_rows(rows: &[StringRecord]) -> TradeDataset {
        let mut dataset = TradeDataset::default();

        for (idx, record) in rows.iter().enumerate().skip(1) {
            let line = record.position().map_or(idx as u64 + 1, |p| p.line());
            match Self::parse_record(record) {
                Ok(trade) => dataset.records.push(trade),
                Err(e) => {
                    tracing::warn!(line, error = %e, "Skipping unparsable order book row");
                    dataset.skipped_rows += 1;
                }
            }
        }
        dataset
    }

    pub fn parse_record(record: &StringRecord) -> Result<TradeRecord> {
        let time_str = record.get(0).ok_or_else(|| anyhow!("Missing 'time' field"))?;
        let code = record.get(1).ok_or_else(|| anyhow!("Missing 'code' field"))?;
        let price_str = record.get(2).ok_or_else(|| anyhow!("Missing 'price' field"))?;

        Ok(TradeRecord {
            timestamp: order_book_format::parse_timestamp(time_str)?,
            code: code.to_string(),
            price: order_book_format::parse_price(price_str)?,
        })
    }
}

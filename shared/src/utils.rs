// Parsing helpers shared by the engine's HTTP layer and its tests.
use anyhow::{anyhow, Result};

// Strict base-10 u16: ASCII digits only. `u16::from_str` would also take a
// leading '+', which query parameters must not accept.
pub fn parse_decimal_u16(s: &str) -> Result<u16> {
    if s.is_empty() {
        return Err(anyhow!("empty value"));
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(anyhow!("'{}' is not a decimal number", s));
    }
    s.parse::<u16>()
        .map_err(|e| anyhow!("Failed to parse '{}' as u16: {}", s, e))
}

// One-hour query window and the zone its calendar values are read in.
use chrono::{DateTime, Duration, FixedOffset, Local, Months, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use std::str::FromStr;

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowZone {
    /// Host time zone.
    Local,
    Fixed(FixedOffset),
    Named(Tz),
}

impl WindowZone {
    // Ambiguous local times (DST fold) resolve to the earliest instant;
    // times that fall in a DST gap have no instant at all.
    pub fn resolve(&self, naive: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            WindowZone::Local => Local
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.fixed_offset()),
            WindowZone::Fixed(offset) => offset.from_local_datetime(naive).single(),
            WindowZone::Named(tz) => tz
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.fixed_offset()),
        }
    }
}

impl FromStr for WindowZone {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("local") {
            return Ok(WindowZone::Local);
        }
        if s.starts_with('+') || s.starts_with('-') {
            return parse_offset(s).map(WindowZone::Fixed).ok_or_else(|| {
                EngineError::ConfigError(format!("Invalid UTC offset '{}', expected +HH:MM", s))
            });
        }
        s.parse::<Tz>()
            .map(WindowZone::Named)
            .map_err(|_| EngineError::ConfigError(format!("Unknown time zone '{}'", s)))
    }
}

// Accepts `+HH:MM`, `+HHMM` and `+HH`.
fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// The open interval `(start, start + 1h)`. A record stamped exactly at
/// either bound is outside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourWindow {
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
}

impl HourWindow {
    pub fn starting_at(
        zone: &WindowZone,
        year: u16,
        month: u16,
        day: u16,
        hour: u16,
    ) -> Result<Self, EngineError> {
        let start = normalized_start(year, month, day, hour)
            .and_then(|naive| zone.resolve(&naive))
            .ok_or(EngineError::InvalidWindow { year, month, day, hour })?;
        Ok(HourWindow { start, end: start + Duration::hours(1) })
    }

    pub fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    pub fn end(&self) -> DateTime<FixedOffset> {
        self.end
    }

    pub fn contains(&self, timestamp: &DateTime<FixedOffset>) -> bool {
        *timestamp > self.start && *timestamp < self.end
    }
}

// Out-of-range calendar values carry over: month 13 is January of the next
// year, day 0 the last day of the previous month, hour 24 the next midnight.
fn normalized_start(year: u16, month: u16, day: u16, hour: u16) -> Option<NaiveDateTime> {
    let jan_first = NaiveDate::from_ymd_opt(i32::from(year), 1, 1)?;
    let first_of_month = match month {
        0 => jan_first.checked_sub_months(Months::new(1))?,
        m => jan_first.checked_add_months(Months::new(u32::from(m) - 1))?,
    };
    let date = first_of_month.checked_add_signed(Duration::days(i64::from(day) - 1))?;
    date.and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::hours(i64::from(hour)))
}

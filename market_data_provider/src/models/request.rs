use chrono::{Datelike, NaiveDate, NaiveTime};
use thiserror::Error;

/// First calendar year a request may start in.
pub const EARLIEST_SUPPORTED_YEAR: i32 = 1980;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("symbol must not be empty")]
    EmptySymbol,

    #[error("symbol {0:?} contains unsupported characters")]
    InvalidSymbol(String),

    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    #[error("{0} is before the earliest supported date ({EARLIEST_SUPPORTED_YEAR}-01-01)")]
    BeforeEarliest(NaiveDate),

    #[error("{date} is after today ({today})")]
    AfterToday { date: NaiveDate, today: NaiveDate },
}

/// A validated request for daily bars.
///
/// Also serves as the cache key: two requests are the same entry when their
/// normalized symbol, start and end all match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchRequest {
    symbol: String,
    start: NaiveDate,
    end: NaiveDate,
}

impl FetchRequest {
    /// Normalizes `symbol` to upper case and checks the date range against
    /// `[1980-01-01, today]`.
    pub fn new(
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
    ) -> Result<Self, RequestError> {
        let symbol = normalize_symbol(symbol)?;

        if start > end {
            return Err(RequestError::InvertedRange { start, end });
        }
        if start.year() < EARLIEST_SUPPORTED_YEAR {
            return Err(RequestError::BeforeEarliest(start));
        }
        if end > today {
            return Err(RequestError::AfterToday { date: end, today });
        }

        Ok(Self { symbol, start, end })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Inclusive first day.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Exclusive last day.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Unix seconds of `start` at 00:00 UTC.
    pub fn start_timestamp(&self) -> i64 {
        self.start.and_time(NaiveTime::MIN).and_utc().timestamp()
    }

    /// Unix seconds of `end` at 00:00 UTC.
    pub fn end_timestamp(&self) -> i64 {
        self.end.and_time(NaiveTime::MIN).and_utc().timestamp()
    }
}

/// Trims and upper-cases a ticker. Tickers may contain letters, digits and
/// the punctuation used by index, class-share and FX symbols (`^ . - =`).
pub fn normalize_symbol(raw: &str) -> Result<String, RequestError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RequestError::EmptySymbol);
    }
    let valid = trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '^' | '.' | '-' | '='));
    if !valid {
        return Err(RequestError::InvalidSymbol(trimmed.to_string()));
    }
    Ok(trimmed.to_ascii_uppercase())
}

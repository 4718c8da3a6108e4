//! Wire shapes of the Yahoo Finance chart and quote endpoints and their
//! conversion into workspace models.

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use snafu::ResultExt;

use crate::{
    models::{bar::DailyBar, summary::QuoteSummary},
    providers::{ApiSnafu, DecodeSnafu, ProviderError},
};

/// Chart error code Yahoo uses for unknown or delisted symbols.
const NOT_FOUND: &str = "Not Found";

const MAX_CRUMB_LEN: usize = 64;

#[derive(Deserialize, Debug)]
pub struct ChartEnvelope {
    pub chart: ChartBody,
}

#[derive(Deserialize, Debug)]
pub struct ChartBody {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<YahooApiError>,
}

#[derive(Deserialize, Debug)]
pub struct YahooApiError {
    pub code: String,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ChartResult {
    #[serde(default)]
    pub meta: ChartMeta,
    /// Absent when the range holds no trading days.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: ChartIndicators,
}

#[derive(Deserialize, Debug, Default)]
pub struct ChartMeta {
    /// Exchange offset from UTC in seconds; used to recover the local date.
    #[serde(default)]
    pub gmtoffset: i64,
}

#[derive(Deserialize, Debug)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<ChartQuote>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ChartQuote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct QuoteEnvelope {
    pub quote_response: QuoteBody,
}

#[derive(Deserialize, Debug)]
pub struct QuoteBody {
    #[serde(default)]
    pub result: Vec<QuoteResult>,
    pub error: Option<YahooApiError>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResult {
    pub symbol: String,
    pub market_cap: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
}

/// Decodes a chart response into daily bars.
///
/// Rows with any missing OHLCV value are skipped. A `Not Found` chart error
/// is an empty result; any other chart error is [`ProviderError::Api`].
pub fn parse_chart(body: &str) -> Result<Vec<DailyBar>, ProviderError> {
    let envelope: ChartEnvelope = serde_json::from_str(body).context(DecodeSnafu)?;

    if let Some(err) = envelope.chart.error {
        if err.code == NOT_FOUND {
            return Ok(Vec::new());
        }
        return ApiSnafu {
            message: describe(&err),
        }
        .fail();
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(Vec::new());
    };

    let offset = result.meta.gmtoffset;
    let bars = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            let at = |col: &Vec<Option<f64>>| col.get(i).copied().flatten();
            Some(DailyBar {
                date: local_date(*ts, offset)?,
                open: at(&quote.open)?,
                high: at(&quote.high)?,
                low: at(&quote.low)?,
                close: at(&quote.close)?,
                volume: at(&quote.volume)?,
            })
        })
        .collect();

    Ok(bars)
}

/// Decodes a quote response for `symbol` into summary fields.
pub fn parse_quote(body: &str, symbol: &str) -> Result<QuoteSummary, ProviderError> {
    let envelope: QuoteEnvelope = serde_json::from_str(body).context(DecodeSnafu)?;

    if let Some(err) = envelope.quote_response.error {
        return ApiSnafu {
            message: describe(&err),
        }
        .fail();
    }

    let Some(row) = envelope
        .quote_response
        .result
        .into_iter()
        .find(|r| r.symbol.eq_ignore_ascii_case(symbol))
    else {
        return ApiSnafu {
            message: format!("no quote returned for {symbol}"),
        }
        .fail();
    };

    Ok(QuoteSummary {
        market_cap: row.market_cap,
        fifty_two_week_low: row.fifty_two_week_low,
        fifty_two_week_high: row.fifty_two_week_high,
    })
}

/// Validates the plain-text body of the crumb endpoint.
///
/// Without a valid session cookie Yahoo answers with an HTML or JSON error
/// page instead of a short token.
pub fn parse_crumb(body: &str) -> Result<String, ProviderError> {
    let crumb = body.trim();
    let plausible = !crumb.is_empty()
        && crumb.len() <= MAX_CRUMB_LEN
        && !crumb.starts_with(['<', '{'])
        && !crumb.chars().any(char::is_whitespace);
    if !plausible {
        let snippet: String = crumb.chars().take(80).collect();
        return ApiSnafu {
            message: format!("unexpected crumb response: {snippet:?}"),
        }
        .fail();
    }
    Ok(crumb.to_string())
}

fn local_date(ts: i64, gmtoffset: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(ts.checked_add(gmtoffset)?, 0).map(|dt| dt.date_naive())
}

fn describe(err: &YahooApiError) -> String {
    match &err.description {
        Some(d) => format!("{}: {}", err.code, d),
        None => err.code.clone(),
    }
}

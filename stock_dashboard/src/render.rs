//! Status cards as plain text, and the machine-readable JSON report.

use std::fmt::Write as _;

use chrono::NaiveDate;
use indicator_engine::{IndicatorParams, IndicatorSet, MarketSignal, SignalReading};
use market_data_provider::models::{
    price_series::PriceSeries,
    summary::{SummarySource, SymbolSummary},
};
use serde::Serialize;

use crate::app::Report;

const LABEL_WIDTH: usize = 20;

pub const DISCLAIMER: &str =
    "Disclaimer: This tool is for informational purposes only. Not financial advice.";

pub fn money(v: f64) -> String {
    format!("${v:.2}")
}

/// Market cap in billions, or `unknown`.
pub fn market_cap(cap: Option<f64>) -> String {
    match cap {
        Some(c) => format!("${:.2}B", c / 1e9),
        None => "unknown".to_string(),
    }
}

fn opt_pct(v: Option<f64>) -> String {
    v.map_or_else(|| "n/a".to_string(), |p| format!("{p:.2}%"))
}

fn line(out: &mut String, label: &str, value: impl std::fmt::Display) {
    let _ = writeln!(out, "{label:<LABEL_WIDTH$}{value}");
}

/// One-line text of the market status card.
pub fn signal_text(reading: Option<&SignalReading>) -> String {
    let Some(r) = reading else {
        return "n/a (needs at least 20 trading days)".to_string();
    };
    match r.signal {
        MarketSignal::Buy => format!(
            "BUY Signal: Market is down {:.2}% from peak",
            r.pct_from_peak.abs()
        ),
        MarketSignal::Sell => format!(
            "SELL Signal: Market is up {:.2}% from trough",
            r.pct_from_trough.unwrap_or(r.pct_from_peak)
        ),
        MarketSignal::Hold => "HOLD Signal: Market is within normal range".to_string(),
    }
}

pub fn render_text(report: &Report) -> String {
    let snapshot = &report.snapshot;
    let ind = &report.indicators;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{}  {} .. {}  ({} trading days)",
        snapshot.symbol,
        report.start,
        report.end,
        snapshot.series.len()
    );
    let _ = writeln!(out);

    let price = match (ind.latest_close, ind.latest_change_pct) {
        (Some(c), Some(p)) => format!("{}  ({p:+.2}%)", money(c)),
        (Some(c), None) => money(c),
        _ => "n/a".to_string(),
    };
    line(&mut out, "Current Price", price);
    line(&mut out, "Market Cap", market_cap(snapshot.summary.market_cap));
    line(&mut out, "52 Week Range", week_range(&snapshot.summary));
    let _ = writeln!(out);

    line(&mut out, "Market Status", signal_text(ind.market_signal.as_ref()));
    if let (Some(peak), Some(trough)) = (ind.peak(), ind.trough()) {
        line(
            &mut out,
            "20-Day Peak/Trough",
            format!("{} / {}", money(peak), money(trough)),
        );
    }
    line(
        &mut out,
        "Threshold",
        format!("{:.0}%", report.params.threshold_percent()),
    );
    line(&mut out, "Annual Volatility", opt_pct(ind.annualized_volatility));
    line(&mut out, "Volume", volume(&snapshot.series));

    if !ind.moving_averages.is_empty() {
        let mas = ind
            .moving_averages
            .keys()
            .map(|&w| {
                let v = ind.latest_ma(w).map_or_else(|| "n/a".to_string(), money);
                format!("MA{w} {v}")
            })
            .collect::<Vec<_>>()
            .join("   ");
        line(&mut out, "Moving Averages", mas);
    }

    let dist = &ind.return_distribution;
    let risk = match dist.mode_bin() {
        Some(bin) => format!(
            "{} daily returns in {} bins, most likely {:+.2}% to {:+.2}% (p={:.3})",
            dist.total,
            dist.bins.len(),
            bin.lower * 100.0,
            bin.upper * 100.0,
            bin.probability
        ),
        None => "n/a".to_string(),
    };
    line(&mut out, "Return Distribution", risk);

    let _ = writeln!(out);
    let _ = writeln!(out, "{DISCLAIMER}");
    out
}

/// Latest session's volume next to the mean over the range.
fn volume(series: &PriceSeries) -> String {
    match (series.last(), series.average_volume()) {
        (Some(last), Some(avg)) => format!("{:.0}  (avg {avg:.0})", last.volume),
        _ => "n/a".to_string(),
    }
}

fn week_range(summary: &SymbolSummary) -> String {
    let range = format!(
        "{} - {}",
        money(summary.fifty_two_week_low),
        money(summary.fifty_two_week_high)
    );
    match summary.source {
        SummarySource::Provider => range,
        SummarySource::SeriesFallback => format!("{range}  (from price history)"),
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    symbol: &'a str,
    start: NaiveDate,
    end: NaiveDate,
    bars: usize,
    last_date: Option<NaiveDate>,
    summary: &'a SymbolSummary,
    market_cap_or_zero: f64,
    /// Dated OHLCV rows the per-bar indicator arrays line up with.
    series: &'a PriceSeries,
    params: &'a IndicatorParams,
    indicators: &'a IndicatorSet,
}

pub fn render_json(report: &Report) -> serde_json::Result<String> {
    let snapshot = &report.snapshot;
    serde_json::to_string_pretty(&JsonReport {
        symbol: &snapshot.symbol,
        start: report.start,
        end: report.end,
        bars: snapshot.series.len(),
        last_date: snapshot.series.last().map(|b| b.date),
        summary: &snapshot.summary,
        market_cap_or_zero: snapshot.summary.market_cap_or_zero(),
        series: &snapshot.series,
        params: &report.params,
        indicators: &report.indicators,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use indicator_engine::signal::{SignalRule, evaluate};
    use market_data_provider::models::bar::DailyBar;

    use super::*;

    #[test]
    fn market_cap_in_billions() {
        assert_eq!(market_cap(Some(2_950_120_000_000.0)), "$2950.12B");
        assert_eq!(market_cap(None), "unknown");
    }

    #[test]
    fn signal_card_texts() {
        let buy = evaluate(100.0, Some(150.0), Some(100.0), 20.0, SignalRule::PeakOnly);
        assert_eq!(
            signal_text(buy.as_ref()),
            "BUY Signal: Market is down 33.33% from peak"
        );

        let hold = evaluate(124.0, Some(124.0), Some(105.0), 20.0, SignalRule::PeakOnly);
        assert!(signal_text(hold.as_ref()).starts_with("HOLD"));

        let sell = evaluate(124.0, Some(124.0), Some(100.0), 20.0, SignalRule::PeakTrough);
        assert_eq!(
            signal_text(sell.as_ref()),
            "SELL Signal: Market is up 24.00% from trough"
        );

        assert!(signal_text(None).starts_with("n/a"));
    }

    #[test]
    fn volume_card_shows_latest_and_average() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let series = PriceSeries::new(
            [1_000.0, 2_000.0, 6_000.0]
                .into_iter()
                .zip(day.iter_days())
                .map(|(volume, date)| DailyBar {
                    date,
                    open: 10.0,
                    high: 11.0,
                    low: 9.0,
                    close: 10.0,
                    volume,
                })
                .collect(),
        );
        assert_eq!(volume(&series), "6000  (avg 3000)");
        assert_eq!(volume(&PriceSeries::new(Vec::new())), "n/a");
    }
}

use std::{
    io::{self, BufRead, Write},
    sync::Arc,
};

use chrono::NaiveDate;
use indicator_engine::{IndicatorParams, IndicatorSet, derive};
use market_data_provider::{
    FetchError, FetchOutcome, MarketDataService,
    cache::PriceCache,
    models::snapshot::MarketSnapshot,
    providers::{ProviderInitError, yahoo_rest::YahooProvider},
};
use tracing::{info, warn};

use crate::{
    config::DashboardConfig,
    render::render_text,
    session::{Command, HELP, popular_menu},
};

/// A fetched snapshot together with the indicators derived from it.
#[derive(Debug, Clone)]
pub struct Report {
    pub snapshot: Arc<MarketSnapshot>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub params: IndicatorParams,
    pub indicators: IndicatorSet,
}

#[derive(Debug, Clone)]
pub enum Analysis {
    Report(Box<Report>),
    NoData { symbol: String },
}

pub struct Dashboard {
    service: MarketDataService,
    config: DashboardConfig,
}

impl Dashboard {
    pub fn new(service: MarketDataService, config: DashboardConfig) -> Self {
        Self { service, config }
    }

    /// Yahoo-backed dashboard on the system clock.
    pub fn from_config(config: DashboardConfig) -> Result<Self, ProviderInitError> {
        let provider = YahooProvider::with_config(config.yahoo.clone())?;
        let cache = PriceCache::new(config.cache_ttl());
        let service = MarketDataService::with_system_clock(Box::new(provider), cache);
        Ok(Self::new(service, config))
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn service(&self) -> &MarketDataService {
        &self.service
    }

    /// Fetches `symbol` over `range` (the configured lookback when `None`)
    /// and derives indicators with `params`.
    pub async fn analyze(
        &self,
        symbol: &str,
        range: Option<(NaiveDate, NaiveDate)>,
        params: &IndicatorParams,
    ) -> Result<Analysis, FetchError> {
        let (start, end) = range.unwrap_or_else(|| self.config.default_range(self.service.today()));

        let snapshot = match self.service.fetch(symbol, start, end).await? {
            FetchOutcome::Data(s) => s,
            FetchOutcome::NoData => {
                return Ok(Analysis::NoData {
                    symbol: symbol.trim().to_ascii_uppercase(),
                });
            }
        };

        let indicators = derive(&snapshot.series, params);
        Ok(Analysis::Report(Box::new(Report {
            snapshot,
            start,
            end,
            params: params.clone(),
            indicators,
        })))
    }

    pub fn clear_cache(&self) {
        self.service.clear_cache();
    }

    /// Reads commands from `input` until `quit` or end of input.
    ///
    /// A failed analysis is reported on `out` and the session continues.
    pub async fn run_interactive<R, W>(&self, input: R, mut out: W) -> io::Result<()>
    where
        R: BufRead,
        W: Write,
    {
        let mut params = match self.config.indicator_params() {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "configured indicator parameters rejected, using defaults");
                IndicatorParams::default()
            }
        };

        let mut range: Option<(NaiveDate, NaiveDate)> = None;

        writeln!(out, "Stock analysis dashboard. Type `help` for commands.")?;
        writeln!(out, "Popular: {}", popular_menu())?;
        prompt(&mut out)?;

        for line in input.lines() {
            let line = line?;
            match Command::parse(&line) {
                Err(msg) => writeln!(out, "{msg}")?,
                Ok(Command::Empty) => {}
                Ok(Command::Quit) => break,
                Ok(Command::Help) => writeln!(out, "{HELP}")?,
                Ok(Command::ClearCache) => {
                    self.clear_cache();
                    writeln!(out, "Cache cleared!")?;
                }
                Ok(Command::Threshold(t)) => {
                    match IndicatorParams::new(params.ma_windows().to_vec(), t, params.signal_rule()) {
                        Ok(p) => {
                            params = p;
                            writeln!(out, "Threshold set to {t}%")?;
                        }
                        Err(e) => writeln!(out, "{e}")?,
                    }
                }
                Ok(Command::MovingAverages(windows)) => {
                    let candidate = DashboardConfig {
                        ma_windows: windows,
                        ..self.config.clone()
                    };
                    let updated = candidate.validated().map_err(|e| e.to_string()).and_then(|c| {
                        IndicatorParams::new(c.ma_windows, params.threshold_percent(), params.signal_rule())
                            .map_err(|e| e.to_string())
                    });
                    match updated {
                        Ok(p) => {
                            writeln!(out, "Moving averages set to {:?}", p.ma_windows())?;
                            params = p;
                        }
                        Err(e) => writeln!(out, "{e}")?,
                    }
                }
                Ok(Command::Range(r)) => {
                    range = r;
                    match r {
                        Some((start, end)) => writeln!(out, "Range set to {start} .. {end}")?,
                        None => writeln!(
                            out,
                            "Range reset to the last {} days",
                            self.config.lookback_days
                        )?,
                    }
                }
                Ok(Command::Analyze(symbol)) => match self.analyze(&symbol, range, &params).await {
                    Ok(Analysis::Report(report)) => {
                        info!(symbol = %report.snapshot.symbol, "analysis complete");
                        write!(out, "{}", render_text(&report))?;
                    }
                    Ok(Analysis::NoData { symbol }) => {
                        writeln!(out, "No data available for {symbol} in the selected range.")?;
                    }
                    Err(e) => {
                        warn!(%symbol, error = %e, "analysis failed");
                        writeln!(out, "Error fetching data: {e}")?;
                    }
                },
            }
            prompt(&mut out)?;
        }
        Ok(())
    }
}

fn prompt<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "symbol> ")?;
    out.flush()
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use indicator_engine::SignalRule;
use stock_dashboard::{
    Analysis, ConfigOverrides, Dashboard, DashboardConfig,
    render::{render_json, render_text},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Stock analysis dashboard")]
struct Cli {
    /// TOML settings file.
    #[arg(long, global = true, value_name = "FILE", env = "DASHBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Movement threshold in percent, clamped to 5..=40.
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Moving-average windows, e.g. `--ma 20,50`.
    #[arg(long, global = true, value_delimiter = ',')]
    ma: Option<Vec<usize>>,

    #[arg(long, global = true, value_enum)]
    rule: Option<RuleArg>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Analyze one symbol and print the status cards.
    Analyze {
        symbol: String,
        /// First day, inclusive. Defaults to `lookback_days` before today.
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last day, exclusive. Defaults to today.
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Prompt for symbols until `quit`.
    Interactive,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum RuleArg {
    PeakOnly,
    PeakTrough,
}

impl From<RuleArg> for SignalRule {
    fn from(r: RuleArg) -> Self {
        match r {
            RuleArg::PeakOnly => SignalRule::PeakOnly,
            RuleArg::PeakTrough => SignalRule::PeakTrough,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = DashboardConfig::load(cli.config.as_deref())
        .context("loading dashboard configuration")?
        .with_overrides(ConfigOverrides {
            threshold_percent: cli.threshold,
            ma_windows: cli.ma,
            signal_rule: cli.rule.map(Into::into),
        })
        .context("applying command-line overrides")?;
    let params = config.indicator_params()?;
    let dashboard = Dashboard::from_config(config).context("building the Yahoo client")?;

    match cli.cmd {
        Cmd::Analyze {
            symbol,
            start,
            end,
            format,
        } => {
            let today = dashboard.service().today();
            let (default_start, default_end) = dashboard.config().default_range(today);
            let range = (start.unwrap_or(default_start), end.unwrap_or(default_end));

            match dashboard.analyze(&symbol, Some(range), &params).await? {
                Analysis::Report(report) => match format {
                    Format::Text => print!("{}", render_text(&report)),
                    Format::Json => println!("{}", render_json(&report)?),
                },
                Analysis::NoData { symbol } => {
                    println!("No data available for {symbol} in the selected range.");
                }
            }
        }
        Cmd::Interactive => {
            let stdin = std::io::stdin();
            dashboard
                .run_interactive(stdin.lock(), std::io::stdout())
                .await?;
        }
    }

    Ok(())
}

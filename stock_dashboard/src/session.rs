//! Line commands of the interactive session.

use chrono::NaiveDate;
use indicator_engine::params::clamp_threshold;

use crate::config::parse_window_list;

/// Shortcut symbols, selectable by their 1-based position.
pub const POPULAR_SYMBOLS: [(&str, &str); 6] = [
    ("AAPL", "Apple"),
    ("GOOGL", "Google"),
    ("MSFT", "Microsoft"),
    ("AMZN", "Amazon"),
    ("TSLA", "Tesla"),
    ("META", "Meta"),
];

pub const HELP: &str = "\
Commands:
  <SYMBOL>          analyze a ticker, e.g. AAPL or brk-b
  1-6               analyze a popular symbol
  threshold <N>     set the movement threshold in percent (5-40)
  ma <W,W,..>       set moving averages (from 20, 50, 100, 200); `ma none` clears
  range <FROM> <TO> analyze FROM (inclusive) to TO (exclusive), dates as YYYY-MM-DD
  range default     go back to the configured lookback ending today
  clear             clear the price cache
  help              show this text
  quit              leave";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Analyze(String),
    Threshold(f64),
    MovingAverages(Vec<usize>),
    /// `None` restores the configured lookback.
    Range(Option<(NaiveDate, NaiveDate)>),
    ClearCache,
    Help,
    Quit,
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((h, r)) => (h, r.trim()),
            None => (line, ""),
        };

        let cmd = match head.to_ascii_lowercase().as_str() {
            "" => Command::Empty,
            "q" | "quit" | "exit" => Command::Quit,
            "help" | "?" => Command::Help,
            "clear" => Command::ClearCache,
            "threshold" => {
                let t: f64 = rest
                    .trim_end_matches('%')
                    .parse()
                    .map_err(|_| format!("threshold expects a number, got {rest:?}"))?;
                Command::Threshold(clamp_threshold(t))
            }
            "ma" if rest.eq_ignore_ascii_case("none") => Command::MovingAverages(Vec::new()),
            "ma" => Command::MovingAverages(parse_window_list(rest)?),
            "range" if rest.eq_ignore_ascii_case("default") => Command::Range(None),
            "range" => Command::Range(Some(parse_range(rest)?)),
            _ if !rest.is_empty() => return Err(format!("unknown command {head:?}; try `help`")),
            _ => match popular_shortcut(head) {
                Some(symbol) => Command::Analyze(symbol.to_string()),
                None => Command::Analyze(head.to_string()),
            },
        };
        Ok(cmd)
    }
}

fn parse_range(rest: &str) -> Result<(NaiveDate, NaiveDate), String> {
    let mut parts = rest.split_whitespace();
    let (Some(from), Some(to), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err("usage: range <FROM> <TO> or range default".to_string());
    };
    let date = |s: &str| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| format!("expected a YYYY-MM-DD date, got {s:?}"))
    };
    let (start, end) = (date(from)?, date(to)?);
    if start > end {
        return Err(format!("range start {start} is after its end {end}"));
    }
    Ok((start, end))
}

/// Maps `"1"`..`"6"` to the popular symbol at that position.
pub fn popular_shortcut(input: &str) -> Option<&'static str> {
    let idx: usize = input.parse().ok()?;
    POPULAR_SYMBOLS
        .get(idx.checked_sub(1)?)
        .map(|(symbol, _)| *symbol)
}

pub fn popular_menu() -> String {
    POPULAR_SYMBOLS
        .iter()
        .enumerate()
        .map(|(i, (symbol, name))| format!("[{}] {symbol} ({name})", i + 1))
        .collect::<Vec<_>>()
        .join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_and_shortcuts() {
        assert_eq!(Command::parse(" msft ").unwrap(), Command::Analyze("msft".into()));
        assert_eq!(Command::parse("1").unwrap(), Command::Analyze("AAPL".into()));
        assert_eq!(Command::parse("6").unwrap(), Command::Analyze("META".into()));
        // out of range numbers fall through to the symbol path and fail there
        assert_eq!(Command::parse("7").unwrap(), Command::Analyze("7".into()));
        assert_eq!(popular_shortcut("0"), None);
    }

    #[test]
    fn settings_commands() {
        assert_eq!(Command::parse("threshold 12").unwrap(), Command::Threshold(12.0));
        assert_eq!(Command::parse("threshold 80%").unwrap(), Command::Threshold(40.0));
        assert!(Command::parse("threshold lots").is_err());
        assert_eq!(
            Command::parse("MA 20, 200").unwrap(),
            Command::MovingAverages(vec![20, 200])
        );
        assert_eq!(Command::parse("ma none").unwrap(), Command::MovingAverages(vec![]));
    }

    #[test]
    fn range_commands() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        assert_eq!(
            Command::parse("range 2024-01-02 2024-06-30").unwrap(),
            Command::Range(Some((d(2024, 1, 2), d(2024, 6, 30))))
        );
        assert_eq!(Command::parse("RANGE Default").unwrap(), Command::Range(None));
        assert!(Command::parse("range 2024-06-30 2024-01-02").unwrap_err().contains("after its end"));
        assert!(Command::parse("range 2024-13-01 2024-12-31").unwrap_err().contains("YYYY-MM-DD"));
        assert!(Command::parse("range 2024-01-02").unwrap_err().starts_with("usage"));
        assert!(Command::parse("range").is_err());
    }

    #[test]
    fn control_commands() {
        assert_eq!(Command::parse("").unwrap(), Command::Empty);
        assert_eq!(Command::parse("Clear").unwrap(), Command::ClearCache);
        assert_eq!(Command::parse("exit").unwrap(), Command::Quit);
        assert!(Command::parse("buy now").is_err());
    }

    #[test]
    fn menu_lists_all_shortcuts() {
        let menu = popular_menu();
        assert!(menu.starts_with("[1] AAPL (Apple)"));
        assert!(menu.contains("[6] META (Meta)"));
    }
}

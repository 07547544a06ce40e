use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use spendmap_core::Interval;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod report;
mod sources;

/// Categorise a bank ledger export and summarise inflows per category.
#[derive(Debug, Parser)]
#[command(name = "spendmap", version)]
struct Args {
    /// Rules and category palette (JSON, or TOML with a `.toml` extension)
    #[arg(long, default_value = "data/config.json")]
    config: PathBuf,
    /// Category → regex pattern table (JSON)
    #[arg(long, default_value = "data/patterns.json")]
    patterns: PathBuf,
    /// Semicolon-separated ledger export
    #[arg(long, default_value = "data/ledger.csv")]
    ledger: PathBuf,
    /// First day of the window (inclusive)
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,
    /// End of the window (exclusive)
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,
    /// Number of months up to and including today, used without --from/--to
    #[arg(long, default_value_t = 2, conflicts_with = "from")]
    months: u32,
}

impl Args {
    fn interval(&self, today: NaiveDate) -> Result<Interval> {
        let interval = match (self.from, self.to) {
            (Some(from), Some(to)) => Interval::new(from, to)?,
            _ => {
                let end = today.succ_opt().context("Today is the last representable date")?;
                Interval::months_before(end, self.months)?
            }
        };
        Ok(interval)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let interval = args.interval(Local::now().date_naive())?;
    tracing::info!("Summarising {interval}");

    let sources = sources::read_sources(&args.config, &args.patterns, &args.ledger).await?;
    let report = report::build(&sources, interval)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn explicit_window() {
        let args =
            Args::try_parse_from(["spendmap", "--from", "2024-03-01", "--to", "2024-04-01"]).unwrap();
        let interval = args.interval(date(2030, 1, 1)).unwrap();
        assert_eq!(interval, Interval::month(2024, 3).unwrap());
    }

    #[test]
    fn default_window_is_two_months_including_today() {
        let args = Args::try_parse_from(["spendmap"]).unwrap();
        let interval = args.interval(date(2024, 4, 15)).unwrap();
        assert_eq!(interval.start(), date(2024, 2, 16));
        assert_eq!(interval.end(), date(2024, 4, 16));
        assert!(interval.contains(date(2024, 4, 15)));
    }

    #[test]
    fn months_window() {
        let args = Args::try_parse_from(["spendmap", "--months", "12"]).unwrap();
        let interval = args.interval(date(2024, 12, 31)).unwrap();
        assert_eq!(interval, Interval::year(2024).unwrap());
    }

    #[test]
    fn from_requires_to() {
        assert!(Args::try_parse_from(["spendmap", "--from", "2024-03-01"]).is_err());
    }

    #[test]
    fn reversed_window_is_rejected() {
        let args =
            Args::try_parse_from(["spendmap", "--from", "2024-04-01", "--to", "2024-03-01"]).unwrap();
        assert!(args.interval(date(2024, 1, 1)).is_err());
    }

    #[test]
    fn default_paths() {
        let args = Args::try_parse_from(["spendmap"]).unwrap();
        assert_eq!(args.ledger, PathBuf::from("data/ledger.csv"));
    }
}

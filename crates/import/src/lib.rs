pub mod config;
pub mod ledger;
pub mod rules;

use spendmap_core::{
    aggregate, inflows, Breakdown, Categorisation, Category, ClassifiedRecord, Interval,
};
use thiserror::Error;

pub use config::{Config, ConfigDocument, ConfigError, Operator, PatternTable};
pub use ledger::{load_ledger, read_ledger, Ledger, LedgerError, LineError, RejectedLine};
pub use rules::{Classification, Condition, Rule, RuleSet};

#[derive(Error, Debug)]
pub enum ImportError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Classified inflows of one ledger, plus the lines that could not be read.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub records: Vec<ClassifiedRecord>,
    pub rejected: Vec<RejectedLine>,
}

impl Analysis {
    pub fn summarize(&self, interval: Interval) -> Categorisation {
        aggregate(&self.records, interval)
    }
}

/// Loads the ledger, keeps inflows and classifies them with `config`'s rules.
pub fn analyze(config: &Config, ledger_text: &str) -> Result<Analysis, LedgerError> {
    let ledger = load_ledger(ledger_text)?;
    let records = config.rules.categorise_all(inflows(ledger.records));
    Ok(Analysis {
        records,
        rejected: ledger.rejected,
    })
}

/// Runs the whole engine on the three raw documents.
pub fn analyze_sources(
    config_json: &str,
    patterns_json: &str,
    ledger_text: &str,
) -> Result<(Config, Analysis), ImportError> {
    let config = Config::from_json(config_json, patterns_json)?;
    let analysis = analyze(&config, ledger_text)?;
    Ok((config, analysis))
}

/// Joins statistics with the configured categories, warning about every
/// category that has no configuration entry.
pub fn breakdown(stats: &Categorisation, categories: &[Category]) -> Breakdown {
    let breakdown = Breakdown::build(stats, categories);
    for name in &breakdown.unconfigured {
        tracing::warn!("Category '{name}' has no configured entry; left out of the breakdown");
    }
    breakdown
}

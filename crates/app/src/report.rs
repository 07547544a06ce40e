use anyhow::Result;
use serde::Serialize;
use spendmap_core::{Breakdown, Categorisation, Interval};
use spendmap_import::{analyze, breakdown, Config, ConfigDocument, PatternTable, RejectedLine};

use crate::sources::{ConfigFormat, Sources};

#[derive(Debug, Serialize)]
pub struct Report {
    pub interval: Interval,
    pub categorisation: Categorisation,
    pub breakdown: Breakdown,
    pub rejected: Vec<RejectedLine>,
}

pub fn build(sources: &Sources, interval: Interval) -> Result<Report> {
    let document = match sources.config_format {
        ConfigFormat::Json => ConfigDocument::from_json(&sources.config)?,
        ConfigFormat::Toml => ConfigDocument::from_toml(&sources.config)?,
    };
    let patterns = PatternTable::from_json(&sources.patterns)?;
    let config = Config::new(document, &patterns)?;

    let analysis = analyze(&config, &sources.ledger)?;
    tracing::info!(
        "Classified {} inflows with {} rules ({} ledger lines rejected)",
        analysis.records.len(),
        config.rules.len(),
        analysis.rejected.len()
    );

    let categorisation = analysis.summarize(interval);
    let breakdown = breakdown(&categorisation, &config.categories);

    Ok(Report {
        interval,
        categorisation,
        breakdown,
        rejected: analysis.rejected,
    })
}

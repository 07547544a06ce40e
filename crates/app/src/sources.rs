use anyhow::{Context, Result};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

/// The raw documents the engine runs on.
#[derive(Debug, Clone)]
pub struct Sources {
    pub config: String,
    pub config_format: ConfigFormat,
    pub patterns: String,
    pub ledger: String,
}

/// Reads the settings (config + pattern table) and the ledger concurrently.
pub async fn read_sources(config: &Path, patterns: &Path, ledger: &Path) -> Result<Sources> {
    let settings = async { tokio::try_join!(read(config), read(patterns)) };
    let ((config_text, patterns_text), ledger_text) = tokio::try_join!(settings, read(ledger))?;

    Ok(Sources {
        config: config_text,
        config_format: ConfigFormat::from_path(config),
        patterns: patterns_text,
        ledger: ledger_text,
    })
}

async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

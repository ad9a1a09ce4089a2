use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spendsheet_ingest::IngestSettings;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ingest: IngestSection,
    pub pipeline: PipelineSection,
    pub publish: PublishSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSection {
    /// Bank insurer payments below this are renters insurance.
    pub insurance_threshold: Decimal,
    pub brokerage_csv: Option<PathBuf>,
    pub card_csv: Option<PathBuf>,
    pub bank_csv: Option<PathBuf>,
}

impl Default for IngestSection {
    fn default() -> Self {
        Self {
            insurance_threshold: IngestSettings::default().insurance_threshold,
            brokerage_csv: None,
            card_csv: None,
            bank_csv: None,
        }
    }
}

impl IngestSection {
    pub fn settings(&self) -> IngestSettings {
        IngestSettings {
            insurance_threshold: self.insurance_threshold,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSection {
    /// Abort the run when any source fails.
    pub strict: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PublishTarget {
    #[default]
    Csv,
    Stdout,
    Sheets,
}

impl fmt::Display for PublishTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PublishTarget::Csv => "csv",
            PublishTarget::Stdout => "stdout",
            PublishTarget::Sheets => "sheets",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishSection {
    pub target: PublishTarget,
    pub out_dir: PathBuf,
    /// Google Sheets workbook id for target = "sheets".
    pub spreadsheet_id: String,
}

impl Default for PublishSection {
    fn default() -> Self {
        Self {
            target: PublishTarget::Csv,
            out_dir: PathBuf::from("./spendsheet-out"),
            spreadsheet_id: String::new(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    Ok(toml::from_str(s)?)
}

pub fn render_config(cfg: &Config) -> Result<String> {
    toml::to_string_pretty(cfg).context("serialize config")
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    fs::write(&p, render_config(cfg)?).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_file_is_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.ingest.insurance_threshold, dec!(25.00));
        assert_eq!(cfg.publish.target, PublishTarget::Csv);
        assert!(!cfg.pipeline.strict);
    }

    #[test]
    fn test_partial_sections() {
        let cfg = parse_config(
            r#"
[ingest]
insurance_threshold = "75.00"
bank_csv = "exports/bank.csv"

[publish]
target = "sheets"
spreadsheet_id = "abc123"
"#,
        )
        .unwrap();
        assert_eq!(cfg.ingest.settings().insurance_threshold, dec!(75.00));
        assert_eq!(cfg.ingest.bank_csv, Some(PathBuf::from("exports/bank.csv")));
        assert_eq!(cfg.ingest.card_csv, None);
        assert_eq!(cfg.publish.target, PublishTarget::Sheets);
        assert_eq!(cfg.publish.out_dir, PathBuf::from("./spendsheet-out"));
    }

    #[test]
    fn test_render_round_trips() {
        let mut cfg = Config::default();
        cfg.pipeline.strict = true;
        cfg.ingest.brokerage_csv = Some(PathBuf::from("b.csv"));
        let text = render_config(&cfg).unwrap();
        assert_eq!(parse_config(&text).unwrap(), cfg);
    }

    #[test]
    fn test_unknown_target_rejected() {
        assert!(parse_config("[publish]\ntarget = \"email\"\n").is_err());
        assert_eq!(PublishTarget::Stdout.to_string(), "stdout");
    }
}

// Dashboard settings, loaded from a JSON file or taken from the defaults below.
use crate::error::EngineError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct EngineSettings {
    pub source: SourceSettings,
    pub ledger: LedgerSettings,
    pub calendar: CalendarSettings,
}

/// Where sheet grids come from.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceSettings {
    /// One `<sheet>.csv` file per sheet inside `path`.
    CsvDirectory {
        path: PathBuf,
        #[serde(default = "default_delimiter")]
        delimiter: char,
    },
    /// CSV export of a Google spreadsheet shared by link.
    SheetsExport {
        spreadsheet_id: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

impl Default for SourceSettings {
    fn default() -> Self {
        SourceSettings::CsvDirectory {
            path: PathBuf::from("data"),
            delimiter: default_delimiter(),
        }
    }
}

fn default_delimiter() -> char {
    ','
}

fn default_timeout_secs() -> u64 {
    30
}

/// Row-per-transaction sheet.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LedgerSettings {
    pub sheet: String,
    pub amount_column: String,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        LedgerSettings {
            sheet: "CONTAS_A_PAGAR".to_string(),
            amount_column: "Valor".to_string(),
        }
    }
}

/// Sheet with one column per calendar month, plus the tags stamped on every entry.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CalendarSettings {
    pub sheet: String,
    pub anchor: String,
    pub header_scan_rows: usize,
    pub fallback_year: String,
    pub category: String,
    pub description: String,
    pub status: String,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        CalendarSettings {
            sheet: "VR".to_string(),
            anchor: "Janeiro".to_string(),
            header_scan_rows: 10,
            fallback_year: "2026".to_string(),
            category: "Refeição".to_string(),
            description: "Gasto VR".to_string(),
            status: "Pago".to_string(),
        }
    }
}

impl EngineSettings {
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            EngineError::ConfigError(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        let settings: EngineSettings = serde_json::from_str(&raw)?;
        settings.validate()?;
        tracing::info!(path = %path.display(), "Loaded dashboard settings");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.calendar.header_scan_rows == 0 {
            return Err(EngineError::ConfigError(
                "calendar.header_scan_rows must be greater than 0".to_string(),
            ));
        }
        if self.calendar.anchor.trim().is_empty() {
            return Err(EngineError::ConfigError("calendar.anchor must not be blank".to_string()));
        }
        match &self.source {
            SourceSettings::SheetsExport { spreadsheet_id, .. } if spreadsheet_id.trim().is_empty() => {
                Err(EngineError::ConfigError("source.spreadsheet_id must not be blank".to_string()))
            }
            SourceSettings::CsvDirectory { delimiter, .. } if !delimiter.is_ascii() => {
                Err(EngineError::ConfigError(format!(
                    "source.delimiter must be a single ASCII character, got '{}'",
                    delimiter
                )))
            }
            _ => Ok(()),
        }
    }
}

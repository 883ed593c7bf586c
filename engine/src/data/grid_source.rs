// Data-source collaborators: anything able to hand over a sheet as a grid of strings.
use crate::config::settings::SourceSettings;
use crate::error::EngineError;
use csv::ReaderBuilder;
use reqwest::blocking::Client;
use shared::models::RawGrid;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

const SHEETS_BASE_URL: &str = "https://docs.google.com/spreadsheets/d";

pub trait GridSource {
    fn name(&self) -> &str;
    /// All rows of `sheet`, as text. Fails with `SourceUnavailable` when the sheet
    /// cannot be read for any reason.
    fn fetch_grid(&self, sheet: &str) -> Result<RawGrid, EngineError>;
}

/// Builds the source described by the settings.
pub fn from_settings(settings: &SourceSettings) -> Result<Box<dyn GridSource>, EngineError> {
    match settings {
        SourceSettings::CsvDirectory { path, delimiter } => {
            if !delimiter.is_ascii() {
                return Err(EngineError::ConfigError(format!(
                    "Delimiter '{}' is not a single ASCII character",
                    delimiter
                )));
            }
            Ok(Box::new(CsvDirectorySource::new(path.clone(), *delimiter as u8)))
        }
        SourceSettings::SheetsExport { spreadsheet_id, timeout_secs } => Ok(Box::new(
            SheetsExportSource::new(spreadsheet_id.clone(), Duration::from_secs(*timeout_secs))?,
        )),
    }
}

/// Reads every record of a CSV stream without treating any row as a header.
/// Record lengths may differ.
pub fn read_grid<R: Read>(reader: R, delimiter: u8) -> Result<RawGrid, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut grid = Vec::new();
    for result in rdr.records() {
        let record = result?;
        grid.push(record.iter().map(str::to_string).collect());
    }
    Ok(grid)
}

/// Sheets exported as `<dir>/<sheet>.csv`.
pub struct CsvDirectorySource {
    dir: PathBuf,
    delimiter: u8,
}

impl CsvDirectorySource {
    pub fn new(dir: PathBuf, delimiter: u8) -> Self {
        CsvDirectorySource { dir, delimiter }
    }

    fn sheet_path(&self, sheet: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", sheet))
    }
}

impl GridSource for CsvDirectorySource {
    fn name(&self) -> &str {
        "csv_directory"
    }

    fn fetch_grid(&self, sheet: &str) -> Result<RawGrid, EngineError> {
        let path = self.sheet_path(sheet);
        let file = File::open(&path).map_err(|e| {
            EngineError::source_unavailable(sheet, format!("failed to open '{}': {}", path.display(), e))
        })?;
        let grid = read_grid(file, self.delimiter).map_err(|e| {
            EngineError::source_unavailable(sheet, format!("failed to read '{}': {}", path.display(), e))
        })?;
        tracing::debug!(sheet = %sheet, path = %path.display(), rows = grid.len(), "Read sheet from CSV file");
        Ok(grid)
    }
}

/// CSV export of a spreadsheet shared by link, fetched over HTTPS.
pub struct SheetsExportSource {
    spreadsheet_id: String,
    client: Client,
}

impl SheetsExportSource {
    pub fn new(spreadsheet_id: String, timeout: Duration) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::source_unavailable("*", format!("failed to build HTTP client: {}", e)))?;
        Ok(SheetsExportSource { spreadsheet_id, client })
    }

    pub fn export_url(&self) -> String {
        format!("{}/{}/gviz/tq", SHEETS_BASE_URL, self.spreadsheet_id)
    }
}

impl GridSource for SheetsExportSource {
    fn name(&self) -> &str {
        "sheets_export"
    }

    fn fetch_grid(&self, sheet: &str) -> Result<RawGrid, EngineError> {
        let url = self.export_url();
        tracing::debug!(sheet = %sheet, url = %url, "Downloading sheet export");
        let response = self
            .client
            .get(&url)
            .query(&[("tqx", "out:csv"), ("sheet", sheet)])
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| EngineError::source_unavailable(sheet, e))?;
        let body = response
            .bytes()
            .map_err(|e| EngineError::source_unavailable(sheet, e))?;
        read_grid(body.as_ref(), b',').map_err(|e| EngineError::source_unavailable(sheet, e))
    }
}

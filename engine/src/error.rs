use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The data source could not deliver the sheet (network, auth, missing sheet).
    #[error("Sheet '{sheet}' is unavailable: {reason}")]
    SourceUnavailable { sheet: String, reason: String },

    #[error("Sheet '{sheet}' has no rows")]
    EmptySheet { sheet: String },

    #[error("Header anchor '{anchor}' not found in the first {scanned_rows} rows")]
    MissingAnchor { anchor: String, scanned_rows: usize },

    /// A cell meant to hold money could not be parsed; it was counted as zero.
    #[error("Invalid amount '{raw}' in column '{column}' at row {row}")]
    InvalidAmount { row: usize, column: String, raw: String },

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },
}

impl EngineError {
    pub fn source_unavailable(sheet: &str, reason: impl std::fmt::Display) -> Self {
        EngineError::SourceUnavailable {
            sheet: sheet.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result of a step that always produces data, plus whatever went wrong on the way.
///
/// Recoverable problems (bad cells, missing anchors, unavailable sheets) end up in
/// `diagnostics` so the caller can show them while still rendering `data`.
#[derive(Debug)]
pub struct Loaded<T> {
    pub data: T,
    pub diagnostics: Vec<EngineError>,
}

impl<T> Loaded<T> {
    pub fn clean(data: T) -> Self {
        Loaded { data, diagnostics: Vec::new() }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Loaded<U> {
        Loaded {
            data: f(self.data),
            diagnostics: self.diagnostics,
        }
    }
}

impl<T: Default> Loaded<T> {
    /// Empty data carrying a single diagnostic.
    pub fn degraded(error: EngineError) -> Self {
        Loaded {
            data: T::default(),
            diagnostics: vec![error],
        }
    }
}

// Owns the data-source handle and applies the degrade policy: a section that cannot be
// loaded becomes an empty RecordSet plus diagnostics, never a hard failure.
use crate::config::settings::EngineSettings;
use crate::data::grid_source::{self, GridSource};
use crate::data::{load_calendar_spend, load_ledger};
use crate::error::{EngineError, Loaded};
use once_cell::unsync::OnceCell;
use shared::models::{RawGrid, RecordSet};

pub struct DashboardService {
    settings: EngineSettings,
    // Created on first fetch, then reused for the lifetime of the service.
    source: OnceCell<Box<dyn GridSource>>,
}

impl DashboardService {
    pub fn new(settings: EngineSettings) -> Self {
        DashboardService {
            settings,
            source: OnceCell::new(),
        }
    }

    /// Service backed by an already built source instead of the one named in the settings.
    pub fn with_source(settings: EngineSettings, source: Box<dyn GridSource>) -> Self {
        DashboardService {
            settings,
            source: OnceCell::with_value(source),
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    fn source(&self) -> Result<&dyn GridSource, EngineError> {
        self.source
            .get_or_try_init(|| {
                let source = grid_source::from_settings(&self.settings.source)?;
                tracing::info!(source = source.name(), "Initialized sheet source");
                Ok::<_, EngineError>(source)
            })
            .map(|source| &**source)
    }

    fn fetch(&self, sheet: &str) -> Result<RawGrid, EngineError> {
        let source = self
            .source()
            .map_err(|e| EngineError::source_unavailable(sheet, e))?;
        source.fetch_grid(sheet)
    }

    pub fn ledger(&self) -> Loaded<RecordSet> {
        let sheet = &self.settings.ledger.sheet;
        let loaded = match self.fetch(sheet) {
            Ok(grid) => load_ledger(&grid, &self.settings.ledger),
            Err(e) => Loaded::degraded(e),
        };
        report(sheet, &loaded);
        loaded
    }

    pub fn calendar_spend(&self) -> Loaded<RecordSet> {
        let sheet = &self.settings.calendar.sheet;
        let loaded = match self.fetch(sheet) {
            Ok(grid) => load_calendar_spend(&grid, &self.settings.calendar),
            Err(e) => Loaded::degraded(e),
        };
        report(sheet, &loaded);
        loaded
    }
}

fn report(sheet: &str, loaded: &Loaded<RecordSet>) {
    for diagnostic in &loaded.diagnostics {
        match diagnostic {
            // Already logged per cell where they were found.
            EngineError::InvalidAmount { .. } => {}
            other => tracing::error!(sheet = %sheet, error = %other, "Section degraded"),
        }
    }
}

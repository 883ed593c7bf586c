// Normalization pipeline: raw sheet grids in, RecordSets out.
pub mod grid_source;
pub mod matrix_reshaper;
pub mod tabular_loader;
pub mod value_parser;

use crate::config::settings::{CalendarSettings, LedgerSettings};
use crate::error::Loaded;
use matrix_reshaper::MatrixReshaper;
use shared::models::{RawGrid, RecordSet};
use tabular_loader::TabularLoader;

/// Ledger sheet -> RecordSet. Never fails: an empty sheet yields an empty set plus a diagnostic.
pub fn load_ledger(grid: &RawGrid, settings: &LedgerSettings) -> Loaded<RecordSet> {
    match TabularLoader::new(&settings.sheet, &settings.amount_column).load(grid) {
        Ok(loaded) => loaded,
        Err(e) => Loaded::degraded(e),
    }
}

/// Calendar matrix sheet -> long RecordSet with the `Mês`/`Ano`/`Valor`/`Categoria`/
/// `Descrição`/`Status` columns.
pub fn load_calendar_spend(grid: &RawGrid, settings: &CalendarSettings) -> Loaded<RecordSet> {
    MatrixReshaper::new(settings)
        .reshape(grid)
        .map(|entries| RecordSet::from_month_records(&entries))
}

// Turns a hand-maintained, row-per-transaction sheet into a RecordSet.
use crate::data::value_parser::{self, ParsedAmount};
use crate::error::{EngineError, Loaded};
use shared::models::{cell, CellValue, Header, HeaderColumn, RawGrid, Record, RecordSet};

pub struct TabularLoader<'a> {
    sheet: &'a str,
    amount_column: &'a str,
}

impl<'a> TabularLoader<'a> {
    /// `sheet` only names the grid in diagnostics.
    pub fn new(sheet: &'a str, amount_column: &'a str) -> Self {
        TabularLoader { sheet, amount_column }
    }

    /// Row 0 is the header. Columns with a blank label are dropped, every later row is
    /// projected onto the surviving columns, and if the amount column survives it is
    /// parsed and records without a strictly positive amount are removed.
    pub fn load(&self, grid: &RawGrid) -> Result<Loaded<RecordSet>, EngineError> {
        let header_row = grid.first().ok_or_else(|| EngineError::EmptySheet {
            sheet: self.sheet.to_string(),
        })?;
        let header = surviving_header(header_row);
        tracing::debug!(
            sheet = %self.sheet,
            columns = header.len(),
            dropped = header_row.len() - header.len(),
            "Validated sheet header"
        );

        let mut records: Vec<Record> = grid[1..]
            .iter()
            .map(|row| project_row(&header, row))
            .collect();

        let mut diagnostics = Vec::new();
        if let Some(position) = header.position(self.amount_column) {
            let before = records.len();
            records = self.normalize_amounts(records, position, &mut diagnostics);
            tracing::debug!(
                sheet = %self.sheet,
                kept = records.len(),
                dropped = before - records.len(),
                "Normalized amount column"
            );
        }

        tracing::info!(sheet = %self.sheet, rows = records.len(), "Loaded ledger sheet");
        Ok(Loaded {
            data: RecordSet::new(header, records),
            diagnostics,
        })
    }

    fn normalize_amounts(
        &self,
        records: Vec<Record>,
        position: usize,
        diagnostics: &mut Vec<EngineError>,
    ) -> Vec<Record> {
        records
            .into_iter()
            .enumerate()
            .filter_map(|(idx, mut record)| {
                let raw = record.get(position).and_then(CellValue::as_text).unwrap_or("");
                let parsed = value_parser::parse(raw);
                if let ParsedAmount::Invalid { raw } = &parsed {
                    // idx + 2: one-based sheet row, counting the header
                    tracing::warn!(sheet = %self.sheet, row = idx + 2, raw = %raw, "Unparseable amount counted as zero");
                    diagnostics.push(EngineError::InvalidAmount {
                        row: idx + 2,
                        column: self.amount_column.to_string(),
                        raw: raw.clone(),
                    });
                }
                let amount = parsed.amount();
                if amount > 0.0 {
                    record.set(position, CellValue::Amount(amount));
                    Some(record)
                } else {
                    None
                }
            })
            .collect()
    }
}

/// Keeps the columns whose trimmed label is non-empty, remembering where each came from.
pub fn surviving_header(header_row: &[String]) -> Header {
    let columns = header_row
        .iter()
        .enumerate()
        .filter(|(_, label)| !label.trim().is_empty())
        .map(|(source_index, label)| HeaderColumn {
            source_index,
            label: label.clone(),
        })
        .collect();
    Header::new(columns)
}

/// Short rows read their missing cells as empty text; extra cells are ignored.
fn project_row(header: &Header, row: &[String]) -> Record {
    let cells = header
        .columns()
        .iter()
        .map(|column| CellValue::from(cell(row, column.source_index)))
        .collect();
    Record::new(cells)
}

// Unpivots the calendar matrix sheet (line items x months) into one MonthRecord per
// populated cell.
use crate::config::settings::CalendarSettings;
use crate::data::value_parser::{self, ParsedAmount};
use crate::error::{EngineError, Loaded};
use chrono::Month;
use once_cell::sync::Lazy;
use regex::Regex;
use shared::models::{cell, month_from_pt_name, pt_month_name, MonthRecord, RawGrid};

// Only 2020-2029 are recognised; anything else falls back to the configured year.
static YEAR_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"202\d").expect("static regex"));

pub struct MatrixReshaper<'a> {
    settings: &'a CalendarSettings,
}

impl<'a> MatrixReshaper<'a> {
    pub fn new(settings: &'a CalendarSettings) -> Self {
        MatrixReshaper { settings }
    }

    pub fn reshape(&self, grid: &RawGrid) -> Loaded<Vec<MonthRecord>> {
        if grid.is_empty() {
            return Loaded::degraded(EngineError::EmptySheet {
                sheet: self.settings.sheet.clone(),
            });
        }

        let year = detect_year(grid, &self.settings.fallback_year);
        let Some(header_index) =
            locate_header_row(grid, &self.settings.anchor, self.settings.header_scan_rows)
        else {
            tracing::error!(
                sheet = %self.settings.sheet,
                anchor = %self.settings.anchor,
                "Month header row not found"
            );
            return Loaded::degraded(EngineError::MissingAnchor {
                anchor: self.settings.anchor.clone(),
                scanned_rows: self.settings.header_scan_rows.min(grid.len()),
            });
        };
        let month_columns = map_month_columns(&grid[header_index]);
        tracing::debug!(
            sheet = %self.settings.sheet,
            header_row = header_index,
            months = month_columns.len(),
            year = %year,
            "Located month header"
        );

        let mut records = Vec::new();
        let mut diagnostics = Vec::new();
        for (offset, row) in grid[header_index + 1..].iter().enumerate() {
            if is_total_row(row) {
                continue;
            }
            let sheet_row = header_index + offset + 2;
            for &(month, col_idx) in &month_columns {
                if col_idx >= row.len() {
                    continue;
                }
                let parsed = value_parser::parse(row[col_idx].as_str());
                if let ParsedAmount::Invalid { raw } = &parsed {
                    tracing::warn!(
                        sheet = %self.settings.sheet,
                        row = sheet_row,
                        month = pt_month_name(month),
                        raw = %raw,
                        "Unparseable amount skipped"
                    );
                    diagnostics.push(EngineError::InvalidAmount {
                        row: sheet_row,
                        column: pt_month_name(month).to_string(),
                        raw: raw.clone(),
                    });
                }
                let amount = parsed.amount();
                if amount > 0.0 {
                    records.push(self.month_record(month, &year, amount));
                }
            }
        }

        tracing::info!(sheet = %self.settings.sheet, entries = records.len(), "Reshaped calendar sheet");
        Loaded { data: records, diagnostics }
    }

    fn month_record(&self, month: Month, year: &str, amount: f64) -> MonthRecord {
        MonthRecord {
            month,
            year: year.to_string(),
            amount,
            category: self.settings.category.clone(),
            description: self.settings.description.clone(),
            status: self.settings.status.clone(),
        }
    }
}

/// First "202X" in the title row, or `fallback`. A heuristic: the year may live elsewhere.
pub fn detect_year(grid: &RawGrid, fallback: &str) -> String {
    let title = grid.first().map(|row| row.join(" ")).unwrap_or_default();
    YEAR_PATTERN
        .find(&title)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| fallback.to_string())
}

/// Index of the first row among the first `window` rows holding `anchor` as a whole
/// (trimmed) cell.
pub fn locate_header_row(grid: &RawGrid, anchor: &str, window: usize) -> Option<usize> {
    grid.iter()
        .take(window)
        .position(|row| row.iter().any(|c| c.trim() == anchor))
}

/// Month name -> column position for every month label present in `header_row`,
/// ordered by first appearance. A repeated month points at its last column.
pub fn map_month_columns(header_row: &[String]) -> Vec<(Month, usize)> {
    let mut mapping: Vec<(Month, usize)> = Vec::new();
    for (idx, label) in header_row.iter().enumerate() {
        if let Some(month) = month_from_pt_name(label.trim()) {
            if let Some(slot) = mapping.iter_mut().find(|(m, _)| *m == month) {
                slot.1 = idx;
            } else {
                mapping.push((month, idx));
            }
        }
    }
    mapping
}

fn is_total_row(row: &[String]) -> bool {
    cell(row, 0).to_lowercase().contains("total")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> RawGrid {
        rows.iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn report_grid() -> RawGrid {
        grid(&[
            &["Relatório 2024", "", ""],
            &["", "", ""],
            &["Item", "Janeiro", "Fevereiro"],
            &["Mercado", "50,00", "0"],
        ])
    }

    #[test]
    fn test_reshape_emits_only_positive_cells() {
        let settings = CalendarSettings::default();
        let loaded = MatrixReshaper::new(&settings).reshape(&report_grid());
        assert!(loaded.diagnostics.is_empty());
        assert_eq!(
            loaded.data,
            vec![MonthRecord {
                month: Month::January,
                year: "2024".to_string(),
                amount: 50.0,
                category: "Refeição".to_string(),
                description: "Gasto VR".to_string(),
                status: "Pago".to_string(),
            }]
        );
    }

    #[test]
    fn test_reshape_is_idempotent() {
        let settings = CalendarSettings::default();
        let reshaper = MatrixReshaper::new(&settings);
        let data = report_grid();
        assert_eq!(reshaper.reshape(&data).data, reshaper.reshape(&data).data);
    }

    #[test]
    fn test_missing_anchor_is_reported() {
        let settings = CalendarSettings::default();
        let data = grid(&[&["Item", "Jan", "Fev"], &["Mercado", "10,00", "20,00"]]);
        let loaded = MatrixReshaper::new(&settings).reshape(&data);
        assert!(loaded.data.is_empty());
        assert!(matches!(
            loaded.diagnostics.as_slice(),
            [EngineError::MissingAnchor { anchor, scanned_rows: 2 }] if anchor == "Janeiro"
        ));
    }

    #[test]
    fn test_anchor_outside_scan_window_is_missing() {
        let settings = CalendarSettings::default();
        let mut data: RawGrid = (0..10).map(|_| vec![String::new()]).collect();
        data.push(vec!["Item".to_string(), "Janeiro".to_string()]);
        data.push(vec!["Mercado".to_string(), "10,00".to_string()]);
        let loaded = MatrixReshaper::new(&settings).reshape(&data);
        assert!(loaded.data.is_empty());
        assert!(matches!(loaded.diagnostics.as_slice(), [EngineError::MissingAnchor { scanned_rows: 10, .. }]));
    }

    #[test]
    fn test_empty_grid_is_reported() {
        let settings = CalendarSettings::default();
        let loaded = MatrixReshaper::new(&settings).reshape(&RawGrid::new());
        assert!(loaded.data.is_empty());
        assert!(matches!(loaded.diagnostics.as_slice(), [EngineError::EmptySheet { .. }]));
    }

    #[test]
    fn test_total_rows_are_skipped() {
        let settings = CalendarSettings::default();
        let data = grid(&[
            &["VR"],
            &["Item", "Janeiro", "Fevereiro"],
            &["Almoço", "32,00", "28,50"],
            &["TOTAL", "32,00", "28,50"],
            &["Totais", "32,00", "28,50"],
            &["Subtotal mês", "1,00", "1,00"],
        ]);
        let records = MatrixReshaper::new(&settings).reshape(&data).data;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].month, Month::January);
        assert_eq!(records[1].month, Month::February);
        assert_eq!(records[1].amount, 28.5);
    }

    #[test]
    fn test_fallback_year_when_title_has_none() {
        let settings = CalendarSettings::default();
        let data = grid(&[&["Item", "Janeiro"], &["Almoço", "10,00"]]);
        let records = MatrixReshaper::new(&settings).reshape(&data).data;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].year, "2026");
    }

    #[test]
    fn test_detect_year_limits() {
        assert_eq!(detect_year(&grid(&[&["Gastos", "VR 2029"]]), "2026"), "2029");
        assert_eq!(detect_year(&grid(&[&["Gastos 2031"]]), "2026"), "2026");
        assert_eq!(detect_year(&RawGrid::new(), "2026"), "2026");
    }

    #[test]
    fn test_header_row_found_with_padding() {
        let data = grid(&[&["Título"], &["", "  Janeiro  ", "Março"]]);
        assert_eq!(locate_header_row(&data, "Janeiro", 10), Some(1));
        assert_eq!(locate_header_row(&data, "Janeiro", 1), None);
    }

    #[test]
    fn test_map_month_columns_partial_year() {
        let row: Vec<String> = ["Item", "Janeiro", "", "Março", "Total", "Março"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(map_month_columns(&row), vec![(Month::January, 1), (Month::March, 5)]);
    }

    #[test]
    fn test_repeated_month_reads_last_column() {
        let settings = CalendarSettings::default();
        let data = grid(&[
            &["Item", "Janeiro", "Fevereiro", "Janeiro"],
            &["Almoço", "10,00", "5,00", "99,00"],
        ]);
        let records = MatrixReshaper::new(&settings).reshape(&data).data;
        let summary: Vec<(Month, f64)> = records.iter().map(|r| (r.month, r.amount)).collect();
        assert_eq!(summary, vec![(Month::January, 99.0), (Month::February, 5.0)]);
    }

    #[test]
    fn test_short_rows_and_ragged_cells() {
        let settings = CalendarSettings::default();
        let data = grid(&[
            &["2025"],
            &["Item", "Janeiro", "Fevereiro", "Março"],
            &["Almoço", "15,00"],
            &[],
            &["Jantar", "", "", "R$ 40,00"],
        ]);
        let records = MatrixReshaper::new(&settings).reshape(&data).data;
        let summary: Vec<(Month, f64)> = records.iter().map(|r| (r.month, r.amount)).collect();
        assert_eq!(summary, vec![(Month::January, 15.0), (Month::March, 40.0)]);
        assert!(records.iter().all(|r| r.year == "2025"));
    }

    #[test]
    fn test_invalid_cells_are_reported() {
        let settings = CalendarSettings::default();
        let data = grid(&[&["Item", "Janeiro"], &["Almoço", "x"], &["Jantar", "20,00"]]);
        let loaded = MatrixReshaper::new(&settings).reshape(&data);
        assert_eq!(loaded.data.len(), 1);
        assert!(matches!(
            loaded.diagnostics.as_slice(),
            [EngineError::InvalidAmount { row: 2, column, .. }] if column == "Janeiro"
        ));
    }
}

// Plain-text rendering of the two dashboard sections.
use super::summary::{CalendarSummary, LedgerSummary};
use shared::models::{columns, CellValue, RecordSet};
use shared::utils::format_brl;
use std::io::{self, Write};

const LEDGER_COLUMNS: [&str; 5] = [
    columns::DATE,
    columns::DESCRIPTION,
    columns::CATEGORY,
    columns::AMOUNT,
    columns::STATUS,
];
const CALENDAR_COLUMNS: [&str; 3] = [columns::MONTH, columns::AMOUNT, columns::CATEGORY];

fn display(value: &CellValue) -> String {
    match value {
        CellValue::Amount(amount) => format_brl(*amount),
        CellValue::Text(text) => text.clone(),
    }
}

/// Writes the records of `set` restricted to `wanted` columns that exist, pipe separated.
fn write_table<W: Write>(out: &mut W, set: &RecordSet, wanted: &[&str]) -> io::Result<()> {
    let visible: Vec<&str> = wanted.iter().copied().filter(|c| set.has_column(c)).collect();
    if visible.is_empty() {
        return Ok(());
    }
    writeln!(out, "  {}", visible.join(" | "))?;
    for record in set.records() {
        let cells: Vec<String> = visible
            .iter()
            .map(|c| set.value(record, c).map(display).unwrap_or_default())
            .collect();
        writeln!(out, "  {}", cells.join(" | "))?;
    }
    Ok(())
}

pub fn render_ledger<W: Write>(
    out: &mut W,
    period: &RecordSet,
    amount_column: &str,
    month: &str,
    year: &str,
) -> io::Result<()> {
    writeln!(out, "== Contas Bancárias: {}/{} ==", month, year)?;
    if period.is_empty() {
        writeln!(out, "Sem dados para este período.")?;
        return Ok(());
    }
    let summary = LedgerSummary::from_records(period, amount_column);
    writeln!(out, "Total Gasto: {}", format_brl(summary.total))?;
    writeln!(out, "Pago: {}", format_brl(summary.paid))?;
    writeln!(out, "Pendente: {}", format_brl(summary.pending))?;
    if !summary.by_category.is_empty() {
        writeln!(out, "Por categoria:")?;
        for group in &summary.by_category {
            writeln!(out, "  {}: {}", group.label, format_brl(group.amount))?;
        }
    }
    if !summary.by_status.is_empty() {
        writeln!(out, "Por status:")?;
        for group in &summary.by_status {
            writeln!(out, "  {}: {}", group.label, format_brl(group.amount))?;
        }
    }
    writeln!(out, "Lançamentos:")?;
    write_table(out, period, &LEDGER_COLUMNS)
}

/// `loaded` tells a sheet that could not be read apart from a month without spend.
pub fn render_calendar<W: Write>(
    out: &mut W,
    period: &RecordSet,
    loaded: bool,
    month: &str,
    year: &str,
) -> io::Result<()> {
    writeln!(out, "== Gastos VR: {}/{} ==", month, year)?;
    if !loaded {
        writeln!(out, "Não foi possível carregar a tabela VR ou ela está vazia.")?;
        return Ok(());
    }
    if period.is_empty() {
        writeln!(out, "Sem gastos lançados no VR em {}.", month)?;
        return Ok(());
    }
    let summary = CalendarSummary::from_records(period);
    writeln!(out, "Total Gasto: {}", format_brl(summary.total))?;
    writeln!(out, "Qtd. Refeições: {}", summary.purchases)?;
    writeln!(out, "Ticket Médio: {}", format_brl(summary.average_ticket))?;
    writeln!(out, "Extrato:")?;
    write_table(out, period, &CALENDAR_COLUMNS)
}

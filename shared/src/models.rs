use chrono::Month;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

/// A sheet exactly as the data source hands it over: rows of text cells.
/// Rows may be ragged, so index through [`cell`] instead of `row[i]`.
pub type RawGrid = Vec<Vec<String>>;

/// Reads column `index` of a row, treating cells past the end as empty text.
pub fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

/// Stable column labels the presentation layer filters and aggregates on.
pub mod columns {
    pub const MONTH: &str = "Mês";
    pub const YEAR: &str = "Ano";
    pub const AMOUNT: &str = "Valor";
    pub const CATEGORY: &str = "Categoria";
    pub const DESCRIPTION: &str = "Descrição";
    pub const STATUS: &str = "Status";
    pub const DATE: &str = "Data";
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Amount(f64),
    Text(String),
}

impl CellValue {
    pub fn as_amount(&self) -> Option<f64> {
        match self {
            CellValue::Amount(value) => Some(*value),
            CellValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(text) => Some(text),
            CellValue::Amount(_) => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Amount(value) => write!(f, "{}", value),
            CellValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for CellValue {
    fn from(text: &str) -> Self {
        CellValue::Text(text.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderColumn {
    /// Position of the column in the source grid, before blank columns were removed.
    pub source_index: usize,
    pub label: String,
}

/// The columns that survived header validation, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Header {
    columns: Vec<HeaderColumn>,
}

impl Header {
    pub fn new(columns: Vec<HeaderColumn>) -> Self {
        Header { columns }
    }

    /// Header for a table built in memory, where every label is its own source column.
    pub fn from_labels(labels: &[&str]) -> Self {
        let columns = labels
            .iter()
            .enumerate()
            .map(|(source_index, label)| HeaderColumn {
                source_index,
                label: label.to_string(),
            })
            .collect();
        Header { columns }
    }

    pub fn columns(&self) -> &[HeaderColumn] {
        &self.columns
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.label.as_str())
    }

    /// Position of the first column carrying `label`.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.label == label)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// One data row, holding one value per header column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    cells: Vec<CellValue>,
}

impl Record {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Record { cells }
    }

    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    pub fn get(&self, position: usize) -> Option<&CellValue> {
        self.cells.get(position)
    }

    pub fn set(&mut self, position: usize, value: CellValue) {
        if let Some(slot) = self.cells.get_mut(position) {
            *slot = value;
        }
    }
}

/// Normalized table handed to filtering, aggregation and presentation.
///
/// Serializes as an array of objects keyed by header label, keeping header order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    header: Header,
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new(header: Header, records: Vec<Record>) -> Self {
        RecordSet { header, records }
    }

    pub fn empty() -> Self {
        RecordSet::default()
    }

    /// Long-format table for reshaped calendar entries, using the stable column labels.
    pub fn from_month_records(entries: &[MonthRecord]) -> Self {
        let header = Header::from_labels(&[
            columns::MONTH,
            columns::YEAR,
            columns::AMOUNT,
            columns::CATEGORY,
            columns::DESCRIPTION,
            columns::STATUS,
        ]);
        let records = entries
            .iter()
            .map(|entry| {
                Record::new(vec![
                    CellValue::from(pt_month_name(entry.month)),
                    CellValue::Text(entry.year.clone()),
                    CellValue::Amount(entry.amount),
                    CellValue::Text(entry.category.clone()),
                    CellValue::Text(entry.description.clone()),
                    CellValue::Text(entry.status.clone()),
                ])
            })
            .collect();
        RecordSet { header, records }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, label: &str) -> bool {
        self.header.position(label).is_some()
    }

    /// Value of `label` in `record`, if the column exists.
    pub fn value<'a>(&self, record: &'a Record, label: &str) -> Option<&'a CellValue> {
        self.header.position(label).and_then(|pos| record.get(pos))
    }

    /// Keeps only the records matching `predicate`, preserving order.
    pub fn filtered<F>(&self, mut predicate: F) -> RecordSet
    where
        F: FnMut(&Record) -> bool,
    {
        RecordSet {
            header: self.header.clone(),
            records: self.records.iter().filter(|r| predicate(*r)).cloned().collect(),
        }
    }
}

struct RowView<'a> {
    header: &'a Header,
    record: &'a Record,
}

impl Serialize for RowView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.header.len()))?;
        for (column, value) in self.header.columns().iter().zip(self.record.cells()) {
            map.serialize_entry(&column.label, value)?;
        }
        map.end()
    }
}

impl Serialize for RecordSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.records.len()))?;
        for record in &self.records {
            seq.serialize_element(&RowView { header: &self.header, record })?;
        }
        seq.end()
    }
}

/// One populated cell of the calendar matrix sheet, unpivoted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthRecord {
    #[serde(rename = "Mês", serialize_with = "serialize_pt_month")]
    pub month: Month,
    #[serde(rename = "Ano")]
    pub year: String,
    #[serde(rename = "Valor")]
    pub amount: f64,
    #[serde(rename = "Categoria")]
    pub category: String,
    #[serde(rename = "Descrição")]
    pub description: String,
    #[serde(rename = "Status")]
    pub status: String,
}

fn serialize_pt_month<S: Serializer>(month: &Month, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(pt_month_name(*month))
}

/// Calendar months as they are written in the sheets, January first.
pub const PT_MONTHS: [(Month, &str); 12] = [
    (Month::January, "Janeiro"),
    (Month::February, "Fevereiro"),
    (Month::March, "Março"),
    (Month::April, "Abril"),
    (Month::May, "Maio"),
    (Month::June, "Junho"),
    (Month::July, "Julho"),
    (Month::August, "Agosto"),
    (Month::September, "Setembro"),
    (Month::October, "Outubro"),
    (Month::November, "Novembro"),
    (Month::December, "Dezembro"),
];

pub fn pt_month_name(month: Month) -> &'static str {
    PT_MONTHS[month.number_from_month() as usize - 1].1
}

/// Exact match against the full Portuguese month name.
pub fn month_from_pt_name(name: &str) -> Option<Month> {
    PT_MONTHS
        .iter()
        .find(|(_, pt)| *pt == name)
        .map(|(month, _)| *month)
}

/// Sort key for month labels: full names or three-letter abbreviations
/// ("fev", "Set") map to 1..=12, anything else sorts last.
pub fn month_order(label: &str) -> u32 {
    let label = label.trim().to_lowercase();
    PT_MONTHS
        .iter()
        .find(|(_, pt)| {
            let pt = pt.to_lowercase();
            pt == label || (label.chars().count() == 3 && pt.chars().take(3).eq(label.chars()))
        })
        .map(|(month, _)| month.number_from_month())
        .unwrap_or(99)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> RecordSet {
        RecordSet::new(
            Header::new(vec![
                HeaderColumn { source_index: 0, label: "Descrição".to_string() },
                HeaderColumn { source_index: 2, label: "Valor".to_string() },
            ]),
            vec![
                Record::new(vec![CellValue::from("Luz"), CellValue::Amount(120.5)]),
                Record::new(vec![CellValue::from("Água"), CellValue::Amount(80.0)]),
            ],
        )
    }

    #[test]
    fn test_cell_tolerates_short_rows() {
        let row = vec!["a".to_string()];
        assert_eq!(cell(&row, 0), "a");
        assert_eq!(cell(&row, 5), "");
    }

    #[test]
    fn test_record_set_lookup_by_label() {
        let set = ledger();
        let first = &set.records()[0];
        assert_eq!(set.value(first, "Valor"), Some(&CellValue::Amount(120.5)));
        assert_eq!(set.value(first, "Status"), None);
        assert!(set.has_column("Descrição"));
    }

    #[test]
    fn test_record_set_serializes_rows_in_header_order() {
        let json = serde_json::to_string(&ledger()).unwrap();
        assert_eq!(
            json,
            r#"[{"Descrição":"Luz","Valor":120.5},{"Descrição":"Água","Valor":80.0}]"#
        );
    }

    #[test]
    fn test_filtered_keeps_header_and_order() {
        let set = ledger();
        let cheap = set.filtered(|r| r.get(1).and_then(CellValue::as_amount).unwrap_or(0.0) < 100.0);
        assert_eq!(cheap.len(), 1);
        assert_eq!(cheap.header(), set.header());
        assert_eq!(cheap.records()[0].get(0), Some(&CellValue::from("Água")));
    }

    #[test]
    fn test_from_month_records_uses_stable_columns() {
        let entry = MonthRecord {
            month: Month::March,
            year: "2024".to_string(),
            amount: 32.9,
            category: "Refeição".to_string(),
            description: "Gasto VR".to_string(),
            status: "Pago".to_string(),
        };
        let set = RecordSet::from_month_records(&[entry]);
        let labels: Vec<&str> = set.header().labels().collect();
        assert_eq!(labels, vec!["Mês", "Ano", "Valor", "Categoria", "Descrição", "Status"]);
        assert_eq!(set.value(&set.records()[0], columns::MONTH), Some(&CellValue::from("Março")));
    }

    #[test]
    fn test_month_record_serializes_portuguese_month() {
        let entry = MonthRecord {
            month: Month::January,
            year: "2024".to_string(),
            amount: 50.0,
            category: "Refeição".to_string(),
            description: "Gasto VR".to_string(),
            status: "Pago".to_string(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["Mês"], "Janeiro");
        assert_eq!(value["Valor"], 50.0);
    }

    #[test]
    fn test_month_names() {
        assert_eq!(pt_month_name(Month::December), "Dezembro");
        assert_eq!(month_from_pt_name("Março"), Some(Month::March));
        assert_eq!(month_from_pt_name("março"), None);
    }

    #[test]
    fn test_month_order_accepts_names_and_abbreviations() {
        assert_eq!(month_order("Janeiro"), 1);
        assert_eq!(month_order("fev"), 2);
        assert_eq!(month_order("Dez"), 12);
        assert_eq!(month_order("Total"), 99);
        assert_eq!(month_order("ma"), 99);
    }
}

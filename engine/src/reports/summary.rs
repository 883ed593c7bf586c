use serde::Serialize;
use shared::models::{columns, CellValue, Record, RecordSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    pub label: String,
    pub amount: f64,
}

/// Totals for the ledger view of one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerSummary {
    pub total: f64,
    pub paid: f64,
    pub pending: f64,
    pub by_category: Vec<Breakdown>,
    pub by_status: Vec<Breakdown>,
}

impl LedgerSummary {
    /// `Status` is matched case-insensitively against "pago" and "pendente";
    /// without a `Status` column both figures are zero.
    pub fn from_records(set: &RecordSet, amount_column: &str) -> Self {
        let amount = |r: &Record| set.value(r, amount_column).and_then(CellValue::as_amount).unwrap_or(0.0);
        let status = |r: &Record| set.value(r, columns::STATUS).map(|v| v.to_string().trim().to_lowercase());

        let mut summary = LedgerSummary {
            total: 0.0,
            paid: 0.0,
            pending: 0.0,
            by_category: group_by(set, columns::CATEGORY, amount),
            by_status: group_by(set, columns::STATUS, amount),
        };
        for record in set.records() {
            let value = amount(record);
            summary.total += value;
            match status(record).as_deref() {
                Some("pago") => summary.paid += value,
                Some("pendente") => summary.pending += value,
                _ => {}
            }
        }
        summary
    }
}

/// Sums `amount` per distinct value of `label`, in first-seen order.
fn group_by<F>(set: &RecordSet, label: &str, amount: F) -> Vec<Breakdown>
where
    F: Fn(&Record) -> f64,
{
    if !set.has_column(label) {
        return Vec::new();
    }
    let mut groups: Vec<Breakdown> = Vec::new();
    for record in set.records() {
        let key = set.value(record, label).map(|v| v.to_string()).unwrap_or_default();
        match groups.iter_mut().find(|g| g.label == key) {
            Some(group) => group.amount += amount(record),
            None => groups.push(Breakdown { label: key, amount: amount(record) }),
        }
    }
    groups
}

/// Meal-voucher spend for one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarSummary {
    pub total: f64,
    pub purchases: usize,
    pub average_ticket: f64,
}

impl CalendarSummary {
    pub fn from_records(set: &RecordSet) -> Self {
        let total: f64 = set
            .records()
            .iter()
            .filter_map(|r| set.value(r, columns::AMOUNT).and_then(CellValue::as_amount))
            .sum();
        let purchases = set.len();
        let average_ticket = if purchases > 0 { total / purchases as f64 } else { 0.0 };
        CalendarSummary { total, purchases, average_ticket }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Header;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    fn ledger() -> RecordSet {
        let rows = [
            ("Moradia", 1500.0, "Pago"),
            ("Contas", 120.5, "PENDENTE"),
            ("Moradia", 80.0, " pago "),
            ("Lazer", 50.0, "Agendado"),
        ];
        RecordSet::new(
            Header::from_labels(&["Categoria", "Valor", "Status"]),
            rows.iter()
                .map(|(category, amount, status)| {
                    Record::new(vec![
                        CellValue::from(*category),
                        CellValue::Amount(*amount),
                        CellValue::from(*status),
                    ])
                })
                .collect(),
        )
    }

    #[test]
    fn test_ledger_summary_totals() {
        let summary = LedgerSummary::from_records(&ledger(), "Valor");
        assert_close(summary.total, 1750.5);
        assert_close(summary.paid, 1580.0);
        assert_close(summary.pending, 120.5);
    }

    #[test]
    fn test_ledger_summary_breakdowns_first_seen_order() {
        let summary = LedgerSummary::from_records(&ledger(), "Valor");
        let categories: Vec<(&str, f64)> =
            summary.by_category.iter().map(|b| (b.label.as_str(), b.amount)).collect();
        assert_eq!(categories, vec![("Moradia", 1580.0), ("Contas", 120.5), ("Lazer", 50.0)]);
        assert_eq!(summary.by_status.len(), 4);
    }

    #[test]
    fn test_ledger_summary_without_status() {
        let set = RecordSet::new(
            Header::from_labels(&["Valor"]),
            vec![Record::new(vec![CellValue::Amount(10.0)])],
        );
        let summary = LedgerSummary::from_records(&set, "Valor");
        assert_close(summary.total, 10.0);
        assert_close(summary.paid, 0.0);
        assert_close(summary.pending, 0.0);
        assert!(summary.by_category.is_empty());
        assert!(summary.by_status.is_empty());
    }

    #[test]
    fn test_calendar_summary() {
        let set = RecordSet::new(
            Header::from_labels(&["Mês", "Valor"]),
            vec![
                Record::new(vec![CellValue::from("Janeiro"), CellValue::Amount(30.0)]),
                Record::new(vec![CellValue::from("Janeiro"), CellValue::Amount(45.0)]),
            ],
        );
        let summary = CalendarSummary::from_records(&set);
        assert_close(summary.total, 75.0);
        assert_eq!(summary.purchases, 2);
        assert_close(summary.average_ticket, 37.5);
    }

    #[test]
    fn test_calendar_summary_empty() {
        let summary = CalendarSummary::from_records(&RecordSet::empty());
        assert_eq!(summary, CalendarSummary { total: 0.0, purchases: 0, average_ticket: 0.0 });
    }
}

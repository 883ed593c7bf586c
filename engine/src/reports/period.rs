use shared::models::{columns, month_order, Record, RecordSet};

fn text(set: &RecordSet, record: &Record, label: &str) -> Option<String> {
    set.value(record, label).map(|v| v.to_string().trim().to_string())
}

/// Every distinct `Ano` across the sets, newest first.
pub fn available_years(sets: &[&RecordSet]) -> Vec<String> {
    let mut years: Vec<String> = sets
        .iter()
        .flat_map(|set| set.records().iter().filter_map(move |r| text(set, r, columns::YEAR)))
        .filter(|year| !year.is_empty())
        .collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

/// Distinct `Mês` labels recorded for `year`, in calendar order. Labels that are not
/// month names go last.
pub fn available_months(sets: &[&RecordSet], year: &str) -> Vec<String> {
    let mut months: Vec<String> = sets
        .iter()
        .flat_map(|set| {
            set.records()
                .iter()
                .filter(move |r| text(set, r, columns::YEAR).as_deref() == Some(year))
                .filter_map(move |r| text(set, r, columns::MONTH))
        })
        .filter(|month| !month.is_empty())
        .collect();
    months.sort_by(|a, b| month_order(a).cmp(&month_order(b)).then_with(|| a.cmp(b)));
    months.dedup();
    months
}

/// Records of `set` whose `Ano` and `Mês` equal `year` and `month`.
/// Sets without those columns yield an empty result.
pub fn filter_period(set: &RecordSet, year: &str, month: &str) -> RecordSet {
    set.filtered(|r| {
        text(set, r, columns::YEAR).as_deref() == Some(year)
            && text(set, r, columns::MONTH).as_deref() == Some(month)
    })
}

/// Period chosen for the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodSelection {
    /// None of the sets has a year, whatever was asked for.
    NoData,
    NoMonths { year: String },
    Selected { year: String, month: String },
}

/// Picks the requested year/month, falling back to the newest year and its first month.
pub fn select_period(sets: &[&RecordSet], year: Option<String>, month: Option<String>) -> PeriodSelection {
    let years = available_years(sets);
    if years.is_empty() {
        return PeriodSelection::NoData;
    }
    let year = year.unwrap_or_else(|| years[0].clone());
    match month.or_else(|| available_months(sets, &year).into_iter().next()) {
        Some(month) => PeriodSelection::Selected { year, month },
        None => PeriodSelection::NoMonths { year },
    }
}

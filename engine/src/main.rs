// Dashboard entry point: loads both sheets, picks a period and prints the summaries.
use anyhow::{Context, Result};
use clap::Parser;
use engine::config::settings::{EngineSettings, SourceSettings};
use engine::reports::render::{render_calendar, render_ledger};
use engine::reports::{
    available_months, available_years, filter_period, select_period, CalendarSummary, LedgerSummary,
    PeriodSelection,
};
use engine::services::DashboardService;
use engine::Loaded;
use serde::Serialize;
use shared::models::RecordSet;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dashboard", about = "Controle financeiro: contas a pagar e vale-refeição")]
struct Cli {
    /// JSON settings file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read sheets from `<dir>/<sheet>.csv`, overriding the configured source.
    #[arg(long)]
    csv_dir: Option<PathBuf>,

    /// Year to report (defaults to the most recent one with data).
    #[arg(long)]
    year: Option<String>,

    /// Month label to report (defaults to the first month with data).
    #[arg(long)]
    month: Option<String>,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct LedgerSection<'a> {
    summary: LedgerSummary,
    records: &'a RecordSet,
}

#[derive(Serialize)]
struct CalendarSection<'a> {
    summary: CalendarSummary,
    records: &'a RecordSet,
}

#[derive(Serialize)]
struct Report<'a> {
    year: &'a str,
    month: &'a str,
    years: &'a [String],
    months: &'a [String],
    ledger: LedgerSection<'a>,
    calendar: CalendarSection<'a>,
    warnings: Vec<String>,
}

fn warnings(sheet: &str, loaded: &Loaded<RecordSet>) -> Vec<String> {
    loaded
        .diagnostics
        .iter()
        .map(|e| format!("Erro ao ler {}: {}", sheet, e))
        .collect()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    info!("Starting finance dashboard...");

    let mut settings = match &cli.config {
        Some(path) => EngineSettings::load(path)
            .with_context(|| format!("Failed to load settings from '{}'", path.display()))?,
        None => EngineSettings::default(),
    };
    if let Some(dir) = cli.csv_dir.clone() {
        let delimiter = match settings.source {
            SourceSettings::CsvDirectory { delimiter, .. } => delimiter,
            SourceSettings::SheetsExport { .. } => ',',
        };
        settings.source = SourceSettings::CsvDirectory { path: dir, delimiter };
    }
    let ledger_sheet = settings.ledger.sheet.clone();
    let calendar_sheet = settings.calendar.sheet.clone();
    let amount_column = settings.ledger.amount_column.clone();

    let service = DashboardService::new(settings);
    let ledger = service.ledger();
    let calendar = service.calendar_spend();
    let mut notes = warnings(&ledger_sheet, &ledger);
    notes.extend(warnings(&calendar_sheet, &calendar));

    let sets = [&ledger.data, &calendar.data];
    let (year, month) = match select_period(&sets, cli.year.clone(), cli.month.clone()) {
        PeriodSelection::Selected { year, month } => (year, month),
        PeriodSelection::NoData => {
            print_warnings(&notes);
            println!("Nenhum dado encontrado.");
            return Ok(());
        }
        PeriodSelection::NoMonths { year } => {
            print_warnings(&notes);
            println!("Nenhum mês com dados em {}.", year);
            return Ok(());
        }
    };
    let years = available_years(&sets);
    let months = available_months(&sets, &year);
    info!(year = %year, month = %month, "Selected period");

    let ledger_period = filter_period(&ledger.data, &year, &month);
    let calendar_period = filter_period(&calendar.data, &year, &month);

    if cli.json {
        let report = Report {
            year: &year,
            month: &month,
            years: &years,
            months: &months,
            ledger: LedgerSection {
                summary: LedgerSummary::from_records(&ledger_period, &amount_column),
                records: &ledger_period,
            },
            calendar: CalendarSection {
                summary: CalendarSummary::from_records(&calendar_period),
                records: &calendar_period,
            },
            warnings: notes,
        };
        let stdout = io::stdout();
        let mut out = stdout.lock();
        serde_json::to_writer_pretty(&mut out, &report).context("Failed to write JSON report")?;
        writeln!(out)?;
        return Ok(());
    }

    print_warnings(&notes);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    // A section that fails to render is reported and skipped; the other one still prints.
    if let Err(e) = render_ledger(&mut out, &ledger_period, &amount_column, &month, &year) {
        tracing::error!(error = %e, "Failed to render ledger section");
        eprintln!("Erro ao exibir contas: {}", e);
    }
    if let Err(e) = writeln!(out).and_then(|_| {
        render_calendar(&mut out, &calendar_period, !calendar.data.is_empty(), &month, &year)
    }) {
        tracing::error!(error = %e, "Failed to render calendar section");
        eprintln!("Erro ao exibir VR: {}", e);
    }
    Ok(())
}

fn print_warnings(notes: &[String]) {
    for note in notes {
        eprintln!("Aviso: {}", note);
    }
}

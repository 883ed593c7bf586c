// Filtering and aggregation over normalized RecordSets, as consumed by the dashboard views.
pub mod period;
pub mod render;
pub mod summary;

pub use period::{available_months, available_years, filter_period, select_period, PeriodSelection};
pub use summary::{Breakdown, CalendarSummary, LedgerSummary};

// Engine library root
// Normalization pipeline for the finance dashboard: sheet grids in, RecordSets out.

pub mod config;
pub mod data;
pub mod error;
pub mod reports;
pub mod services;

pub use data::{load_calendar_spend, load_ledger};
pub use error::{EngineError, Loaded};

//! brokerfold-report: folds per-statement results into one month and writes the
//! combined workbook with its activity and positions sheets.

pub mod combiner;
pub mod exporter;

pub use combiner::{combine, combine_all};
pub use exporter::{export_month, workbook_bytes, Cell, ExportError, MonthlyExport};

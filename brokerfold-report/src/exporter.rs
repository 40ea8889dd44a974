//! Combined month workbook with an `activity` and a `positions` sheet.

use brokerfold_core::{ActivityRecord, AggregateResult, ClosingBasis, Deferred, PositionRecord};
use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet, XlsxError};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::info;

pub const ACTIVITY_SHEET: &str = "activity";
pub const POSITIONS_SHEET: &str = "positions";

pub const ACTIVITY_HEADER: [&str; 18] = [
    "date",
    "qty",
    "txtype",
    "trademonth",
    "commodity",
    "strike",
    "unitsPerContract",
    "valuePerUnit",
    "amount",
    "balance",
    "initialDate",
    "initialQtyClosedHere",
    "initialValuePerUnit",
    "initialAmount",
    "netAmount",
    "netPerUnit",
    "acct",
    "stmt",
];

pub const POSITIONS_HEADER: [&str; 14] = [
    "date",
    "qty",
    "txtype",
    "trademonth",
    "commodity",
    "strike",
    "unitsPerContract",
    "initialValuePerUnit",
    "currentValuePerUnit",
    "initialAmount",
    "currentAmount",
    "netAmount",
    "acct",
    "stmt",
];

const DATE_FORMAT: &str = "yyyy-mm-dd";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{} already exists; pass --force to overwrite", .0.display())]
    Exists(PathBuf),

    #[error("writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("xlsx: {0}")]
    Xlsx(#[from] XlsxError),
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Where the workbook of one month goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyExport {
    pub path: PathBuf,
}

impl MonthlyExport {
    /// `{dir}/{YYYY}-{MM}_Combined.xlsx`
    pub fn in_dir(dir: impl AsRef<Path>, year: i32, month: u32) -> Self {
        Self {
            path: dir.as_ref().join(format!("{year:04}-{month:02}_Combined.xlsx")),
        }
    }
}

/// One typed spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Date(NaiveDate),
    Text(String),
    Empty,
}

impl Cell {
    fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    fn opt<T>(v: Option<T>, f: impl FnOnce(T) -> Cell) -> Self {
        v.map(f).unwrap_or(Cell::Empty)
    }

    fn deferred<T>(v: Deferred<T>, f: impl FnOnce(T) -> Cell) -> Self {
        match v {
            Deferred::Known(v) => f(v),
            Deferred::Unknown => Cell::text("UNKNOWN"),
        }
    }
}

/// Write the workbook. Without `force` an existing file refuses the export.
///
/// The workbook is rendered in memory and lands through a temporary file in the target
/// directory, so a failure never leaves a partial export behind.
pub fn export_month(
    aggregate: &AggregateResult,
    target: &MonthlyExport,
    force: bool,
) -> Result<()> {
    if !force && target.path.exists() {
        return Err(ExportError::Exists(target.path.clone()));
    }

    let bytes = workbook_bytes(aggregate)?;

    let io_err = |source: std::io::Error| ExportError::Io {
        path: target.path.clone(),
        source,
    };
    let dir = match target.path.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(&bytes).map_err(io_err)?;
    tmp.persist(&target.path).map_err(|e| io_err(e.error))?;

    info!(
        activity = aggregate.activity.len(),
        positions = aggregate.positions.len(),
        "exported {}",
        target.path.display()
    );
    Ok(())
}

/// Both sheets as a finished `.xlsx` file image.
pub fn workbook_bytes(aggregate: &AggregateResult) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format(DATE_FORMAT);

    write_sheet(
        workbook.add_worksheet(),
        ACTIVITY_SHEET,
        &ACTIVITY_HEADER,
        &activity_rows(&aggregate.activity),
        &date_format,
    )?;
    write_sheet(
        workbook.add_worksheet(),
        POSITIONS_SHEET,
        &POSITIONS_HEADER,
        &position_rows(&aggregate.positions),
        &date_format,
    )?;

    Ok(workbook.save_to_buffer()?)
}

fn write_sheet(
    sheet: &mut Worksheet,
    name: &str,
    header: &[&str],
    rows: &[Vec<Cell>],
    date_format: &Format,
) -> Result<()> {
    sheet.set_name(name)?;
    for (col, title) in header.iter().enumerate() {
        sheet.write_string(0, col as u16, *title)?;
    }

    for (row, cells) in rows.iter().enumerate() {
        let row = row as u32 + 1;
        for (col, cell) in cells.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Number(n) => {
                    sheet.write_number(row, col, *n)?;
                }
                Cell::Date(d) => {
                    let dt = excel_date(*d)?;
                    sheet.write_datetime_with_format(row, col, &dt, date_format)?;
                }
                Cell::Text(s) => {
                    sheet.write_string(row, col, s)?;
                }
                Cell::Empty => {}
            }
        }
    }
    Ok(())
}

fn excel_date(d: NaiveDate) -> Result<ExcelDateTime> {
    Ok(ExcelDateTime::from_ymd(
        d.year() as u16,
        d.month() as u8,
        d.day() as u8,
    )?)
}

/// Activity sheet rows in `ACTIVITY_HEADER` order.
pub fn activity_rows(records: &[ActivityRecord]) -> Vec<Vec<Cell>> {
    records
        .iter()
        .map(|r| {
            let closing = r.closing.as_ref();
            let basis = |f: fn(&ClosingBasis) -> Cell| Cell::opt(closing, f);
            vec![
                Cell::Date(r.date),
                Cell::opt(r.qty, |q| Cell::deferred(q, |q| Cell::Number(q as f64))),
                Cell::text(r.tx_label()),
                Cell::opt(r.trade_month.clone(), Cell::Text),
                Cell::text(r.commodity.label()),
                Cell::opt(r.strike, Cell::Number),
                Cell::Number(r.units_per_contract as f64),
                Cell::opt(r.value_per_unit, |v| Cell::deferred(v, Cell::Number)),
                Cell::Number(r.amount),
                // running balance is left to the spreadsheet
                Cell::Empty,
                basis(|c| Cell::deferred(c.initial_date, Cell::Date)),
                basis(|c| {
                    Cell::deferred(c.initial_qty_closed_here, |q| Cell::Number(q as f64))
                }),
                basis(|c| Cell::deferred(c.initial_value_per_unit, Cell::Number)),
                basis(|c| Cell::deferred(c.initial_amount, Cell::Number)),
                basis(|c| Cell::deferred(c.net_amount, Cell::Number)),
                basis(|c| Cell::deferred(c.net_per_unit, Cell::Number)),
                Cell::text(r.account_id.as_str()),
                Cell::text(r.statement_id.as_str()),
            ]
        })
        .collect()
}

/// Positions sheet rows in `POSITIONS_HEADER` order.
pub fn position_rows(records: &[PositionRecord]) -> Vec<Vec<Cell>> {
    records
        .iter()
        .map(|r| {
            vec![
                Cell::Date(r.date),
                Cell::Number(r.qty as f64),
                Cell::text(r.tx_type.label()),
                Cell::text(r.trade_month.as_str()),
                Cell::text(r.commodity.label()),
                Cell::opt(r.strike, Cell::Number),
                Cell::Number(r.units_per_contract as f64),
                Cell::Number(r.initial_value_per_unit),
                Cell::Number(r.current_value_per_unit),
                Cell::Number(r.initial_amount),
                Cell::Number(r.current_amount),
                Cell::Number(r.net_amount),
                Cell::text(r.account_id.as_str()),
                Cell::text(r.statement_id.as_str()),
            ]
        })
        .collect()
}

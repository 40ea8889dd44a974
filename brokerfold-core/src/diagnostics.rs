//! Non-fatal findings raised while processing a statement.
//!
//! Stages that can hit an expected data gap take a `&mut dyn DiagnosticSink` instead of
//! printing. Tests pass a `Vec<Diagnostic>` and assert on it; the CLI forwards to
//! `tracing` through [`TracingSink`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::contract::Commodity;
use crate::record::SectionCounts;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// A futures fee had no opening trade in the activity and no matching end-of-period
    /// position. Happens when a position is opened and closed inside the same month.
    UnmatchedFuturesOpening {
        account: String,
        statement: String,
        line: usize,
        date: NaiveDate,
        commodity: Commodity,
        trade_month: String,
        qty: i64,
    },
    /// Account number in the statement header differs from the one in the file name
    AccountMismatch {
        statement: String,
        from_filename: String,
        from_header: String,
    },
    /// Parsed entry counts differ from the estimate taken before header stripping
    EstimateMismatch {
        statement: String,
        estimated: SectionCounts,
        parsed: SectionCounts,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnmatchedFuturesOpening {
                account,
                statement,
                line,
                date,
                commodity,
                trade_month,
                qty,
            } => write!(
                f,
                "{account}/{statement}: LINE {line}: no futures position for {date} {qty} \
                 {commodity} {trade_month}; opened and closed within the month? \
                 valuePerUnit left UNKNOWN"
            ),
            Diagnostic::AccountMismatch {
                statement,
                from_filename,
                from_header,
            } => write!(
                f,
                "{statement}: header account {from_header} does not match filename account {from_filename}"
            ),
            Diagnostic::EstimateMismatch {
                statement,
                estimated,
                parsed,
            } => write!(
                f,
                "{statement}: parsed {}/{}/{} activity/positions/summary entries, estimated {}/{}/{}",
                parsed.activity,
                parsed.positions,
                parsed.summary,
                estimated.activity,
                estimated.positions,
                estimated.summary
            ),
        }
    }
}

/// Receiver for non-fatal diagnostics
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Logs each diagnostic at `warn` level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
    }
}

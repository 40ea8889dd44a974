//! brokerfold-core: record types, contract constants, errors and diagnostics shared by
//! the statement pipeline crates.

pub mod contract;
pub mod deferred;
pub mod diagnostics;
pub mod error;
pub mod record;

pub use contract::{Commodity, TxType};
pub use deferred::Deferred;
pub use diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
pub use error::{LineRef, Result, StatementError};
pub use record::{
    ActivityRecord, AggregateResult, ClosingBasis, LineRecord, PositionRecord, SectionBundle,
    SectionCounts, SummaryKind, SummaryRecord,
};

/// Absolute tolerance used when comparing reconstructed amounts.
pub const AMOUNT_TOLERANCE: f64 = 1e-9;

/// Returns true when two amounts agree within [`AMOUNT_TOLERANCE`], scaled for large values.
pub fn approx_eq(a: f64, b: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= AMOUNT_TOLERANCE * scale
}

//! Fixes that need more than one line of context.
//!
//! - A futures P&L line takes its quantity from the FEES line right below it.
//! - A FEES line with no futures line above it is the fee for *opening* a futures
//!   position. The statement never prints that trade, so a zero-amount FUTURES record is
//!   synthesized in front of the fee, priced from the matching end-of-month position.
//! - CANCEL records are dropped.
//!
//! Option fees are already netted into the premium on monthly statements, so only
//! futures need this.

use brokerfold_core::{
    ActivityRecord, Deferred, Diagnostic, DiagnosticSink, PositionRecord, Result, StatementError,
    TxType,
};
use tracing::debug;

pub fn apply_fixups(
    activity: &[ActivityRecord],
    positions: &[PositionRecord],
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<ActivityRecord>> {
    let fixed = activity.iter().enumerate().try_fold(
        Vec::with_capacity(activity.len()),
        |mut out, (index, record)| -> Result<Vec<ActivityRecord>> {
            match record.tx_type {
                TxType::Cancel => {}
                TxType::Futures => out.push(close_futures(record, activity.get(index + 1))?),
                TxType::Fees => {
                    let after_futures = index
                        .checked_sub(1)
                        .and_then(|prev| activity.get(prev))
                        .is_some_and(|prev| prev.tx_type == TxType::Futures);
                    if !after_futures {
                        out.push(open_futures(record, positions, &mut *sink)?);
                    }
                    out.push(record.clone());
                }
                _ => out.push(record.clone()),
            }
            Ok(out)
        },
    )?;

    debug!(
        parsed = activity.len(),
        fixed = fixed.len(),
        "applied futures fixups"
    );
    Ok(fixed)
}

/// Futures P&L line with its quantity taken from the fee line that follows it
fn close_futures(record: &ActivityRecord, next: Option<&ActivityRecord>) -> Result<ActivityRecord> {
    if record.qty != Some(Deferred::Unknown) {
        return Err(StatementError::fixup(
            record.at(),
            format!(
                "FUTURES line already has a quantity ({}) before fixing it from the FEES line below",
                record.qty.map(|q| q.to_string()).unwrap_or_default()
            ),
        ));
    }
    let fees = match next {
        Some(next) if next.tx_type == TxType::Fees => next,
        Some(next) => {
            return Err(StatementError::fixup(
                record.at(),
                format!("FUTURES line is followed by {} instead of FEES", next.tx_type),
            ));
        }
        None => {
            return Err(StatementError::fixup(
                record.at(),
                "FUTURES line ends the activity, expected a FEES line after it",
            ));
        }
    };
    Ok(ActivityRecord {
        qty: fees.qty,
        ..record.clone()
    })
}

/// Zero-amount opening trade for a fee that has no futures line above it
fn open_futures(
    fees: &ActivityRecord,
    positions: &[PositionRecord],
    sink: &mut dyn DiagnosticSink,
) -> Result<ActivityRecord> {
    let qty = match fees.qty {
        Some(Deferred::Known(q)) => q,
        _ => {
            return Err(StatementError::fixup(
                fees.at(),
                "FEES line has no quantity to open a futures position with",
            ));
        }
    };
    let trade_month = fees.trade_month.clone().unwrap_or_default();

    let matching = positions.iter().find(|p| {
        p.tx_type == TxType::Futures
            && p.qty == qty
            && p.commodity == fees.commodity
            && p.trade_month == trade_month
            && p.date == fees.date
    });

    let value_per_unit = match matching {
        Some(position) => Deferred::Known(position.initial_value_per_unit),
        None => {
            sink.report(Diagnostic::UnmatchedFuturesOpening {
                account: fees.account_id.clone(),
                statement: fees.statement_id.clone(),
                line: fees.line_number,
                date: fees.date,
                commodity: fees.commodity,
                trade_month: trade_month.clone(),
                qty,
            });
            Deferred::Unknown
        }
    };

    Ok(ActivityRecord {
        tx_type: TxType::Futures,
        units_per_contract: fees.commodity.units_per_contract(TxType::Futures),
        // entering a futures contract moves no cash
        amount: 0.0,
        value_per_unit: Some(value_per_unit),
        closing: None,
        ..fees.clone()
    })
}

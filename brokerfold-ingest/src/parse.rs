//! Turn pruned section lines into typed records, one per line.

use brokerfold_core::{
    ActivityRecord, ClosingBasis, Deferred, LineRecord, PositionRecord, Result, StatementError,
    SummaryRecord, TxType,
};

use crate::columns::{summary_fields, EntryLine};
use crate::patterns::LinePatterns;

// Options:
//   5/10/6                        9  PUT  DEC 16 CORN           350  A     NET PREM  US                         6,335.91
// Futures:
//   5/25/6            10         10  DEC 16 CORN                     A          P&L  US                         4,625.00
//   5/25/6                       10  DEC 16 CORN                     A     FEE/COMM  US         105.10
// Transfers:
//   9/06/6                           Ach Sent                                  CASH  US      60,000.00
//  12/28/6                           Ach Received                              CASH  US                        20,000.00
pub fn parse_activity(lines: &[LineRecord], p: &LinePatterns) -> Result<Vec<ActivityRecord>> {
    lines.iter().map(|line| parse_activity_line(line, p)).collect()
}

fn parse_activity_line(line: &LineRecord, p: &LinePatterns) -> Result<ActivityRecord> {
    let e = EntryLine::new(line, p)?;
    let tx_type = e.tx_type()?;
    let commodity = e.commodity()?;
    let amount = e.amount()?;
    let units_per_contract = commodity.units_per_contract(tx_type);

    let mut record = ActivityRecord {
        line_number: line.line_number,
        account_id: line.account_id.clone(),
        statement_id: line.statement_id.clone(),
        date: e.date()?,
        tx_type,
        commodity,
        amount,
        qty: None,
        trade_month: None,
        strike: None,
        units_per_contract,
        value_per_unit: None,
        transfer_trade: line.transfer_trade,
        closing: None,
    };
    if tx_type == TxType::Transfer {
        return Ok(record);
    }

    let qty = e.qty(tx_type)?;
    record.qty = Some(qty);
    record.trade_month = Some(e.trade_month()?);
    if tx_type.is_option() {
        record.strike = Some(e.strike(commodity)?);
    }

    record.value_per_unit = Some(match (tx_type, qty) {
        (TxType::Futures, _) => {
            record.closing = Some(ClosingBasis::unresolved());
            Deferred::Unknown
        }
        (TxType::Cancel, _) => Deferred::Unknown,
        // fees always take value away
        (TxType::Fees, Deferred::Known(q)) => {
            Deferred::Known(-per_unit(line, amount, q, units_per_contract)?.abs())
        }
        (_, Deferred::Known(q)) => Deferred::Known(per_unit(line, amount, q, units_per_contract)?),
        (_, Deferred::Unknown) => Deferred::Unknown,
    });
    Ok(record)
}

fn per_unit(line: &LineRecord, amount: f64, qty: i64, units: u32) -> Result<f64> {
    if qty == 0 {
        return Err(StatementError::line(
            line.at(),
            "cannot value a line with zero contracts",
        ));
    }
    Ok(amount / (qty as f64 * units as f64))
}

//   9/24/4            10             DEC 16 CORN                     A     3.97 3/4  US       1,250.00
//  12/15/5             4             PUT  DEC 16 LIVE CATTLE   1160  B     7.37 1/2  US                         8,000.00
pub fn parse_positions(lines: &[LineRecord], p: &LinePatterns) -> Result<Vec<PositionRecord>> {
    lines.iter().map(|line| parse_position_line(line, p)).collect()
}

fn parse_position_line(line: &LineRecord, p: &LinePatterns) -> Result<PositionRecord> {
    let e = EntryLine::new(line, p)?;
    let tx_type = e.tx_type()?;
    let commodity = e.commodity()?;
    let qty = match e.qty(tx_type)? {
        Deferred::Known(q) if q != 0 => q,
        _ => {
            return Err(StatementError::line(
                line.at(),
                "position line has a net quantity of zero",
            ));
        }
    };
    let units_per_contract = commodity.units_per_contract(tx_type);
    let initial_value_per_unit = e.initial_value_per_unit()?;
    let current_amount = e.amount()?;
    let contract_units = units_per_contract as f64 * qty as f64;

    // futures statements carry only the change since entry, so the entry price is added
    // back and nothing was paid up front
    let (current_value_per_unit, initial_amount) = if tx_type == TxType::Futures {
        (current_amount / contract_units + initial_value_per_unit, 0.0)
    } else {
        (
            current_amount / contract_units,
            initial_value_per_unit * units_per_contract as f64 * qty as f64,
        )
    };

    Ok(PositionRecord {
        line_number: line.line_number,
        account_id: line.account_id.clone(),
        statement_id: line.statement_id.clone(),
        date: e.date()?,
        tx_type,
        commodity,
        qty,
        trade_month: e.trade_month()?,
        strike: if tx_type.is_option() {
            Some(e.strike(commodity)?)
        } else {
            None
        },
        units_per_contract,
        initial_value_per_unit,
        current_amount,
        current_value_per_unit,
        initial_amount,
        net_amount: current_amount - initial_amount,
    })
}

//   1. BEGINNING ACCT BALANCE            90,122.69
//   2. P&L AND CASH ACTIVITY             23,932.40-
pub fn parse_summary(lines: &[LineRecord]) -> Result<Vec<SummaryRecord>> {
    lines
        .iter()
        .map(|line| {
            let (kind, amount) = summary_fields(line)?;
            Ok(SummaryRecord {
                line_number: line.line_number,
                account_id: line.account_id.clone(),
                statement_id: line.statement_id.clone(),
                kind,
                amount,
            })
        })
        .collect()
}

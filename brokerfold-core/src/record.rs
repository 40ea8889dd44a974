//! Record types flowing through the statement pipeline

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::contract::{Commodity, TxType};
use crate::deferred::Deferred;
use crate::error::LineRef;

/// One raw line of a statement, tagged with where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRecord {
    pub text: String,
    /// 0-based line number in the statement file
    pub line_number: usize,
    pub account_id: String,
    pub statement_id: String,
    /// Set by the pruner when the next statement line reads `TRANSFER TRADE`
    #[serde(default)]
    pub transfer_trade: bool,
}

impl LineRecord {
    pub fn new(
        text: impl Into<String>,
        line_number: usize,
        account_id: impl Into<String>,
        statement_id: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            line_number,
            account_id: account_id.into(),
            statement_id: statement_id.into(),
            transfer_trade: false,
        }
    }

    pub fn at(&self) -> LineRef {
        LineRef {
            account: self.account_id.clone(),
            statement: self.statement_id.clone(),
            line: self.line_number,
        }
    }

    /// Copy of this line carrying the transfer-trade tag
    pub fn tagged_transfer_trade(&self) -> Self {
        Self {
            transfer_trade: true,
            ..self.clone()
        }
    }
}

/// Statement lines split into their three logical sections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionBundle {
    pub activity: Vec<LineRecord>,
    pub positions: Vec<LineRecord>,
    pub summary: Vec<LineRecord>,
}

impl SectionBundle {
    pub fn counts(&self) -> SectionCounts {
        SectionCounts {
            activity: self.activity.len(),
            positions: self.positions.len(),
            summary: self.summary.len(),
        }
    }
}

/// Number of entries per section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionCounts {
    pub activity: usize,
    pub positions: usize,
    pub summary: usize,
}

/// Cost-basis columns of a futures closing line. The statement prints only the net
/// P&L, so everything here stays unresolved until matched against the opening trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosingBasis {
    pub initial_date: Deferred<NaiveDate>,
    pub initial_qty_closed_here: Deferred<i64>,
    pub initial_value_per_unit: Deferred<f64>,
    pub initial_amount: Deferred<f64>,
    pub net_amount: Deferred<f64>,
    pub net_per_unit: Deferred<f64>,
}

impl ClosingBasis {
    pub fn unresolved() -> Self {
        Self {
            initial_date: Deferred::Unknown,
            initial_qty_closed_here: Deferred::Unknown,
            initial_value_per_unit: Deferred::Unknown,
            initial_amount: Deferred::Unknown,
            net_amount: Deferred::Unknown,
            net_per_unit: Deferred::Unknown,
        }
    }
}

/// A transaction from the activity section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub line_number: usize,
    pub account_id: String,
    pub statement_id: String,
    pub date: NaiveDate,
    pub tx_type: TxType,
    pub commodity: Commodity,
    /// Credit positive, debit negative
    pub amount: f64,
    /// Signed: positive = buy, negative = sell. None for cash transfers.
    pub qty: Option<Deferred<i64>>,
    /// Contract month like `DEC16`. None for cash transfers.
    pub trade_month: Option<String>,
    /// Options only
    pub strike: Option<f64>,
    pub units_per_contract: u32,
    /// None for cash transfers
    pub value_per_unit: Option<Deferred<f64>>,
    pub transfer_trade: bool,
    pub closing: Option<ClosingBasis>,
}

impl ActivityRecord {
    pub fn at(&self) -> LineRef {
        LineRef {
            account: self.account_id.clone(),
            statement: self.statement_id.clone(),
            line: self.line_number,
        }
    }

    /// Transaction type as shown in the exported sheet; options moved in from
    /// another broker are flagged as transfers.
    pub fn tx_label(&self) -> String {
        if self.transfer_trade && self.tx_type.is_option() {
            format!("TRANSFER-{}", self.tx_type.label())
        } else {
            self.tx_type.label().to_string()
        }
    }
}

/// An open holding from the positions section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub line_number: usize,
    pub account_id: String,
    pub statement_id: String,
    pub date: NaiveDate,
    pub tx_type: TxType,
    pub commodity: Commodity,
    pub qty: i64,
    pub trade_month: String,
    pub strike: Option<f64>,
    pub units_per_contract: u32,
    pub initial_value_per_unit: f64,
    pub current_amount: f64,
    pub current_value_per_unit: f64,
    pub initial_amount: f64,
    pub net_amount: f64,
}

/// The period roll-up lines this pipeline keeps. Anything else in the summary
/// section is page furniture.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SummaryKind {
    BeginningBalance,
    PnlAndCashActivity,
    EndingBalance,
    NetFuturesPnl,
    NetOptionPremium,
    OptionsMarketValue,
    AccountValueAtMarket,
    ConvertedAccountValue,
}

impl SummaryKind {
    pub const ALL: [SummaryKind; 8] = [
        SummaryKind::BeginningBalance,
        SummaryKind::PnlAndCashActivity,
        SummaryKind::EndingBalance,
        SummaryKind::NetFuturesPnl,
        SummaryKind::NetOptionPremium,
        SummaryKind::OptionsMarketValue,
        SummaryKind::AccountValueAtMarket,
        SummaryKind::ConvertedAccountValue,
    ];

    /// Label as printed on the statement, ordinal included
    pub fn label(&self) -> &'static str {
        match self {
            SummaryKind::BeginningBalance => "1. BEGINNING ACCT BALANCE",
            SummaryKind::PnlAndCashActivity => "2. P&L AND CASH ACTIVITY",
            SummaryKind::EndingBalance => "3. ENDING ACCT BALANCE",
            SummaryKind::NetFuturesPnl => "4. NET FUTURES P&L",
            SummaryKind::NetOptionPremium => "5. NET OPTION PREMIUM",
            SummaryKind::OptionsMarketValue => "8. OPTIONS MARKET VALUE",
            SummaryKind::AccountValueAtMarket => "9. ACCT VALUE AT MARKET",
            SummaryKind::ConvertedAccountValue => "11. CONVERTED ACCT VALUE US",
        }
    }

    /// Label text without the ordinal, as matched anywhere on a line
    pub fn keyword(&self) -> &'static str {
        let label = self.label();
        label.split_once(". ").map(|(_, rest)| rest).unwrap_or(label)
    }

    /// Kind whose full label starts the given (trimmed) text
    pub fn from_label(text: &str) -> Option<SummaryKind> {
        Self::ALL.into_iter().find(|k| text.starts_with(k.label()))
    }
}

impl fmt::Display for SummaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One balance roll-up line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub line_number: usize,
    pub account_id: String,
    pub statement_id: String,
    pub kind: SummaryKind,
    pub amount: f64,
}

/// Parsed records for one statement, or the fold of many
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub activity: Vec<ActivityRecord>,
    pub positions: Vec<PositionRecord>,
    pub summary: Vec<SummaryRecord>,
}

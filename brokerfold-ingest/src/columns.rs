//! Fixed-column field decoding.
//!
//! ```text
//!   DATE            LONG/BUY  SHRT/SELL      DESCRIPTION           EX   PRICE/LEGND CC          DEBIT            CREDIT
//!                                                                                                         111111111111111111
//!           111111111122222222223333333333444444444455555555556666666666777777777788888888889999999999000000000011111111
//! 0123456789012345678901234567890123456789012345678901234567890123456789012345678901234567890123456789012345678901234567
//!   5/10/6                        9  PUT  DEC 16 CORN           350  A     NET PREM  US                         6,335.91
//!   5/25/6            10         10  DEC 16 CORN                     A          P&L  US                         4,625.00
//!   9/24/4            10             DEC 16 CORN                     A     3.97 3/4  US       1,250.00
//! ```

use brokerfold_core::{Commodity, Deferred, LineRecord, Result, StatementError, SummaryKind, TxType};
use chrono::NaiveDate;
use std::ops::Range;

use crate::patterns::LinePatterns;

pub const DATE: Range<usize> = 0..9;
pub const BUY: Range<usize> = 16..26;
pub const SELL: Range<usize> = 27..33;
pub const DESCRIPTION: Range<usize> = 35..65;
pub const PRICE_LEGEND: Range<usize> = 71..81;
pub const DEBIT: Range<usize> = 87..100;
pub const CREDIT: Range<usize> = 101..118;
pub const SUMMARY_LABEL: Range<usize> = 0..30;
pub const SUMMARY_VALUE_START: usize = 32;

/// Year the single statement year digit counts from
pub const YEAR_PIVOT: i32 = 2010;

/// Byte slice of a line, clipped to its length. Lines that stop early simply have
/// empty trailing columns. `None` when a column edge falls inside a multibyte
/// character: the line is not in the fixed layout.
pub fn column(text: &str, range: Range<usize>) -> Option<&str> {
    let end = range.end.min(text.len());
    let start = range.start.min(end);
    text.get(start..end)
}

/// Number with thousands separators; blank reads as zero
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() {
        return Some(0.0);
    }
    cleaned.parse().ok()
}

/// One entry line cut into its columns, with the normalized description computed
/// up front
pub struct EntryLine<'a> {
    line: &'a LineRecord,
    p: &'a LinePatterns,
    date: &'a str,
    buy: &'a str,
    sell: &'a str,
    price_legend: &'a str,
    debit: &'a str,
    credit: &'a str,
    description: String,
}

impl<'a> EntryLine<'a> {
    pub fn new(line: &'a LineRecord, p: &'a LinePatterns) -> Result<Self> {
        let col = move |range: Range<usize>, name: &'static str| -> Result<&'a str> {
            column(&line.text, range).ok_or_else(|| {
                StatementError::line(
                    line.at(),
                    format!("{name} column cuts through a multibyte character"),
                )
            })
        };

        let collapsed = col(DESCRIPTION, "description")?
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        // "PUT DEC 16 CORN 350" -> "PUT DEC16 CORN 350"
        let description = p.month_year_pair.replace(&collapsed, "$1$2").into_owned();
        Ok(Self {
            line,
            p,
            date: col(DATE, "date")?,
            buy: col(BUY, "buy")?,
            sell: col(SELL, "sell")?,
            price_legend: col(PRICE_LEGEND, "price/legend")?.trim(),
            debit: col(DEBIT, "debit")?,
            credit: col(CREDIT, "credit")?,
            description,
        })
    }

    fn fail(&self, message: impl Into<String>) -> StatementError {
        StatementError::line(self.line.at(), message)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price_legend(&self) -> &str {
        self.price_legend
    }

    pub fn date(&self) -> Result<NaiveDate> {
        let raw = self.date;
        let caps = self
            .p
            .date_column
            .captures(raw)
            .ok_or_else(|| self.fail(format!("date column ({raw}) is not M/DD/Y")))?;
        let year: i32 = caps["year"]
            .parse()
            .map_err(|_| self.fail(format!("date column ({raw}) has an unreadable year")))?;
        if year >= 10 {
            return Err(self.fail(format!("date column ({raw}) year is not a single digit")));
        }
        let month: u32 = caps["month"].parse().unwrap_or(0);
        let day: u32 = caps["day"].parse().unwrap_or(0);
        NaiveDate::from_ymd_opt(YEAR_PIVOT + year, month, day)
            .ok_or_else(|| self.fail(format!("date column ({raw}) is not a calendar date")))
    }

    fn contracts(&self, raw: &str, side: &str) -> Result<i64> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(0);
        }
        raw.parse()
            .map_err(|_| self.fail(format!("{side} quantity ({raw}) is not a whole number")))
    }

    /// Net contracts, positive for buys. Futures activity lines print the same count on
    /// both sides, so their real quantity is left for the fixup stage.
    pub fn qty(&self, tx_type: TxType) -> Result<Deferred<i64>> {
        let net = self.contracts(self.buy, "buy")? - self.contracts(self.sell, "sell")?;
        if tx_type != TxType::Futures {
            return Ok(Deferred::Known(net));
        }
        match (net, self.has_initial_value()) {
            (0, false) => Ok(Deferred::Unknown),
            (0, true) => Err(self.fail(
                "futures position has a net quantity of zero alongside an initial price",
            )),
            (_, false) => Err(self.fail(format!(
                "futures activity line should net to zero contracts, found {net}"
            ))),
            (net, true) => Ok(Deferred::Known(net)),
        }
    }

    pub fn tx_type(&self) -> Result<TxType> {
        let desc = self.description();
        if desc.starts_with("PUT") {
            return Ok(TxType::Put);
        }
        if desc.starts_with("CALL") {
            return Ok(TxType::Call);
        }
        if is_ach(desc) {
            return Ok(TxType::Transfer);
        }
        if self.p.futures_prefix.is_match(desc) {
            let legend = self.price_legend();
            if legend.contains("CANCEL") {
                return Ok(TxType::Cancel);
            }
            if legend.contains("FEE/COMM") {
                return Ok(TxType::Fees);
            }
            if legend.contains("P&L") {
                return Ok(TxType::Futures);
            }
            if self.has_initial_value() {
                return Ok(TxType::Futures);
            }
            return Err(self.fail(format!(
                "futures line price/legend ({legend}) is neither P&L, FEE/COMM nor a price"
            )));
        }
        Err(self.fail(format!(
            "description ({desc}) is not a PUT, CALL, futures contract or ACH transfer"
        )))
    }

    pub fn commodity(&self) -> Result<Commodity> {
        let desc = self.description();
        if desc.contains("CORN") {
            Ok(Commodity::Corn)
        } else if desc.contains("SOYBEANS") {
            Ok(Commodity::Soybeans)
        } else if desc.contains("LIVE CATTLE") {
            Ok(Commodity::LiveCattle)
        } else if is_ach(desc) {
            Ok(Commodity::Cash)
        } else {
            Err(self.fail(format!(
                "description ({desc}) is not CORN, SOYBEANS, LIVE CATTLE or cash"
            )))
        }
    }

    /// Last `MMMYY` token of the description, e.g. `DEC16`
    pub fn trade_month(&self) -> Result<String> {
        self.p
            .trade_month
            .find_iter(self.description())
            .last()
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| {
                self.fail(format!(
                    "description ({}) has no trade month",
                    self.description()
                ))
            })
    }

    pub fn strike(&self, commodity: Commodity) -> Result<f64> {
        let desc = self.description();
        let caps = self
            .p
            .strike
            .captures(desc)
            .ok_or_else(|| self.fail(format!("description ({desc}) does not end in a strike")))?;
        let divisor = commodity.strike_divisor().ok_or_else(|| {
            self.fail(format!("no strike price divisor for commodity {commodity}"))
        })?;
        let strike: f64 = caps["strike"]
            .parse()
            .map_err(|_| self.fail(format!("strike in ({desc}) is not a number")))?;
        Ok(strike / divisor)
    }

    pub fn has_initial_value(&self) -> bool {
        self.p.initial_value_prefix.is_match(self.price_legend())
    }

    /// Price/legend column as a price: `3.97 3/4` is 3.97 plus three quarters of a cent
    pub fn initial_value_per_unit(&self) -> Result<f64> {
        let legend = self.price_legend();
        let bad = || self.fail(format!("price/legend column ({legend}) is not a price"));
        let caps = self.p.initial_value.captures(legend).ok_or_else(bad)?;
        let price: f64 = caps["price"].parse().map_err(|_| bad())?;
        let fraction = match (caps.name("num"), caps.name("den")) {
            (Some(num), Some(den)) => {
                let num: f64 = num.as_str().parse().map_err(|_| bad())?;
                let den: f64 = den.as_str().parse().map_err(|_| bad())?;
                if den == 0.0 {
                    return Err(bad());
                }
                0.01 * num / den
            }
            _ => 0.0,
        };
        Ok(price + fraction)
    }

    fn money(&self, raw: &str, side: &str) -> Result<f64> {
        parse_number(raw)
            .ok_or_else(|| self.fail(format!("{side} column ({}) is not an amount", raw.trim())))
    }

    /// Credit minus debit
    pub fn amount(&self) -> Result<f64> {
        Ok(self.money(self.credit, "credit")? - self.money(self.debit, "debit")?)
    }
}

fn is_ach(desc: &str) -> bool {
    desc.starts_with("Ach Sent") || desc.starts_with("Ach Received")
}

//               0123456789012345678901234567890123456789012345678
//                 2. P&L AND CASH ACTIVITY             23,932.40-
/// Decode a summary roll-up line into its kind and signed amount
pub fn summary_fields(line: &LineRecord) -> Result<(SummaryKind, f64)> {
    let misaligned = || {
        StatementError::line(line.at(), "summary line cuts through a multibyte character")
    };
    let label = column(&line.text, SUMMARY_LABEL)
        .ok_or_else(misaligned)?
        .trim();
    let kind = SummaryKind::from_label(label).ok_or_else(|| {
        StatementError::line(line.at(), format!("summary label ({label}) is not a known type"))
    })?;

    let raw = column(&line.text, SUMMARY_VALUE_START..line.text.len())
        .ok_or_else(misaligned)?
        .trim();
    let (digits, sign) = match raw.strip_suffix('-') {
        Some(rest) => (rest, -1.0),
        None => (raw, 1.0),
    };
    let amount = parse_number(digits).ok_or_else(|| {
        StatementError::line(line.at(), format!("summary amount ({raw}) is not a number"))
    })?;
    Ok((kind, sign * amount))
}

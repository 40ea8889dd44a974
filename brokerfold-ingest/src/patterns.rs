//! Compiled line patterns for the statement layout.
//!
//! Built once per run and shared by every stage. Literal banners are matched with
//! `str::contains`; only the shapes that need a regex live here.

use brokerfold_core::Result;
use regex::Regex;

//                                                                      STATEMENT  DATE:  SEP 30, 2016
pub const STATEMENT_DATE_MARKER: &str = "STATEMENT  DATE:";
//                                                                      ACCOUNT  NUMBER:  262 V8956
pub const ACCOUNT_MARKER: &str = "ACCOUNT  NUMBER:";
pub const ACTIVITY_BANNER: &str = "Y O U R   A C T I V I T Y   T H I S   M O N T H";
pub const POSITIONS_BANNER: &str = "P O S I T I O N S   I N   Y O U R   A C C O U N T";
pub const SEGMENT_BANNER: &str = "*** SEG USD ***";
pub const TRANSFER_TRADE: &str = "TRANSFER TRADE";
pub const MEMO_PNL: &str = " MEMO P&L ";

#[derive(Debug, Clone)]
pub struct LinePatterns {
    pub statement_date: Regex,
    pub account: Regex,
    pub column_titles: Regex,
    /// Start of an activity or positions entry: `  5/10/6 `
    pub entry_date: Regex,
    /// Captures month, day and year digit from the date column
    pub date_column: Regex,
    pub month_year_pair: Regex,
    pub trade_month: Regex,
    pub futures_prefix: Regex,
    pub strike: Regex,
    pub initial_value_prefix: Regex,
    pub initial_value: Regex,
    pub filename_account: Regex,
    pub filename_date: Regex,
}

impl LinePatterns {
    pub fn new() -> Result<Self> {
        Ok(Self {
            statement_date: Regex::new(
                r"STATEMENT  DATE:  (?P<month>[A-Z]{3}) +(?P<day>[0-9]{1,2}), (?P<year>[0-9]{4})",
            )?,
            account: Regex::new(r"ACCOUNT  NUMBER:  (?P<office>[0-9]{3}) (?P<acct>V[0-9]{4,})")?,
            //   DATE            LONG/BUY  SHRT/SELL      DESCRIPTION           EX   PRICE/LEGND CC          DEBIT            CREDIT
            column_titles: Regex::new(r"^ +DATE")?,
            entry_date: Regex::new(r"^ {1,2}[0-9]{1,2}/[0-9]{2}/[0-9] ")?,
            date_column: Regex::new(
                r"^ +(?P<month>[0-9]{1,2})/(?P<day>[0-9]{2})/(?P<year>[0-9]+) ",
            )?,
            month_year_pair: Regex::new(r"([A-Z]{3}) ([0-9]{2})")?,
            trade_month: Regex::new(r"[A-Z]{3}[0-9]{2}")?,
            futures_prefix: Regex::new(r"^[A-Z]{3}[0-9]{2}")?,
            strike: Regex::new(r" (?P<strike>[0-9]{3,4})$")?,
            initial_value_prefix: Regex::new(r"^[0-9]*\.[0-9]{2}( +[0-9]/[0-9])?")?,
            initial_value: Regex::new(
                r"^(?P<price>[0-9]*\.[0-9]{2}) *((?P<num>[0-9])/(?P<den>[0-9]))?$",
            )?,
            filename_account: Regex::new(r"^(?P<acct>[0-9]{3}-V[0-9]{4}):")?,
            filename_date: Regex::new(r":(?P<date>[0-9]{4}-[0-9]{2}-[0-9]{2})\.txt$")?,
        })
    }

    pub fn is_column_titles(&self, text: &str) -> bool {
        self.column_titles.is_match(text)
    }

    pub fn is_entry(&self, text: &str) -> bool {
        self.entry_date.is_match(text)
    }
}

/// Month number for a three-letter statement abbreviation
pub fn month_from_abbrev(abbrev: &str) -> Option<u32> {
    let month = match abbrev {
        "JAN" => 1,
        "FEB" => 2,
        "MAR" => 3,
        "APR" => 4,
        "MAY" => 5,
        "JUN" => 6,
        "JUL" => 7,
        "AUG" => 8,
        "SEP" => 9,
        "OCT" => 10,
        "NOV" => 11,
        "DEC" => 12,
        _ => return None,
    };
    Some(month)
}

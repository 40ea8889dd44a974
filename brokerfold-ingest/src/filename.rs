//! Statement file names: `262-V8960:2016-04-29.txt`

use brokerfold_core::{Result, StatementError};
use chrono::NaiveDate;
use std::path::Path;

use crate::patterns::LinePatterns;

/// Identity of a statement as encoded in its file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementFile {
    pub account_id: String,
    pub date: NaiveDate,
    /// Base file name; used as the statement id on every record
    pub statement_id: String,
}

/// Parse a statement file name, ignoring any directory prefix.
pub fn parse_statement_filename(path: impl AsRef<Path>, p: &LinePatterns) -> Result<StatementFile> {
    let name = path
        .as_ref()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let bad = |reason| StatementError::FileName {
        filename: name.clone(),
        reason,
    };

    let account_id = p
        .filename_account
        .captures(&name)
        .map(|caps| caps["acct"].to_string())
        .ok_or_else(|| bad("does not start with an account number like 262-V8960:"))?;

    let date = p
        .filename_date
        .captures(&name)
        .and_then(|caps| NaiveDate::parse_from_str(&caps["date"], "%Y-%m-%d").ok())
        .ok_or_else(|| bad("does not end with a statement date like :2016-04-29.txt"))?;

    Ok(StatementFile {
        account_id,
        date,
        statement_id: name,
    })
}

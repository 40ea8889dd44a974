//! Page header removal.
//!
//! Every statement page opens with the same block: the `STATEMENT  DATE:` line, the
//! account and address lines, and the column titles. The block is dropped, and the
//! account number and statement date are picked up on the way.

use brokerfold_core::{LineRecord, Result, StatementError};
use chrono::NaiveDate;
use tracing::debug;

use crate::patterns::{
    month_from_abbrev, LinePatterns, ACCOUNT_MARKER, ACTIVITY_BANNER, POSITIONS_BANNER,
    SEGMENT_BANNER, STATEMENT_DATE_MARKER,
};

/// Lines in a page header, from the `STATEMENT  DATE:` line through the column titles
/// (or balance-segment banner), section banners excluded.
pub const HEADER_LINES: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderState {
    Outside,
    InHeader { count: usize },
}

/// What the header machine cares about in a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLine {
    StatementDate,
    SectionBanner,
    SegmentBanner,
    ColumnTitles,
    Other,
}

impl HeaderLine {
    pub fn classify(text: &str, p: &LinePatterns) -> Self {
        if text.contains(STATEMENT_DATE_MARKER) {
            HeaderLine::StatementDate
        } else if text.contains(ACTIVITY_BANNER) || text.contains(POSITIONS_BANNER) {
            HeaderLine::SectionBanner
        } else if text.contains(SEGMENT_BANNER) {
            HeaderLine::SegmentBanner
        } else if p.is_column_titles(text) {
            HeaderLine::ColumnTitles
        } else {
            HeaderLine::Other
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub next: HeaderState,
    pub emit: bool,
    /// Line count of a header that ended on this line
    pub closed: Option<usize>,
}

impl HeaderState {
    pub fn step(self, line: HeaderLine) -> Step {
        match (self, line) {
            (HeaderState::Outside, HeaderLine::StatementDate) => Step {
                next: HeaderState::InHeader { count: 1 },
                emit: false,
                closed: None,
            },
            // the first page repeats the column titles below the header
            (HeaderState::Outside, HeaderLine::ColumnTitles) => Step {
                next: HeaderState::Outside,
                emit: false,
                closed: None,
            },
            (HeaderState::Outside, _) => Step {
                next: HeaderState::Outside,
                emit: true,
                closed: None,
            },
            // section banners sit above the column titles, inside the block
            (HeaderState::InHeader { count }, HeaderLine::SectionBanner) => Step {
                next: HeaderState::InHeader { count },
                emit: true,
                closed: None,
            },
            (HeaderState::InHeader { count }, HeaderLine::ColumnTitles) => Step {
                next: HeaderState::Outside,
                emit: false,
                closed: Some(count + 1),
            },
            // the sectionizer needs the segment banner to find the summary
            (HeaderState::InHeader { count }, HeaderLine::SegmentBanner) => Step {
                next: HeaderState::Outside,
                emit: true,
                closed: Some(count + 1),
            },
            (HeaderState::InHeader { count }, _) => Step {
                next: HeaderState::InHeader { count: count + 1 },
                emit: false,
                closed: None,
            },
        }
    }
}

/// Account and date as printed in the page headers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementHeader {
    pub account_id: Option<String>,
    pub statement_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct Stripped {
    pub lines: Vec<LineRecord>,
    pub header: StatementHeader,
}

/// Drop every page header, keeping the lines between them.
pub fn strip_headers(lines: Vec<LineRecord>, p: &LinePatterns) -> Result<Stripped> {
    let mut state = HeaderState::Outside;
    let mut header = StatementHeader::default();
    let mut kept = Vec::with_capacity(lines.len());
    let mut pages = 0usize;
    let statement = lines
        .first()
        .map(|l| l.statement_id.clone())
        .unwrap_or_default();

    for line in lines {
        if line.text.contains(STATEMENT_DATE_MARKER) {
            header.statement_date = Some(parse_statement_date(&line, p)?);
        }
        if line.text.contains(ACCOUNT_MARKER) {
            header.account_id = Some(parse_account(&line, p)?);
        }

        let step = state.step(HeaderLine::classify(&line.text, p));
        if let Some(count) = step.closed {
            if count != HEADER_LINES {
                return Err(StatementError::HeaderLength {
                    statement: line.statement_id.clone(),
                    count,
                    expected: HEADER_LINES,
                });
            }
            pages += 1;
        }
        state = step.next;
        if step.emit {
            kept.push(line);
        }
    }

    // a header cut off by the end of the file
    if let HeaderState::InHeader { count } = state {
        return Err(StatementError::HeaderLength {
            statement,
            count,
            expected: HEADER_LINES,
        });
    }

    debug!(pages, kept = kept.len(), "stripped page headers");
    Ok(Stripped {
        lines: kept,
        header,
    })
}

fn parse_statement_date(line: &LineRecord, p: &LinePatterns) -> Result<NaiveDate> {
    let caps = p.statement_date.captures(&line.text).ok_or_else(|| {
        StatementError::line(
            line.at(),
            format!(
                "statement date does not match MMM D, YYYY: {}",
                line.text.trim()
            ),
        )
    })?;
    let month = month_from_abbrev(&caps["month"]);
    let day = caps["day"].parse().ok();
    let year = caps["year"].parse().ok();
    match (year, month, day) {
        (Some(y), Some(m), Some(d)) => NaiveDate::from_ymd_opt(y, m, d),
        _ => None,
    }
    .ok_or_else(|| {
        StatementError::line(
            line.at(),
            format!("invalid statement date: {}", line.text.trim()),
        )
    })
}

fn parse_account(line: &LineRecord, p: &LinePatterns) -> Result<String> {
    let caps = p.account.captures(&line.text).ok_or_else(|| {
        StatementError::line(
            line.at(),
            format!(
                "account number does not match NNN VNNNN: {}",
                line.text.trim()
            ),
        )
    })?;
    Ok(format!("{}-{}", &caps["office"], &caps["acct"]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splitter::split_lines;

    fn page_header(banner: Option<&str>, filler: usize) -> Vec<String> {
        let mut out = vec![
            "                                                                      STATEMENT  DATE:  MAY 31, 2016".to_string(),
            "                                                                      ACCOUNT  NUMBER:  262 V8956".to_string(),
        ];
        for i in 0..filler {
            out.push(format!("     ADDRESS LINE {i}"));
        }
        if let Some(b) = banner {
            out.push(format!("                         {b}"));
        }
        out.push("   DATE            LONG/BUY  SHRT/SELL      DESCRIPTION           EX   PRICE/LEGND CC          DEBIT            CREDIT".to_string());
        out
    }

    fn lines(text: &[String]) -> Vec<LineRecord> {
        split_lines(text.join("\n").as_bytes(), "262-V8956", "stmt")
    }

    #[test]
    fn test_header_of_eleven_lines_is_removed() {
        let mut text = vec!["preamble".to_string()];
        text.extend(page_header(Some(ACTIVITY_BANNER), 8));
        text.push("  5/10/6   entry".to_string());
        let p = LinePatterns::new().unwrap();
        let out = strip_headers(lines(&text), &p).unwrap();

        let kept: Vec<_> = out.lines.iter().map(|l| l.text.trim()).collect();
        assert_eq!(kept, vec!["preamble", ACTIVITY_BANNER, "5/10/6   entry"]);
        assert_eq!(out.header.account_id.as_deref(), Some("262-V8956"));
        assert_eq!(out.header.statement_date, NaiveDate::from_ymd_opt(2016, 5, 31));
    }

    #[test]
    fn test_wrong_header_length_is_fatal() {
        let p = LinePatterns::new().unwrap();
        for filler in [7, 9] {
            let err = strip_headers(lines(&page_header(None, filler)), &p).unwrap_err();
            match err {
                StatementError::HeaderLength { count, expected, .. } => {
                    assert_eq!(expected, 11);
                    assert_eq!(count, filler + 3);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_header_cut_off_at_end_of_file_is_fatal() {
        let mut text = vec!["  5/10/6   entry".to_string()];
        text.extend(page_header(None, 8).into_iter().take(3));
        let p = LinePatterns::new().unwrap();
        let err = strip_headers(lines(&text), &p).unwrap_err();
        match err {
            StatementError::HeaderLength {
                statement,
                count,
                expected,
            } => {
                assert_eq!(statement, "stmt");
                assert_eq!(count, 3);
                assert_eq!(expected, 11);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_segment_banner_ends_header_and_is_kept() {
        let mut text = page_header(None, 8);
        let titles = text.pop().unwrap();
        text.push(format!("               {SEGMENT_BANNER}"));
        text.push("  1. BEGINNING ACCT BALANCE            90,122.69".to_string());
        text.push(titles);
        let p = LinePatterns::new().unwrap();
        let out = strip_headers(lines(&text), &p).unwrap();
        let kept: Vec<_> = out.lines.iter().map(|l| l.text.trim()).collect();
        // column titles outside a header are dropped too
        assert_eq!(kept, vec![SEGMENT_BANNER, "1. BEGINNING ACCT BALANCE            90,122.69"]);
    }

    #[test]
    fn test_transitions() {
        let s = HeaderState::Outside.step(HeaderLine::StatementDate);
        assert_eq!(s.next, HeaderState::InHeader { count: 1 });
        assert!(!s.emit);

        let s = HeaderState::InHeader { count: 4 }.step(HeaderLine::SectionBanner);
        assert_eq!(s.next, HeaderState::InHeader { count: 4 });
        assert!(s.emit);

        let s = HeaderState::InHeader { count: 10 }.step(HeaderLine::ColumnTitles);
        assert_eq!(s.next, HeaderState::Outside);
        assert_eq!(s.closed, Some(11));
        assert!(!s.emit);

        let s = HeaderState::InHeader { count: 10 }.step(HeaderLine::SegmentBanner);
        assert!(s.emit);
        assert_eq!(s.closed, Some(11));

        let s = HeaderState::Outside.step(HeaderLine::SegmentBanner);
        assert_eq!(s.next, HeaderState::Outside);
        assert!(s.emit);
    }

    #[test]
    fn test_malformed_account_line_is_fatal() {
        let p = LinePatterns::new().unwrap();
        let text = vec!["      ACCOUNT  NUMBER:  26 V89".to_string()];
        let err = strip_headers(lines(&text), &p).unwrap_err();
        assert!(err.to_string().contains("LINE 0"));
    }
}

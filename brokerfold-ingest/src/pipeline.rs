use brokerfold_core::{AggregateResult, Diagnostic, DiagnosticSink, Result, SectionCounts};
use std::path::Path;
use tracing::{debug, info};

use crate::estimate::estimate;
use crate::filename::{parse_statement_filename, StatementFile};
use crate::fixup::apply_fixups;
use crate::header::{strip_headers, StatementHeader};
use crate::parse::{parse_activity, parse_positions, parse_summary};
use crate::patterns::LinePatterns;
use crate::prune::prune;
use crate::sectionize::sectionize;
use crate::splitter::split_lines;

/// Everything one statement produced
#[derive(Debug, Clone)]
pub struct StatementResult {
    pub file: StatementFile,
    pub header: StatementHeader,
    pub records: AggregateResult,
}

impl From<StatementResult> for AggregateResult {
    fn from(result: StatementResult) -> Self {
        result.records
    }
}

/// Run every per-statement stage over the contents of one statement file.
///
/// `path` is only used for its file name, which carries the account and statement
/// date. Format violations abort with the offending line; data gaps go to `sink`.
pub fn process_statement(
    path: impl AsRef<Path>,
    bytes: &[u8],
    p: &LinePatterns,
    sink: &mut dyn DiagnosticSink,
) -> Result<StatementResult> {
    let file = parse_statement_filename(path, p)?;
    let lines = split_lines(bytes, &file.account_id, &file.statement_id);
    debug!(statement = %file.statement_id, lines = lines.len(), "split");

    let estimated = estimate(&lines, p);
    let stripped = strip_headers(lines, p)?;

    if let Some(from_header) = &stripped.header.account_id {
        if *from_header != file.account_id {
            sink.report(Diagnostic::AccountMismatch {
                statement: file.statement_id.clone(),
                from_filename: file.account_id.clone(),
                from_header: from_header.clone(),
            });
        }
    }

    let sections = prune(sectionize(stripped.lines).sections, p);
    let activity = parse_activity(&sections.activity, p)?;
    let positions = parse_positions(&sections.positions, p)?;
    let summary = parse_summary(&sections.summary)?;

    let parsed = SectionCounts {
        activity: activity.len(),
        positions: positions.len(),
        summary: summary.len(),
    };
    if parsed != estimated {
        sink.report(Diagnostic::EstimateMismatch {
            statement: file.statement_id.clone(),
            estimated,
            parsed,
        });
    }

    let activity = apply_fixups(&activity, &positions, sink)?;

    info!(
        statement = %file.statement_id,
        activity = activity.len(),
        positions = positions.len(),
        summary = summary.len(),
        "parsed statement"
    );
    Ok(StatementResult {
        file,
        header: stripped.header,
        records: AggregateResult {
            activity,
            positions,
            summary,
        },
    })
}

//! Fold of per-statement results into one aggregate.

use brokerfold_core::AggregateResult;
use tracing::debug;

/// Append `next` to `acc`.
///
/// Activity and positions are concatenated and stably sorted by date, so entries of
/// the same day keep the order their statements were folded in. Summary lines of the
/// same kind are summed across accounts; a kind seen for the first time is appended.
pub fn combine(acc: AggregateResult, next: AggregateResult) -> AggregateResult {
    let mut activity = acc.activity;
    activity.extend(next.activity);
    activity.sort_by_key(|r| r.date);

    let mut positions = acc.positions;
    positions.extend(next.positions);
    positions.sort_by_key(|r| r.date);

    let summary = next.summary.into_iter().fold(acc.summary, |mut summary, line| {
        match summary.iter_mut().find(|s| s.kind == line.kind) {
            Some(existing) => existing.amount += line.amount,
            None => summary.push(line),
        }
        summary
    });

    AggregateResult {
        activity,
        positions,
        summary,
    }
}

/// Fold results in the order given. Callers pass them sorted by statement file name.
pub fn combine_all(results: impl IntoIterator<Item = AggregateResult>) -> AggregateResult {
    let combined = results
        .into_iter()
        .fold(AggregateResult::default(), combine);
    debug!(
        activity = combined.activity.len(),
        positions = combined.positions.len(),
        summary = combined.summary.len(),
        "combined statements"
    );
    combined
}

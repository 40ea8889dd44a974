//! Drop everything in a section that is not one entry per line.

use brokerfold_core::{LineRecord, SectionBundle, SummaryKind};

use crate::patterns::{LinePatterns, MEMO_PNL, TRANSFER_TRADE};

pub fn prune(sections: SectionBundle, p: &LinePatterns) -> SectionBundle {
    let activity = mark_transfer_trades(sections.activity)
        .into_iter()
        .filter(|l| p.is_entry(&l.text))
        .filter(|l| !l.text.contains(MEMO_PNL))
        .collect();

    let positions = sections
        .positions
        .into_iter()
        .filter(|l| p.is_entry(&l.text))
        .collect();

    let summary = sections
        .summary
        .into_iter()
        .filter(|l| SummaryKind::ALL.iter().any(|k| l.text.contains(k.keyword())))
        .collect();

    SectionBundle {
        activity,
        positions,
        summary,
    }
}

//  4/27/6             4             PUT  DEC 16 LIVE CATTLE   1160  B     NET PREM  US      11,800.00
//                                   TRANSFER TRADE
/// Tag each line sitting directly above a `TRANSFER TRADE` line.
fn mark_transfer_trades(lines: Vec<LineRecord>) -> Vec<LineRecord> {
    let flags: Vec<bool> = lines
        .iter()
        .skip(1)
        .map(|next| next.text.contains(TRANSFER_TRADE))
        .chain(std::iter::once(false))
        .collect();

    lines
        .into_iter()
        .zip(flags)
        .map(|(line, above_transfer)| {
            if above_transfer {
                line.tagged_transfer_trade()
            } else {
                line
            }
        })
        .collect()
}

//! Split header-free lines into activity, positions and summary.

use brokerfold_core::{LineRecord, SectionBundle};
use tracing::debug;

use crate::patterns::{ACTIVITY_BANNER, POSITIONS_BANNER, SEGMENT_BANNER};

/// Which section the following lines belong to. Ordered: the machine only moves
/// forward, so a statement without activity goes straight from `Start` to `Positions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Section {
    Start,
    Activity,
    Positions,
    Summary,
}

impl Section {
    /// Section a banner line opens, if the line is a banner
    pub fn opened_by(text: &str) -> Option<Section> {
        if text.contains(ACTIVITY_BANNER) {
            Some(Section::Activity)
        } else if text.contains(POSITIONS_BANNER) {
            Some(Section::Positions)
        } else if text.contains(SEGMENT_BANNER) {
            Some(Section::Summary)
        } else {
            None
        }
    }

    pub fn after_banner(self, banner: Section) -> Section {
        self.max(banner)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Sectioned {
    pub sections: SectionBundle,
    /// Banners and pre-activity lines
    pub discarded: usize,
}

pub fn sectionize(lines: Vec<LineRecord>) -> Sectioned {
    let mut state = Section::Start;
    let mut out = Sectioned::default();

    for line in lines {
        if let Some(banner) = Section::opened_by(&line.text) {
            state = state.after_banner(banner);
            out.discarded += 1;
            continue;
        }
        match state {
            Section::Start => out.discarded += 1,
            Section::Activity => out.sections.activity.push(line),
            Section::Positions => out.sections.positions.push(line),
            Section::Summary => out.sections.summary.push(line),
        }
    }

    let counts = out.sections.counts();
    debug!(
        activity = counts.activity,
        positions = counts.positions,
        summary = counts.summary,
        discarded = out.discarded,
        "sectionized"
    );
    out
}

use brokerfold_core::{LineRecord, SectionCounts};

use crate::patterns::LinePatterns;
use crate::prune::prune;
use crate::sectionize::sectionize;

/// Expected number of entries per section, taken before page headers are stripped.
/// Header lines never look like entries, so a later disagreement with the parsed
/// counts means header stripping ate data.
pub fn estimate(lines: &[LineRecord], p: &LinePatterns) -> SectionCounts {
    prune(sectionize(lines.to_vec()).sections, p).counts()
}

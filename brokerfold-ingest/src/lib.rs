//! brokerfold-ingest: turns one fixed-layout ADMIS statement into typed records.
//!
//! Stages run in order: split, estimate, strip page headers, sectionize, prune, parse,
//! fix up futures. [`process_statement`] drives them for one file.

pub mod columns;
pub mod estimate;
pub mod filename;
pub mod fixup;
pub mod header;
pub mod parse;
pub mod patterns;
pub mod pipeline;
pub mod prune;
pub mod sectionize;
pub mod splitter;

pub use filename::{parse_statement_filename, StatementFile};
pub use header::{StatementHeader, HEADER_LINES};
pub use patterns::LinePatterns;
pub use pipeline::{process_statement, StatementResult};

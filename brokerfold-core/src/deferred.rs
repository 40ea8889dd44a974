//! Explicit marker for values resolved by a later pipeline stage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A value that is either known or intentionally left for a later stage to fill in.
///
/// Futures activity lines carry no quantity or valuation of their own; the fixup stage
/// resolves them from neighbouring lines and the position snapshot. When that lookup
/// fails the value stays `Unknown` all the way to the exported sheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "state", content = "value")]
pub enum Deferred<T> {
    Known(T),
    Unknown,
}

impl<T> Deferred<T> {
    pub fn known(&self) -> Option<&T> {
        match self {
            Deferred::Known(v) => Some(v),
            Deferred::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Deferred::Unknown)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Deferred<U> {
        match self {
            Deferred::Known(v) => Deferred::Known(f(v)),
            Deferred::Unknown => Deferred::Unknown,
        }
    }
}

impl<T: Copy> Deferred<T> {
    pub fn value(&self) -> Option<T> {
        self.known().copied()
    }
}

impl<T> From<Option<T>> for Deferred<T> {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => Deferred::Known(v),
            None => Deferred::Unknown,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deferred::Known(v) => v.fmt(f),
            Deferred::Unknown => f.write_str("UNKNOWN"),
        }
    }
}

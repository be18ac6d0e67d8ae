// crates/retag/src/diff.rs
// Line-by-line change report between two document versions

use crate::patch::Document;
use std::fmt;
use std::iter::{Enumerate, Zip};
use std::str::Lines;

/// One line position where the two documents differ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeRecord<'a> {
    /// 1-based line number
    pub line: usize,
    pub before: &'a str,
    pub after: &'a str,
}

impl fmt::Display for ChangeRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}:\n  - {}\n  + {}", self.line, self.before, self.after)
    }
}

/// Lazy iterator over differing line positions.
///
/// Stops at the end of the shorter document: extra trailing lines on either
/// side are never reported. Clone it to walk the sequence again.
#[derive(Clone)]
pub struct LineChanges<'a> {
    inner: Enumerate<Zip<Lines<'a>, Lines<'a>>>,
}

impl<'a> Iterator for LineChanges<'a> {
    type Item = ChangeRecord<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for (idx, (before, after)) in self.inner.by_ref() {
            if before != after {
                return Some(ChangeRecord {
                    line: idx + 1,
                    before,
                    after,
                });
            }
        }
        None
    }
}

/// Compare `original` and `updated` position by position
pub fn changes<'a>(original: &'a Document, updated: &'a Document) -> LineChanges<'a> {
    LineChanges {
        inner: original.lines().zip(updated.lines()).enumerate(),
    }
}

/// Render a change sequence for the operator
pub fn render_report<'a>(changes: impl IntoIterator<Item = ChangeRecord<'a>>) -> String {
    let lines: Vec<String> = changes.into_iter().map(|c| c.to_string()).collect();
    if lines.is_empty() {
        "No changes detected".to_string()
    } else {
        format!("Changes:\n{}", lines.join("\n"))
    }
}

//! Error interface for this crate.
//!
//! Every error in this crate implements [`Error`], which extends [`std::error::Error`]
//! with source spans and help messages. [`report`] renders such an error
//! against the source text it came from.
//!
//! This module also re-exports the errors of the other modules:
//! - [`LexErr`] (tokenizing a line)
//! - [`ParseErr`] (classifying a line)
//! - [`AsmErr`] (assembling a program)
//! - [`FileErr`] (reading and writing programs)

use std::borrow::Cow;
use std::fmt::Write as _;
use std::ops::Range;

pub use crate::asm::{AsmErr, AsmErrKind};
pub use crate::file::FileErr;
pub use crate::parse::lex::LexErr;
pub use crate::parse::{ParseErr, ParseErrKind, SourceInfo};

/// Unified error interface for all errors in this crate.
pub trait Error: std::error::Error {
    /// The range in source this error occurred at, if known.
    fn span(&self) -> Option<ErrSpan> {
        None
    }

    /// A help message for this error, if there is one.
    fn help(&self) -> Option<Cow<str>> {
        None
    }
}

/// One or more ranges in source that an error is associated with.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum ErrSpan {
    /// One contiguous range.
    One(Range<usize>),
    /// Two ranges (e.g., both declarations of a conflicting symbol).
    Two([Range<usize>; 2]),
    /// Any number of ranges.
    Many(Vec<Range<usize>>)
}
impl ErrSpan {
    /// Gets the first range of this span (if there is one).
    pub fn first(&self) -> Option<Range<usize>> {
        self.iter().next().cloned()
    }

    /// Gets an iterator over all ranges of this span.
    pub fn iter(&self) -> impl Iterator<Item=&Range<usize>> + '_ {
        match self {
            ErrSpan::One(r)  => std::slice::from_ref(r).iter(),
            ErrSpan::Two(r)  => r.iter(),
            ErrSpan::Many(r) => r.iter(),
        }
    }
}
impl From<Range<usize>> for ErrSpan {
    fn from(value: Range<usize>) -> Self {
        ErrSpan::One(value)
    }
}
impl<const N: usize> From<[Range<usize>; N]> for ErrSpan {
    fn from(value: [Range<usize>; N]) -> Self {
        match <[_; 2]>::try_from(value.to_vec()) {
            Ok(pair) => ErrSpan::Two(pair),
            Err(mut ranges) if ranges.len() == 1 => ErrSpan::One(ranges.remove(0)),
            Err(ranges) => ErrSpan::Many(ranges),
        }
    }
}
impl From<Vec<Range<usize>>> for ErrSpan {
    fn from(value: Vec<Range<usize>>) -> Self {
        ErrSpan::Many(value)
    }
}

/// Renders an error against the source it was raised from.
///
/// Each range in the error's span is shown with its line and column number (1-indexed)
/// and the contents of its line, followed by the help message (if any).
///
/// ## Example
/// ```
/// use hack_asm::asm::assemble;
/// use hack_asm::err::{report, SourceInfo};
///
/// let src = "(LOOP)\n@1\n(LOOP)\n0;JMP";
/// let err = assemble(src).unwrap_err();
///
/// let report = report(&err, &SourceInfo::new(src));
/// assert!(report.starts_with("error: symbol was bound to multiple addresses"));
/// assert!(report.contains("3:1 | (LOOP)"));
/// ```
pub fn report(err: &dyn Error, src: &SourceInfo) -> String {
    let mut out = format!("error: {err}\n");

    for range in err.span().iter().flat_map(ErrSpan::iter) {
        let (lno, cno) = src.get_pos_pair(range.start);
        let line = src.read_line(lno).unwrap_or("");
        // Writing into a String cannot fail.
        let _ = writeln!(out, "  --> {}:{} | {line}", lno + 1, cno + 1);
    }
    if let Some(help) = err.help() {
        let _ = writeln!(out, "  = help: {help}");
    }

    out
}

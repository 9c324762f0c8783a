//! Classifying Hack assembly source lines into statements.
//!
//! The module's key data structure is the [`LineCursor`], a forward-only,
//! restartable sequence of classified statements ([`Stmt`]) over a source text.
//! The assembler walks it once per pass, resetting it in between.
//!
//! ```
//! use hack_asm::parse::LineCursor;
//! use hack_asm::ast::{Instr, Operand};
//!
//! let mut cursor = LineCursor::new("
//!     // Adds 2 and 3.
//!     @2
//!     D=A  // D = 2
//! ");
//! assert!(cursor.has_more());
//! assert_eq!(cursor.advance().unwrap().nucleus, Instr::Addr(Operand::Literal(2)));
//! assert!(cursor.has_more());
//! cursor.advance().unwrap();
//! assert!(!cursor.has_more());
//!
//! cursor.reset();
//! assert_eq!(cursor.count(), 2);
//! ```

pub mod lex;

use std::ops::Range;

use logos::Logos;

use crate::ast::{CompInstr, Instr, Operand, Stmt};
use crate::err::ErrSpan;
use lex::{LexErr, Token};

/// Kinds of errors that can occur from classifying a source line.
///
/// Apart from [`LexErr::DoesNotFitAddr`] on an A-instruction operand,
/// these are only raised by a strict cursor (see [`LineCursor::strict`]).
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ParseErrKind {
    /// The line could not be tokenized.
    Lex(LexErr),
    /// A label declaration is missing its closing parenthesis.
    UnclosedLabel,
    /// A label declaration has no name.
    EmptyLabel,
    /// An A-instruction has no operand.
    EmptyOperand,
}
impl std::fmt::Display for ParseErrKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lex(e)        => e.fmt(f),
            Self::UnclosedLabel => f.write_str("unclosed label declaration"),
            Self::EmptyLabel    => f.write_str("label declaration has no name"),
            Self::EmptyOperand  => f.write_str("A-instruction has no operand"),
        }
    }
}
impl ParseErrKind {
    pub(crate) fn help(&self) -> Option<std::borrow::Cow<str>> {
        match self {
            Self::Lex(e)        => crate::err::Error::help(e),
            Self::UnclosedLabel => Some("add a ')' to the end of the label".into()),
            Self::EmptyLabel    => Some("a label declaration looks like (NAME)".into()),
            Self::EmptyOperand  => Some("add a number or a symbol after the '@'".into()),
        }
    }
}

/// Error from classifying a source line.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ParseErr {
    /// The kind of error.
    pub kind: ParseErrKind,
    /// The span in the source associated with this error.
    pub span: ErrSpan
}
impl ParseErr {
    /// Creates a new [`ParseErr`].
    pub fn new<E: Into<ErrSpan>>(kind: ParseErrKind, span: E) -> Self {
        ParseErr { kind, span: span.into() }
    }
}
impl std::fmt::Display for ParseErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.kind.fmt(f)
    }
}
impl std::error::Error for ParseErr {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ParseErrKind::Lex(e) => Some(e),
            _ => None
        }
    }
}
impl crate::err::Error for ParseErr {
    fn span(&self) -> Option<ErrSpan> {
        Some(self.span.clone())
    }

    fn help(&self) -> Option<std::borrow::Cow<str>> {
        self.kind.help()
    }
}

/// Struct holding the source string and contains helpers
/// to index lines and to query position information from a source string.
#[derive(PartialEq, Eq, Clone)]
pub struct SourceInfo {
    /// The source code.
    src: String,
    /// The index of each new line in source code.
    nl_indices: Vec<usize>
}
impl std::fmt::Debug for SourceInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceInfo")
            .field("nl_indices", &self.nl_indices)
            .finish_non_exhaustive()
    }
}
impl SourceInfo {
    /// Computes the source info from a given string.
    pub fn new(src: &str) -> Self {
        Self::from_string(src.to_string())
    }
    fn from_string(src: String) -> Self {
        // Index where each new line appears.
        let nl_indices: Vec<_> = src
            .match_indices('\n')
            .map(|(i, _)| i)
            .chain([src.len()])
            .collect();

        Self { src, nl_indices }
    }

    /// Returns the entire source.
    pub fn source(&self) -> &str {
        &self.src
    }

    /// Counts the number of lines in the source string.
    pub fn count_lines(&self) -> usize {
        self.nl_indices.len()
    }

    /// Gets the character range for the provided line, excluding the newline character.
    ///
    /// This returns None if line is not in the interval `[0, number of lines)`.
    fn raw_line_span(&self, line: usize) -> Option<Range<usize>> {
        let end = *self.nl_indices.get(line)?;
        let start = match line {
            0 => 0,
            _ => self.nl_indices[line - 1] + 1
        };

        Some(start..end)
    }

    /// Gets the character range for the provided line, excluding any whitespace.
    ///
    /// This returns None if line is not in the interval `[0, number of lines)`.
    pub fn line_span(&self, line: usize) -> Option<Range<usize>> {
        let Range { mut start, mut end } = self.raw_line_span(line)?;

        // shift line span by trim
        let line = &self.src[start..end];
        let end_trimmed = line.trim_end();
        end -= line.len() - end_trimmed.len();

        let line = end_trimmed;
        start += line.len() - line.trim_start().len();

        Some(start..end)
    }

    /// Reads a line from source.
    ///
    /// This returns None if line is not in the interval `[0, number of lines)`.
    pub fn read_line(&self, line: usize) -> Option<&str> {
        self.line_span(line).map(|r| &self.src[r])
    }

    /// Gets the line number of the current position.
    fn get_line(&self, index: usize) -> usize {
        self.nl_indices.partition_point(|&start| start < index)
    }

    /// Calculates the line and character number for a given character index.
    ///
    /// If the index exceeds the length of the string,
    /// the line number is given as the last line and the character number
    /// is given as the number of characters after the start of the line.
    pub fn get_pos_pair(&self, index: usize) -> (usize, usize) {
        let lno = self.get_line(index).min(self.count_lines() - 1);

        let Range { start: lstart, .. } = self.raw_line_span(lno)
            .unwrap_or(0..0);
        let cno = index.saturating_sub(lstart);
        (lno, cno)
    }
}
impl From<&'_ str> for SourceInfo {
    fn from(value: &'_ str) -> Self {
        Self::new(value)
    }
}
impl From<String> for SourceInfo {
    fn from(value: String) -> Self {
        Self::from_string(value)
    }
}

/// Gets the span of a line once its comment is removed, excluding surrounding whitespace.
///
/// This is `None` if nothing remains (a blank or comment-only line).
fn code_span(src: &SourceInfo, line: usize) -> Option<Range<usize>> {
    let Range { start, end } = src.line_span(line)?;
    let text = &src.src[start..end];
    let code = text.split_once("//").map_or(text, |(code, _)| code).trim_end();

    (!code.is_empty()).then(|| start..(start + code.len()))
}

/// A cursor over the statements of a Hack assembly source.
///
/// Blank lines and comments are skipped; every other line is classified
/// into a [`Stmt`] when it is advanced to. The cursor is restartable with [`LineCursor::reset`].
///
/// By default, classification is permissive: a line that is not a label or
/// an A-instruction is a C-instruction, whatever its contents.
/// A strict cursor (see [`LineCursor::strict`]) rejects malformed lines instead.
#[derive(Debug, Clone)]
pub struct LineCursor {
    src: SourceInfo,
    /// The physical line index of the next unconsumed statement, if one exists.
    next_line: Option<usize>,
    /// The most recently advanced-to statement.
    current: Option<Stmt>,
    strict: bool,
}

impl LineCursor {
    /// Creates a new permissive cursor, positioned before the first statement.
    pub fn new(src: &str) -> Self {
        Self::from_source(SourceInfo::new(src), false)
    }

    /// Creates a new strict cursor, positioned before the first statement.
    ///
    /// A strict cursor fails to classify lines which contain characters not in
    /// Hack assembly, unclosed or empty labels, and A-instructions without operands.
    pub fn strict(src: &str) -> Self {
        Self::from_source(SourceInfo::new(src), true)
    }

    pub(crate) fn from_source(src: SourceInfo, strict: bool) -> Self {
        let mut cursor = Self { src, next_line: None, current: None, strict };
        cursor.reset();
        cursor
    }

    /// The source this cursor reads.
    pub fn source_info(&self) -> &SourceInfo {
        &self.src
    }

    /// Rewinds the cursor to the first statement.
    pub fn reset(&mut self) {
        self.current = None;
        self.next_line = self.find_code(0);
    }

    fn find_code(&self, from: usize) -> Option<usize> {
        (from..self.src.count_lines())
            .find(|&l| code_span(&self.src, l).is_some())
    }

    /// Whether there is a statement left to advance to.
    pub fn has_more(&self) -> bool {
        self.next_line.is_some()
    }

    /// Consumes and classifies the next statement.
    ///
    /// # Panics
    ///
    /// This panics if there are no statements left (i.e., [`LineCursor::has_more`] is false).
    pub fn advance(&mut self) -> Result<&Stmt, ParseErr> {
        let Some(line) = self.next_line else {
            panic!("advance called on exhausted line cursor");
        };
        self.next_line = self.find_code(line + 1);

        self.current = None;

        let Some(span) = code_span(&self.src, line) else {
            unreachable!("next line should have had code");
        };
        let nucleus = classify(&self.src.src[span.clone()], span.start, self.strict)?;

        Ok(self.current.insert(Stmt { nucleus, span }))
    }

    /// The most recently advanced-to statement.
    ///
    /// This is `None` if the cursor was just created or reset,
    /// or if the last call to [`LineCursor::advance`] failed.
    pub fn current(&self) -> Option<&Stmt> {
        self.current.as_ref()
    }
}
impl Iterator for LineCursor {
    type Item = Result<Stmt, ParseErr>;

    fn next(&mut self) -> Option<Self::Item> {
        self.has_more()
            .then(|| self.advance().cloned())
    }
}

/// Classifies one line of code (comment and surrounding whitespace removed).
///
/// `offset` is the index of the line in source, used to position errors.
fn classify(line: &str, offset: usize, strict: bool) -> Result<Instr, ParseErr> {
    let shift = |span: &Range<usize>| (span.start + offset)..(span.end + offset);
    let tokens: Vec<_> = Token::lexer(line)
        .spanned()
        .take_while(|(t, _)| t != &Ok(Token::Comment))
        .collect();

    if strict {
        if let Some((Err(e), span)) = tokens.iter().find(|(t, _)| t.is_err()) {
            return Err(ParseErr::new(ParseErrKind::Lex(*e), shift(span)));
        }
    }

    // Rebuilds the text covered by the tokens, dropping any whitespace between them.
    let text = |toks: &[(Result<Token, LexErr>, Range<usize>)]| -> String {
        toks.iter()
            .map(|(_, span)| &line[span.clone()])
            .collect()
    };
    let line_span = offset..(offset + line.len());

    match tokens.split_first() {
        Some(((Ok(Token::LParen), _), rest)) => {
            let inner = match rest.split_last() {
                Some(((Ok(Token::RParen), _), inner)) => inner,
                _ if strict => return Err(ParseErr::new(ParseErrKind::UnclosedLabel, line_span)),
                _ => rest,
            };
            if strict && inner.is_empty() {
                return Err(ParseErr::new(ParseErrKind::EmptyLabel, line_span));
            }

            Ok(Instr::Label(text(inner)))
        },
        Some(((Ok(Token::At), _), rest)) => match rest {
            [(Ok(Token::Unsigned(n)), _)] => Ok(Instr::Addr(Operand::Literal(*n))),
            [(Err(e @ LexErr::DoesNotFitAddr), span)] => Err(ParseErr::new(ParseErrKind::Lex(*e), shift(span))),
            [] if strict => Err(ParseErr::new(ParseErrKind::EmptyOperand, line_span)),
            _ => Ok(Instr::Addr(Operand::Symbol(text(rest)))),
        },
        _ => {
            let position = |toks: &[(Result<Token, LexErr>, Range<usize>)], tok: Token| {
                toks.iter().position(|(t, _)| t == &Ok(tok))
            };

            let (body, jump) = match position(&tokens[..], Token::Semicolon) {
                Some(i) => (&tokens[..i], Some(text(&tokens[(i + 1)..]))),
                None    => (&tokens[..], None),
            };
            let (dest, comp) = match position(body, Token::Equals) {
                Some(i) => (Some(text(&body[..i])), text(&body[(i + 1)..])),
                None    => (None, text(body)),
            };

            Ok(Instr::Comp(CompInstr { dest, comp, jump }))
        }
    }
}

//! Tokenizing Hack assembly.
//!
//! This module holds the tokens that characterize a line of Hack assembly ([`Token`]).
//! The [`LineCursor`] uses it to classify each source line into a statement.
//!
//! Tokens carry no text. Symbols and mnemonics are recovered from the token spans,
//! which lets the classifier rebuild an operand or mnemonic with all whitespace removed.
//!
//! [`LineCursor`]: crate::parse::LineCursor

use logos::{Lexer, Logos};

use crate::ast::ADDR_MAX;

/// A unit of information in a line of Hack source code.
#[derive(Debug, Logos, PartialEq, Eq, Clone, Copy)]
#[logos(skip r"[ \t\r\f]+", error = LexErr)]
pub enum Token {
    // Numbers have to fit the 15-bit address space of an A-instruction.
    // `0` and `1` in computations (e.g., `D=0`, `M=M+1`) also lex as this token,
    // and are always small enough.

    /// A decimal literal (e.g., `0`, `21`, `32767`).
    #[regex(r"[0-9]+", lex_unsigned)]
    Unsigned(u16),

    /// A symbol or a register mnemonic (e.g., `LOOP`, `R13`, `sys.init$ret.0`, `AMD`, `JGT`).
    #[regex(r"[A-Za-z_.$:][A-Za-z0-9_.$:]*")]
    Symbol,

    /// An ALU operator (`-`, `+`, `!`, `&`, `|`).
    #[regex(r"[-+!&|]")]
    Op,

    /// The start of an A-instruction.
    #[token("@")]
    At,

    /// The start of a label declaration.
    #[token("(")]
    LParen,

    /// The end of a label declaration.
    #[token(")")]
    RParen,

    /// Separates the destination from the computation.
    #[token("=")]
    Equals,

    /// Separates the computation from the jump.
    #[token(";")]
    Semicolon,

    /// A comment, which starts with `//` and spans the remaining part of the line.
    #[regex(r"//[^\n]*")]
    Comment,
}

/// Any errors raised in attempting to tokenize a line.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub enum LexErr {
    /// Numeric literal cannot fit within the 15-bit address space
    DoesNotFitAddr,
    /// A symbol was used which is not allowed in Hack assembly files
    #[default]
    InvalidSymbol
}
impl std::fmt::Display for LexErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexErr::DoesNotFitAddr => f.write_str("numeric token does not fit 15-bit address"),
            LexErr::InvalidSymbol  => f.write_str("unrecognized symbol"),
        }
    }
}
impl std::error::Error for LexErr {}
impl crate::err::Error for LexErr {
    fn help(&self) -> Option<std::borrow::Cow<str>> {
        match self {
            LexErr::DoesNotFitAddr => Some(format!("the range for an address is [0, {ADDR_MAX}]").into()),
            LexErr::InvalidSymbol  => Some("this char does not occur in any token in Hack assembly".into()),
        }
    }
}

fn lex_unsigned(lx: &Lexer<'_, Token>) -> Result<u16, LexErr> {
    // Only digits are matched, so overflow is the only way parsing can fail.
    lx.slice().parse::<u16>().ok()
        .filter(|&n| n <= ADDR_MAX)
        .ok_or(LexErr::DoesNotFitAddr)
}

#[cfg(test)]
mod tests {
    use logos::Logos;

    use crate::err::LexErr;
    use crate::parse::lex::Token;

    fn tokens(s: &str) -> Vec<Result<Token, LexErr>> {
        Token::lexer(s).collect()
    }

    #[test]
    fn test_numeric_success() {
        let mut lx = Token::lexer("0 123 456 789 007");
        assert_eq!(lx.next(), Some(Ok(Token::Unsigned(0))));
        assert_eq!(lx.next(), Some(Ok(Token::Unsigned(123))));
        assert_eq!(lx.next(), Some(Ok(Token::Unsigned(456))));
        assert_eq!(lx.next(), Some(Ok(Token::Unsigned(789))));
        assert_eq!(lx.next(), Some(Ok(Token::Unsigned(7))));
        assert_eq!(lx.next(), None);
    }

    #[test]
    fn test_numeric_overflow() {
        let mut lx = Token::lexer("32767 16384 24576");
        assert_eq!(lx.next(), Some(Ok(Token::Unsigned(32767))));
        assert_eq!(lx.next(), Some(Ok(Token::Unsigned(16384))));
        assert_eq!(lx.next(), Some(Ok(Token::Unsigned(24576))));
        assert_eq!(lx.next(), None);

        assert_eq!(Token::lexer("32768").next(), Some(Err(LexErr::DoesNotFitAddr)));
        assert_eq!(Token::lexer("65535").next(), Some(Err(LexErr::DoesNotFitAddr)));
        assert_eq!(Token::lexer("65536").next(), Some(Err(LexErr::DoesNotFitAddr)));
        assert_eq!(Token::lexer("999999999999999999999999999999").next(), Some(Err(LexErr::DoesNotFitAddr)));
    }

    #[test]
    fn test_symbols() {
        let mut lx = Token::lexer("LOOP R13 sys.init$ret.0 _ a:b AMD");
        for _ in 0..6 {
            assert_eq!(lx.next(), Some(Ok(Token::Symbol)));
        }
        assert_eq!(lx.next(), None);

        // A leading digit splits into a number and a symbol:
        assert_eq!(tokens("2abc"), [Ok(Token::Unsigned(2)), Ok(Token::Symbol)]);
    }

    #[test]
    fn test_instruction_shapes() {
        assert_eq!(tokens("@LOOP"), [Ok(Token::At), Ok(Token::Symbol)]);
        assert_eq!(tokens("@21"), [Ok(Token::At), Ok(Token::Unsigned(21))]);
        assert_eq!(tokens("(END)"), [Ok(Token::LParen), Ok(Token::Symbol), Ok(Token::RParen)]);
        assert_eq!(tokens("AM=M-1;JNE"), [
            Ok(Token::Symbol),
            Ok(Token::Equals),
            Ok(Token::Symbol),
            Ok(Token::Op),
            Ok(Token::Unsigned(1)),
            Ok(Token::Semicolon),
            Ok(Token::Symbol),
        ]);
        assert_eq!(tokens("0;JMP"), [Ok(Token::Unsigned(0)), Ok(Token::Semicolon), Ok(Token::Symbol)]);
        assert_eq!(tokens("D=!A"), [Ok(Token::Symbol), Ok(Token::Equals), Ok(Token::Op), Ok(Token::Symbol)]);
    }

    #[test]
    fn test_whitespace_and_comments() {
        assert_eq!(tokens("  D = D + A\t\r"), [
            Ok(Token::Symbol),
            Ok(Token::Equals),
            Ok(Token::Symbol),
            Ok(Token::Op),
            Ok(Token::Symbol),
        ]);
        assert_eq!(tokens("// only a comment"), [Ok(Token::Comment)]);
        assert_eq!(tokens("@i // i = 0"), [Ok(Token::At), Ok(Token::Symbol), Ok(Token::Comment)]);
    }

    #[test]
    fn test_invalid_symbol() {
        for c in ['#', '%', '^', '*', '/', '"', '\'', ',', '<', '>', '?', '[', ']', '{', '}', '~', '`', '\\'] {
            let string = c.to_string();
            assert_eq!(
                Token::lexer(&string).next(),
                Some(Err(LexErr::InvalidSymbol)),
                "Expected {string:?} to be an invalid symbol"
            );
        }
    }
}

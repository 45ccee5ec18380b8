use thiserror::Error;

use crate::ast::File;
use crate::parser::ParseMode;
use crate::position::Position;

#[derive(Debug, Error, Clone, PartialEq, Eq, Default)]
pub enum LexErrorKind {
    #[default]
    #[error("invalid token")]
    InvalidToken,
    #[error("unknown character {0:?}")]
    UnknownCharacter(char),
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unclosed comment")]
    UnclosedComment,
    #[error("invalid escape sequence")]
    InvalidEscape,
    #[error("rune literal must contain exactly one character")]
    InvalidRune,
    #[error("'_' must separate successive digits")]
    MisplacedSeparator,
    #[error("invalid digit {digit:?} in {base} literal")]
    InvalidDigit { digit: char, base: &'static str },
    #[error("{0} literal has no digits")]
    MissingDigits(&'static str),
    #[error("exponent has no digits")]
    MissingExponent,
    #[error("hexadecimal mantissa requires a 'p' exponent")]
    MissingHexExponent,
}

impl LexErrorKind {
    /// Errors detected where scanning stopped rather than where the lexeme began.
    #[inline]
    pub(crate) const fn reported_at_end(&self) -> bool {
        matches!(self, Self::UnterminatedString | Self::UnclosedComment)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{pos} LexError: {kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub pos: Position,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{pos} ParseError: {message}")]
pub struct ParseError {
    pub message: String,
    pub pos: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagKind {
    Lex,
    Parse,
}

/// A collected, non-fatal diagnostic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Diag {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Diag {
    #[inline]
    pub fn kind(&self) -> DiagKind {
        match self {
            Diag::Lex(_) => DiagKind::Lex,
            Diag::Parse(_) => DiagKind::Parse,
        }
    }

    #[inline]
    pub fn pos(&self) -> &Position {
        match self {
            Diag::Lex(e) => &e.pos,
            Diag::Parse(e) => &e.pos,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Diag::Lex(e) => e.kind.to_string(),
            Diag::Parse(e) => e.message.clone(),
        }
    }
}

/// A smart constructor refused to build an ill-shaped node.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct InvalidNode(pub String);

impl InvalidNode {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// An entry point was called on a parser built for the other mode.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("parser was configured for {configured:?} mode, cannot parse in {requested:?} mode")]
pub struct ParseModeError {
    pub configured: ParseMode,
    pub requested: ParseMode,
}

#[derive(Debug, Error)]
#[error("parsing failed with {} diagnostic(s)", .diags.len())]
pub struct ParseFailure {
    pub partial: Option<File>,
    pub diags: Vec<Diag>,
}

use std::fmt;

use crate::position::Position;

/// Terminal kinds produced by the lexer.
///
/// Payload-carrying kinds (identifiers, literals, comments) keep their text in
/// [`Lexeme::literal`]; every other kind is fully described by its variant.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[rustfmt::skip]
pub enum Token {
    // Identifiers and basic literals
    Ident, IntLit, FloatLit, ImagLit, RuneLit, StringLit, RawStringLit,

    // Keywords
    KwBreak, KwCase, KwChan, KwConst, KwContinue, KwDefault, KwDefer, KwElse,
    KwFallthrough, KwFor, KwFunc, KwGo, KwGoto, KwIf, KwImport, KwInterface,
    KwMap, KwPackage, KwRange, KwReturn, KwSelect, KwStruct, KwSwitch, KwType, KwVar,

    // Arithmetic and bitwise operators
    Plus, Minus, Star, Slash, Percent,
    Amp, Pipe, Caret, Shl, Shr, AndNot,

    // Assignment operators
    AddAssign, SubAssign, MulAssign, DivAssign, ModAssign,
    AndAssign, OrAssign, XorAssign, ShlAssign, ShrAssign, AndNotAssign,

    // Logical and comparison operators
    LAnd, LOr, Bang,
    EqEq, NotEq, Lt, Le, Gt, Ge,

    // Other operators
    Assign, Define, Inc, Dec, Arrow, Ellipsis, Tilde,

    // Punctuation
    LParen, RParen, LBrack, RBrack, LBrace, RBrace,
    Semi, Colon, Comma, Dot,

    // Trivia kept in the stream
    LineComment, BlockComment,

    Eof,
}

impl Token {
    /// Maps a word to its keyword token.
    pub fn keyword(word: &str) -> Option<Token> {
        use Token::*;
        let tok = match word {
            "break" => KwBreak,
            "case" => KwCase,
            "chan" => KwChan,
            "const" => KwConst,
            "continue" => KwContinue,
            "default" => KwDefault,
            "defer" => KwDefer,
            "else" => KwElse,
            "fallthrough" => KwFallthrough,
            "for" => KwFor,
            "func" => KwFunc,
            "go" => KwGo,
            "goto" => KwGoto,
            "if" => KwIf,
            "import" => KwImport,
            "interface" => KwInterface,
            "map" => KwMap,
            "package" => KwPackage,
            "range" => KwRange,
            "return" => KwReturn,
            "select" => KwSelect,
            "struct" => KwStruct,
            "switch" => KwSwitch,
            "type" => KwType,
            "var" => KwVar,
            _ => return None,
        };
        Some(tok)
    }

    #[inline]
    pub const fn is_keyword(self) -> bool {
        (self as u8) >= (Token::KwBreak as u8) && (self as u8) <= (Token::KwVar as u8)
    }

    /// Operators and punctuation.
    #[inline]
    pub const fn is_operator(self) -> bool {
        (self as u8) >= (Token::Plus as u8) && (self as u8) <= (Token::Dot as u8)
    }

    /// Identifiers and basic literals, i.e. kinds that carry source text.
    #[inline]
    pub const fn is_literal(self) -> bool {
        (self as u8) <= (Token::RawStringLit as u8)
    }

    #[inline]
    pub const fn is_comment(self) -> bool {
        matches!(self, Token::LineComment | Token::BlockComment)
    }

    /// Whether a newline after this token inserts a semicolon.
    #[inline]
    pub const fn ends_statement(self) -> bool {
        matches!(
            self,
            Token::Ident
                | Token::IntLit
                | Token::FloatLit
                | Token::ImagLit
                | Token::RuneLit
                | Token::StringLit
                | Token::RawStringLit
                | Token::KwBreak
                | Token::KwContinue
                | Token::KwFallthrough
                | Token::KwReturn
                | Token::Inc
                | Token::Dec
                | Token::RParen
                | Token::RBrack
                | Token::RBrace
        )
    }

    #[inline]
    pub const fn is_assign_op(self) -> bool {
        matches!(
            self,
            Token::Assign
                | Token::AddAssign
                | Token::SubAssign
                | Token::MulAssign
                | Token::DivAssign
                | Token::ModAssign
                | Token::AndAssign
                | Token::OrAssign
                | Token::XorAssign
                | Token::ShlAssign
                | Token::ShrAssign
                | Token::AndNotAssign
        )
    }

    #[inline]
    pub const fn is_unary_op(self) -> bool {
        matches!(
            self,
            Token::Plus
                | Token::Minus
                | Token::Bang
                | Token::Caret
                | Token::Star
                | Token::Amp
                | Token::Arrow
        )
    }

    /// Binding strength as a binary operator; [`Precedence::None`] otherwise.
    #[inline]
    pub const fn precedence(self) -> Precedence {
        match self {
            Token::LOr => Precedence::Or,
            Token::LAnd => Precedence::And,
            Token::EqEq | Token::NotEq | Token::Lt | Token::Le | Token::Gt | Token::Ge => {
                Precedence::Equality
            }
            Token::Plus | Token::Minus | Token::Pipe | Token::Caret => Precedence::Term,
            Token::Star
            | Token::Slash
            | Token::Percent
            | Token::Shl
            | Token::Shr
            | Token::Amp
            | Token::AndNot => Precedence::Factor,
            _ => Precedence::None,
        }
    }

    /// Source spelling for fixed tokens, a category name otherwise.
    pub const fn as_str(self) -> &'static str {
        use Token::*;
        match self {
            Ident => "identifier",
            IntLit => "integer literal",
            FloatLit => "float literal",
            ImagLit => "imaginary literal",
            RuneLit => "rune literal",
            StringLit | RawStringLit => "string literal",

            KwBreak => "break",
            KwCase => "case",
            KwChan => "chan",
            KwConst => "const",
            KwContinue => "continue",
            KwDefault => "default",
            KwDefer => "defer",
            KwElse => "else",
            KwFallthrough => "fallthrough",
            KwFor => "for",
            KwFunc => "func",
            KwGo => "go",
            KwGoto => "goto",
            KwIf => "if",
            KwImport => "import",
            KwInterface => "interface",
            KwMap => "map",
            KwPackage => "package",
            KwRange => "range",
            KwReturn => "return",
            KwSelect => "select",
            KwStruct => "struct",
            KwSwitch => "switch",
            KwType => "type",
            KwVar => "var",

            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Percent => "%",
            Amp => "&",
            Pipe => "|",
            Caret => "^",
            Shl => "<<",
            Shr => ">>",
            AndNot => "&^",
            AddAssign => "+=",
            SubAssign => "-=",
            MulAssign => "*=",
            DivAssign => "/=",
            ModAssign => "%=",
            AndAssign => "&=",
            OrAssign => "|=",
            XorAssign => "^=",
            ShlAssign => "<<=",
            ShrAssign => ">>=",
            AndNotAssign => "&^=",
            LAnd => "&&",
            LOr => "||",
            Bang => "!",
            EqEq => "==",
            NotEq => "!=",
            Lt => "<",
            Le => "<=",
            Gt => ">",
            Ge => ">=",
            Assign => "=",
            Define => ":=",
            Inc => "++",
            Dec => "--",
            Arrow => "<-",
            Ellipsis => "...",
            Tilde => "~",
            LParen => "(",
            RParen => ")",
            LBrack => "[",
            RBrack => "]",
            LBrace => "{",
            RBrace => "}",
            Semi => ";",
            Colon => ":",
            Comma => ",",
            Dot => ".",

            LineComment | BlockComment => "comment",
            Eof => "EOF",
        }
    }
}

/// Renders keywords and operators quoted (`"func"`, `"}"`) and the other
/// kinds by category (`identifier`, `EOF`), which reads well in messages.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_keyword() || self.is_operator() {
            write!(f, "\"{}\"", self.as_str())
        } else {
            f.write_str(self.as_str())
        }
    }
}

/// Binary operator binding levels, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    None,
    Or,
    And,
    Equality,
    Term,
    Factor,
    Unary,
}

impl Precedence {
    #[inline]
    pub const fn next(self) -> Precedence {
        match self {
            Precedence::None => Precedence::Or,
            Precedence::Or => Precedence::And,
            Precedence::And => Precedence::Equality,
            Precedence::Equality => Precedence::Term,
            Precedence::Term => Precedence::Factor,
            Precedence::Factor | Precedence::Unary => Precedence::Unary,
        }
    }
}

/// One classified unit of source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub token: Token,
    pub pos: Position,
    pub literal: Option<String>,
}

impl Lexeme {
    #[inline]
    pub fn new(token: Token, pos: Position) -> Self {
        Self {
            token,
            pos,
            literal: None,
        }
    }

    #[inline]
    pub fn with_literal(token: Token, pos: Position, literal: impl Into<String>) -> Self {
        Self {
            token,
            pos,
            literal: Some(literal.into()),
        }
    }

    /// Literal text, or the fixed spelling for tokens without a payload.
    pub fn text(&self) -> &str {
        self.literal.as_deref().unwrap_or(self.token.as_str())
    }
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.pos, self.token)?;
        if let Some(lit) = &self.literal {
            write!(f, " {lit:?}")
        } else if self.token.is_operator() {
            write!(f, " {}", self.token.as_str())
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_ranges_are_disjoint() {
        assert!(Token::KwFunc.is_keyword());
        assert!(!Token::KwFunc.is_operator());
        assert!(Token::Dot.is_operator());
        assert!(Token::Plus.is_operator());
        assert!(Token::RawStringLit.is_literal());
        assert!(Token::Ident.is_literal());
        assert!(!Token::LineComment.is_literal());
        assert!(!Token::Eof.is_operator());
        assert!(Token::BlockComment.is_comment());
    }

    #[test]
    fn keyword_table_round_trips() {
        for kw in ["break", "func", "interface", "var", "fallthrough"] {
            let tok = Token::keyword(kw).unwrap();
            assert!(tok.is_keyword());
            assert_eq!(tok.as_str(), kw);
        }
        assert_eq!(Token::keyword("main"), None);
    }

    #[test]
    fn modulo_is_multiplicative() {
        assert_eq!(Token::Percent.precedence(), Precedence::Factor);
        assert_eq!(Token::LOr.precedence(), Precedence::Or);
        assert_eq!(Token::Assign.precedence(), Precedence::None);
        assert!(Precedence::Factor > Precedence::Term);
    }

    #[test]
    fn lexeme_display() {
        let pos = Position::new(8, 1, None);
        let ident = Lexeme::with_literal(Token::Ident, pos.clone(), "main");
        assert_eq!(ident.to_string(), "1:8 Ident \"main\"");
        let op = Lexeme::new(Token::Define, pos);
        assert_eq!(op.to_string(), "1:8 Define :=");
    }
}

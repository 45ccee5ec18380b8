use std::ops::Range;
use std::sync::Arc;

use logos::{Lexer as LogosLexer, Logos};
use memchr::memchr;

use crate::error::{LexError, LexErrorKind};
use crate::position::{LineIndex, Position};
use crate::token::{Lexeme, Token};

// =============================================================================
// 1. Block comment scanner
// =============================================================================

fn lex_block_comment(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let rem = lex.remainder().as_bytes();
    let mut search_start = 0;

    while let Some(star_pos) = memchr(b'*', &rem[search_start..]) {
        let abs_pos = search_start + star_pos;
        if rem.get(abs_pos + 1) == Some(&b'/') {
            lex.bump(abs_pos + 2);
            return Ok(());
        }
        search_start = abs_pos + 1;
    }

    lex.bump(rem.len());
    Err(LexErrorKind::UnclosedComment)
}

// =============================================================================
// 2. Quoted literals
// =============================================================================

fn lex_raw_string(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let rem = lex.remainder().as_bytes();
    match memchr(b'`', rem) {
        Some(end) => {
            lex.bump(end + 1);
            Ok(())
        }
        None => {
            lex.bump(rem.len());
            Err(LexErrorKind::UnterminatedString)
        }
    }
}

fn lex_interpreted_string(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    scan_quoted(lex, b'"').map(|_| ())
}

fn lex_rune(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    match scan_quoted(lex, b'\'')? {
        1 => Ok(()),
        _ => Err(LexErrorKind::InvalidRune),
    }
}

/// Consumes an interpreted literal whose opening quote was already matched.
///
/// Returns the number of characters between the quotes, counting each escape
/// as one. An unescaped newline is left in the input so the wrapper still sees
/// it as a line break.
fn scan_quoted(lex: &mut LogosLexer<'_, RawTok>, quote: u8) -> Result<usize, LexErrorKind> {
    let rem = lex.remainder().as_bytes();
    let mut i = 0;
    let mut units = 0;
    let mut bad_escape = false;

    while let Some(&b) = rem.get(i) {
        if b == quote {
            lex.bump(i + 1);
            return if bad_escape {
                Err(LexErrorKind::InvalidEscape)
            } else {
                Ok(units)
            };
        }
        match b {
            b'\n' => break,
            b'\\' => {
                match escape_len(&rem[i + 1..], quote) {
                    Ok(n) => i += 1 + n,
                    Err(n) => {
                        bad_escape = true;
                        i += 1 + n;
                    }
                }
                units += 1;
            }
            _ => {
                // Count chars, not bytes: skip UTF-8 continuation bytes.
                if b & 0xC0 != 0x80 {
                    units += 1;
                }
                i += 1;
            }
        }
    }

    lex.bump(i);
    Err(LexErrorKind::UnterminatedString)
}

/// Length of the escape following a backslash. `Err` carries how many bytes
/// to skip past an invalid escape; a newline is never skipped.
fn escape_len(rest: &[u8], quote: u8) -> Result<usize, usize> {
    let Some(&c) = rest.first() else {
        return Err(0);
    };
    let (start, digits, radix) = match c {
        b'a' | b'b' | b'f' | b'n' | b'r' | b't' | b'v' | b'\\' => return Ok(1),
        c if c == quote => return Ok(1),
        b'0'..=b'7' => (0, 3, 8),
        b'x' => (1, 2, 16),
        b'u' => (1, 4, 16),
        b'U' => (1, 8, 16),
        b'\n' => return Err(0),
        _ => return Err(1),
    };

    let mut value: u32 = 0;
    for k in 0..digits {
        match rest.get(start + k).and_then(|&b| (b as char).to_digit(radix)) {
            Some(d) => value = value * radix + d,
            None => return Err(start + k),
        }
    }

    let len = start + digits;
    let valid = match c {
        b'0'..=b'7' => value <= 0xFF,
        b'u' | b'U' => char::from_u32(value).is_some(),
        _ => true,
    };
    if valid {
        Ok(len)
    } else {
        Err(len)
    }
}

// =============================================================================
// 3. Number scanning
// =============================================================================

mod num {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(super) enum NumKind {
        Int,
        Float,
        Imag,
    }

    struct Digits {
        end: usize,
        count: usize,
        invalid: Option<u8>,
    }

    #[inline]
    fn note(err: &mut Option<LexErrorKind>, kind: LexErrorKind) {
        if err.is_none() {
            *err = Some(kind);
        }
    }

    #[inline]
    fn at(src: &[u8], i: usize) -> u8 {
        src.get(i).copied().unwrap_or(0)
    }

    /// Scans a digit run with `_` separators. Hex runs accept `[0-9a-fA-F]`,
    /// every other base `[0-9]`; digits outside a smaller base are recorded in
    /// `invalid` instead of ending the run.
    fn digits(src: &[u8], mut i: usize, base: u32, err: &mut Option<LexErrorKind>) -> Digits {
        let mut count = 0;
        let mut invalid = None;
        let mut prev_sep = false;

        while let Some(&b) = src.get(i) {
            let is_digit = if base == 16 {
                b.is_ascii_hexdigit()
            } else {
                b.is_ascii_digit()
            };
            if b == b'_' {
                if prev_sep {
                    note(err, LexErrorKind::MisplacedSeparator);
                }
                prev_sep = true;
            } else if is_digit {
                if base < 10 && invalid.is_none() && u32::from(b - b'0') >= base {
                    invalid = Some(b);
                }
                count += 1;
                prev_sep = false;
            } else {
                break;
            }
            i += 1;
        }

        if prev_sep {
            note(err, LexErrorKind::MisplacedSeparator);
        }
        Digits {
            end: i,
            count,
            invalid,
        }
    }

    /// Runs that may not start with `_` (fractions, exponents).
    fn unprefixed_digits(src: &[u8], i: usize, err: &mut Option<LexErrorKind>) -> Digits {
        if at(src, i) == b'_' {
            note(err, LexErrorKind::MisplacedSeparator);
        }
        digits(src, i, 10, err)
    }

    fn exponent(src: &[u8], mut i: usize, err: &mut Option<LexErrorKind>) -> usize {
        i += 1;
        if matches!(at(src, i), b'+' | b'-') {
            i += 1;
        }
        let run = unprefixed_digits(src, i, err);
        if run.count == 0 {
            note(err, LexErrorKind::MissingExponent);
        }
        run.end
    }

    /// Returns the end offset of the literal starting at `start` and its kind.
    pub(super) fn scan(src: &[u8], start: usize) -> (usize, Result<NumKind, LexErrorKind>) {
        let mut err = None;
        let mut kind = NumKind::Int;
        let mut i = start;

        if at(src, i) == b'.' {
            i = unprefixed_digits(src, i + 1, &mut err).end;
            if matches!(at(src, i), b'e' | b'E') {
                i = exponent(src, i, &mut err);
            }
            kind = NumKind::Float;
        } else if at(src, i) == b'0' && matches!(at(src, i + 1) | 0x20, b'x' | b'b' | b'o') {
            let (base, name) = match at(src, i + 1) | 0x20 {
                b'x' => (16, "hexadecimal"),
                b'b' => (2, "binary"),
                _ => (8, "octal"),
            };
            let run = digits(src, i + 2, base, &mut err);
            let mut mantissa = run.count;
            i = run.end;
            if let Some(d) = run.invalid {
                note(
                    &mut err,
                    LexErrorKind::InvalidDigit {
                        digit: d as char,
                        base: name,
                    },
                );
            }

            if base == 16 {
                let mut has_fraction = false;
                if at(src, i) == b'.' {
                    if at(src, i + 1) == b'_' {
                        note(&mut err, LexErrorKind::MisplacedSeparator);
                    }
                    let frac = digits(src, i + 1, 16, &mut err);
                    mantissa += frac.count;
                    i = frac.end;
                    has_fraction = true;
                    kind = NumKind::Float;
                }
                if matches!(at(src, i), b'p' | b'P') {
                    i = exponent(src, i, &mut err);
                    kind = NumKind::Float;
                } else if has_fraction {
                    note(&mut err, LexErrorKind::MissingHexExponent);
                }
            }

            if mantissa == 0 {
                note(&mut err, LexErrorKind::MissingDigits(name));
            }
        } else {
            let legacy_octal = at(src, i) == b'0';
            let run = digits(src, i, 10, &mut err);
            i = run.end;

            if at(src, i) == b'.' && at(src, i + 1) != b'.' {
                i = unprefixed_digits(src, i + 1, &mut err).end;
                kind = NumKind::Float;
            }
            if matches!(at(src, i), b'e' | b'E') {
                i = exponent(src, i, &mut err);
                kind = NumKind::Float;
            }

            // `09` is an error, `09.5` a float and `09i` imaginary.
            if legacy_octal && kind == NumKind::Int && at(src, i) != b'i' {
                if let Some(&d) = src[start..run.end].iter().find(|&&b| matches!(b, b'8' | b'9')) {
                    note(
                        &mut err,
                        LexErrorKind::InvalidDigit {
                            digit: d as char,
                            base: "octal",
                        },
                    );
                }
            }
        }

        if at(src, i) == b'i' {
            i += 1;
            kind = NumKind::Imag;
        }

        (i, err.map_or(Ok(kind), Err))
    }

    pub(super) fn lex_number(lex: &mut LogosLexer<'_, RawTok>) -> Result<NumKind, LexErrorKind> {
        let span = lex.span();
        let (end, result) = scan(lex.source().as_bytes(), span.start);
        lex.bump(end.saturating_sub(span.end));
        result
    }

}

// =============================================================================
// 4. Raw token definition
// =============================================================================

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\r]+")]
#[rustfmt::skip]
enum RawTok {
    #[token("\u{FEFF}")] Bom,

    #[token("\n")] Newline,
    #[regex(r"//[^\n]*", allow_greedy = true)] LineComment,
    #[token("/*", lex_block_comment)] BlockComment,

    // Keywords (before Ident)
    #[token("break")] KwBreak,
    #[token("case")] KwCase,
    #[token("chan")] KwChan,
    #[token("const")] KwConst,
    #[token("continue")] KwContinue,
    #[token("default")] KwDefault,
    #[token("defer")] KwDefer,
    #[token("else")] KwElse,
    #[token("fallthrough")] KwFallthrough,
    #[token("for")] KwFor,
    #[token("func")] KwFunc,
    #[token("go")] KwGo,
    #[token("goto")] KwGoto,
    #[token("if")] KwIf,
    #[token("import")] KwImport,
    #[token("interface")] KwInterface,
    #[token("map")] KwMap,
    #[token("package")] KwPackage,
    #[token("range")] KwRange,
    #[token("return")] KwReturn,
    #[token("select")] KwSelect,
    #[token("struct")] KwStruct,
    #[token("switch")] KwSwitch,
    #[token("type")] KwType,
    #[token("var")] KwVar,

    #[regex(r"[_\p{L}][_\p{L}\p{Nd}]*")] Ident,

    // Maximal munch happens in the callback
    #[regex(r"[0-9]|\.[0-9]", num::lex_number)] Number(num::NumKind),

    #[token("`", lex_raw_string)] RawString,
    #[token("\"", lex_interpreted_string)] String,
    #[token("'", lex_rune)] Rune,

    #[token("...")] Ellipsis,
    #[token("<<=")] ShlAssign,
    #[token(">>=")] ShrAssign,
    #[token("&^=")] AndNotAssign,
    #[token("+=")] AddAssign,
    #[token("-=")] SubAssign,
    #[token("*=")] MulAssign,
    #[token("/=")] DivAssign,
    #[token("%=")] ModAssign,
    #[token("&=")] AndAssign,
    #[token("|=")] OrAssign,
    #[token("^=")] XorAssign,
    #[token("<<")] Shl,
    #[token(">>")] Shr,
    #[token("&^")] AndNot,
    #[token("&&")] LAnd,
    #[token("||")] LOr,
    #[token("==")] EqEq,
    #[token("!=")] NotEq,
    #[token("<=")] Le,
    #[token(">=")] Ge,
    #[token("++")] Inc,
    #[token("--")] Dec,
    #[token(":=")] Define,
    #[token("<-")] Arrow,
    #[token("=")] Assign,
    #[token("+")] Plus,
    #[token("-")] Minus,
    #[token("*")] Star,
    #[token("/")] Slash,
    #[token("%")] Percent,
    #[token("&")] Amp,
    #[token("|")] Pipe,
    #[token("^")] Caret,
    #[token("~")] Tilde,
    #[token("!")] Bang,
    #[token("<")] Lt,
    #[token(">")] Gt,

    #[token("(")] LParen,
    #[token(")")] RParen,
    #[token("[")] LBrack,
    #[token("]")] RBrack,
    #[token("{")] LBrace,
    #[token("}")] RBrace,
    #[token(",")] Comma,
    #[token(";")] Semi,
    #[token(":")] Colon,
    #[token(".")] Dot,

    // Catch-all (lowest priority)
    #[regex(r".", priority = 0)] Unknown,
}

impl RawTok {
    /// Public kind for tokens that reach the stream unchanged.
    const fn token(self) -> Option<Token> {
        macro_rules! simple_tok {
            ($($raw:ident => $tok:ident),* $(,)?) => {
                match self {
                    $(Self::$raw => Some(Token::$tok),)*
                    Self::Number(num::NumKind::Int) => Some(Token::IntLit),
                    Self::Number(num::NumKind::Float) => Some(Token::FloatLit),
                    Self::Number(num::NumKind::Imag) => Some(Token::ImagLit),
                    Self::Bom | Self::Newline | Self::Unknown => None,
                }
            };
        }

        simple_tok! {
            LineComment => LineComment, BlockComment => BlockComment,
            Ident => Ident, RawString => RawStringLit, String => StringLit, Rune => RuneLit,

            KwBreak => KwBreak, KwCase => KwCase, KwChan => KwChan, KwConst => KwConst,
            KwContinue => KwContinue, KwDefault => KwDefault, KwDefer => KwDefer, KwElse => KwElse,
            KwFallthrough => KwFallthrough, KwFor => KwFor, KwFunc => KwFunc, KwGo => KwGo,
            KwGoto => KwGoto, KwIf => KwIf, KwImport => KwImport, KwInterface => KwInterface,
            KwMap => KwMap, KwPackage => KwPackage, KwRange => KwRange, KwReturn => KwReturn,
            KwSelect => KwSelect, KwStruct => KwStruct, KwSwitch => KwSwitch, KwType => KwType, KwVar => KwVar,

            Ellipsis => Ellipsis, ShlAssign => ShlAssign, ShrAssign => ShrAssign, AndNotAssign => AndNotAssign,
            AddAssign => AddAssign, SubAssign => SubAssign, MulAssign => MulAssign, DivAssign => DivAssign,
            ModAssign => ModAssign, AndAssign => AndAssign, OrAssign => OrAssign, XorAssign => XorAssign,
            Shl => Shl, Shr => Shr, AndNot => AndNot, LAnd => LAnd, LOr => LOr, EqEq => EqEq, NotEq => NotEq,
            Le => Le, Ge => Ge, Inc => Inc, Dec => Dec, Define => Define, Arrow => Arrow,
            Assign => Assign, Plus => Plus, Minus => Minus, Star => Star, Slash => Slash, Percent => Percent,
            Amp => Amp, Pipe => Pipe, Caret => Caret, Tilde => Tilde, Bang => Bang, Lt => Lt, Gt => Gt,

            LParen => LParen, RParen => RParen, LBrack => LBrack, RBrack => RBrack, LBrace => LBrace,
            RBrace => RBrace, Comma => Comma, Semi => Semi, Colon => Colon, Dot => Dot,
        }
    }
}

// =============================================================================
// 5. Lexer wrapper: lexemes, positions, semicolon insertion
// =============================================================================

/// Streaming lexer yielding [`Lexeme`]s, comments included, and ending with
/// exactly one [`Token::Eof`]. Lexical errors are collected on the side; the
/// offending text produces no lexeme.
pub struct Lexer<'src> {
    logos: LogosLexer<'src, RawTok>,
    lines: LineIndex,
    filename: Option<Arc<str>>,
    pending: Option<Lexeme>,
    errors: Vec<LexError>,
    last_can_insert_semi: bool,
    src_len: usize,
    eof_done: bool,
    finished: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(input: &'src str) -> Self {
        Self {
            logos: RawTok::lexer(input),
            lines: LineIndex::new(input),
            filename: None,
            pending: None,
            errors: Vec::new(),
            last_can_insert_semi: false,
            src_len: input.len(),
            eof_done: false,
            finished: false,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<Arc<str>>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub(crate) fn with_shared_filename(mut self, filename: Option<Arc<str>>) -> Self {
        self.filename = filename;
        self
    }

    #[inline]
    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    #[inline]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn take_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.errors)
    }

    #[inline]
    fn pos_at(&self, offset: usize) -> Position {
        Position::new(offset, self.lines.line_of(offset), self.filename.clone())
    }

    #[inline]
    fn semi_at(&self, offset: usize) -> Lexeme {
        Lexeme::new(Token::Semi, self.pos_at(offset))
    }

    #[inline]
    fn push_error(&mut self, kind: LexErrorKind, offset: usize) {
        let pos = self.pos_at(offset);
        self.errors.push(LexError { kind, pos });
    }
}

impl Iterator for Lexer<'_> {
    type Item = Lexeme;

    fn next(&mut self) -> Option<Lexeme> {
        loop {
            if let Some(lexeme) = self.pending.take() {
                return Some(lexeme);
            }
            if self.finished {
                return None;
            }
            if self.eof_done {
                self.finished = true;
                return Some(Lexeme::new(Token::Eof, self.pos_at(self.src_len)));
            }

            match self.logos.next() {
                // Don't return yet: a pending ';' must come out before Eof.
                None => self.handle_eof(),
                Some(Err(kind)) => self.handle_lex_error(kind),
                Some(Ok(raw)) => {
                    if let Some(lexeme) = self.handle_raw_token(raw) {
                        return Some(lexeme);
                    }
                }
            }
        }
    }
}

impl Lexer<'_> {
    fn handle_eof(&mut self) {
        self.eof_done = true;
        if self.last_can_insert_semi {
            self.last_can_insert_semi = false;
            self.pending = Some(self.semi_at(self.src_len));
        }
    }

    fn handle_lex_error(&mut self, kind: LexErrorKind) {
        let span = self.logos.span();
        let offset = if kind.reported_at_end() {
            span.end
        } else {
            span.start
        };
        self.push_error(kind, offset);
        self.last_can_insert_semi = false;
    }

    fn handle_raw_token(&mut self, raw: RawTok) -> Option<Lexeme> {
        let span: Range<usize> = self.logos.span();
        let slice = self.logos.slice();

        match raw {
            RawTok::Bom => {
                if span.start != 0 {
                    self.push_error(LexErrorKind::UnknownCharacter('\u{FEFF}'), span.start);
                    self.last_can_insert_semi = false;
                }
                None
            }
            RawTok::Newline => {
                if self.last_can_insert_semi {
                    self.last_can_insert_semi = false;
                    return Some(self.semi_at(span.start));
                }
                None
            }
            RawTok::Unknown => {
                let ch = slice.chars().next().unwrap_or('\u{FFFD}');
                self.push_error(LexErrorKind::UnknownCharacter(ch), span.start);
                self.last_can_insert_semi = false;
                None
            }
            RawTok::LineComment => Some(Lexeme::with_literal(
                Token::LineComment,
                self.pos_at(span.start),
                slice,
            )),
            RawTok::BlockComment => {
                // A comment spanning lines ends the statement like a newline.
                if self.last_can_insert_semi {
                    if let Some(nl) = memchr(b'\n', slice.as_bytes()) {
                        self.last_can_insert_semi = false;
                        self.pending = Some(self.semi_at(span.start + nl));
                    }
                }
                Some(Lexeme::with_literal(
                    Token::BlockComment,
                    self.pos_at(span.start),
                    slice,
                ))
            }
            _ => {
                let token = raw.token()?;
                self.last_can_insert_semi = token.ends_statement();
                let pos = self.pos_at(span.start);
                Some(if token.is_literal() {
                    Lexeme::with_literal(token, pos, slice)
                } else {
                    Lexeme::new(token, pos)
                })
            }
        }
    }
}

// =============================================================================
// 6. One-shot lexing
// =============================================================================

/// Complete output of lexing one source text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Lexed {
    pub lexemes: Vec<Lexeme>,
    pub errors: Vec<LexError>,
}

impl Lexed {
    #[inline]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

pub fn lex(src: &str, filename: Option<&str>) -> Lexed {
    lex_shared(src, filename.map(Arc::from))
}

pub(crate) fn lex_shared(src: &str, filename: Option<Arc<str>>) -> Lexed {
    let mut lexer = Lexer::new(src).with_shared_filename(filename);
    let lexemes: Vec<Lexeme> = lexer.by_ref().collect();
    let errors = lexer.take_errors();
    tracing::trace!(lexemes = lexemes.len(), errors = errors.len(), "lexed source");
    Lexed { lexemes, errors }
}

//! Recursive-descent parser over the lexer's output.
//!
//! The parser lexes the whole source first and refuses to parse a token
//! stream that carries lex errors. Productions return [`PResult`]; a failed
//! production has already recorded its diagnostic, and only the declaration
//! and statement list loops consume the [`Abort`] marker, resynchronize with
//! [`Parser::recover`] and carry on.
//!
//! ```
//! use gosyntax::{ParseMode, Parser};
//!
//! let mut parser = Parser::new("package main\nfunc main() {}\n", ParseMode::File);
//! let file = parser.parse_file().unwrap().unwrap();
//! assert_eq!(file.package.name.name, "main");
//! assert!(!parser.has_errors());
//! ```

mod cursor;
mod decl;
mod expr;
mod stmt;
mod types;

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::ast::{Comment, Decl, File, Ident, Keyword, Operator, Punct};
use crate::error::{Diag, InvalidNode, ParseError, ParseFailure, ParseModeError};
use crate::handler::ErrorHandler;
use crate::lexer::lex_shared;
use crate::token::{Lexeme, Token};

use cursor::Cursor;

/// Which entry point a [`Parser`] serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    #[default]
    File,
    SingleDecl,
}

/// A production gave up; its diagnostic is already recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Abort;

pub(crate) type PResult<T> = Result<T, Abort>;

/// Nested productions give up past this depth instead of exhausting the stack.
const MAX_NESTING_DEPTH: usize = 100;

/// Where error recovery may resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Recovery {
    Decl,
    Stmt,
}

pub struct Parser<'a> {
    src: &'a str,
    filename: Option<Arc<str>>,
    mode: ParseMode,
    handler: Option<Box<dyn ErrorHandler + 'a>>,
    cursor: Cursor,
    /// Inside an `if`/`for`/`switch` header, where `T {` opens the body.
    cf_header: bool,
    depth: usize,
    comments: Vec<Comment>,
    errors: Vec<Diag>,
}

impl fmt::Debug for Parser<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("filename", &self.filename)
            .field("mode", &self.mode)
            .field("errors", &self.errors.len())
            .finish_non_exhaustive()
    }
}

impl<'a> Parser<'a> {
    pub fn new(src: &'a str, mode: ParseMode) -> Self {
        Self {
            src,
            filename: None,
            mode,
            handler: None,
            cursor: Cursor::empty(),
            cf_header: false,
            depth: 0,
            comments: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Name reported in every diagnostic position.
    pub fn with_filename(mut self, filename: impl Into<Arc<str>>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Receives each diagnostic once a parse attempt finishes.
    pub fn with_error_handler(mut self, handler: impl ErrorHandler + 'a) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    #[inline]
    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    #[inline]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    #[inline]
    pub fn errors(&self) -> &[Diag] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<Diag> {
        std::mem::take(&mut self.errors)
    }

    /// Parses a whole source file starting with its package clause.
    ///
    /// Returns `Ok(None)` when the source had lex errors or no package clause
    /// could be parsed; the diagnostics are in [`Parser::errors`].
    #[tracing::instrument(level = "debug", skip(self), fields(filename = ?self.filename))]
    pub fn parse_file(&mut self) -> Result<Option<File>, ParseModeError> {
        self.expect_mode(ParseMode::File)?;
        Ok(self.run_file())
    }

    /// Parses exactly one declaration: function, method, var, const, type or
    /// import.
    #[tracing::instrument(level = "debug", skip(self), fields(filename = ?self.filename))]
    pub fn parse_single_decl(&mut self) -> Result<Option<Decl>, ParseModeError> {
        self.expect_mode(ParseMode::SingleDecl)?;
        if !self.start() {
            self.finish();
            return Ok(None);
        }

        let decl = if self.cursor.at(Token::KwImport) {
            self.parse_import_decl().map(Decl::Import)
        } else {
            self.parse_decl()
        };
        let decl = decl.ok();
        if decl.is_some() && !self.cursor.at_end() {
            let tok = self.cursor.peek().token;
            let _ = self.error::<()>(format!("unexpected {tok} after declaration"));
        }

        self.finish();
        Ok(decl)
    }

    fn expect_mode(&self, requested: ParseMode) -> Result<(), ParseModeError> {
        if self.mode == requested {
            Ok(())
        } else {
            Err(ParseModeError {
                configured: self.mode,
                requested,
            })
        }
    }

    pub(crate) fn run_file(&mut self) -> Option<File> {
        if !self.start() {
            self.finish();
            return None;
        }
        let comments = std::mem::take(&mut self.comments);
        let package = match self.parse_package_clause() {
            Ok(package) => Some(package),
            Err(Abort) => {
                self.recover(Recovery::Decl, 0);
                None
            }
        };
        let imports = self.parse_imports();
        let decls = self.parse_decls();
        self.finish();

        package.map(|package| File {
            filename: self.filename.clone(),
            package,
            imports,
            decls,
            comments,
        })
    }

    /// Resets state and lexes the source. Returns `false` when lexing failed,
    /// in which case only the lex errors are recorded.
    fn start(&mut self) -> bool {
        self.errors.clear();
        self.cf_header = false;
        self.depth = 0;
        self.comments.clear();

        let lexed = lex_shared(self.src, self.filename.clone());
        if lexed.has_errors() {
            debug!(errors = lexed.errors.len(), "lex errors, skipping parse");
            self.errors.extend(lexed.errors.into_iter().map(Diag::Lex));
            self.cursor = Cursor::empty();
            return false;
        }

        let (cursor, comments) = Cursor::new(lexed.lexemes);
        self.cursor = cursor;
        self.comments = comments;
        true
    }

    fn finish(&mut self) {
        debug!(errors = self.errors.len(), "parse finished");
        let Self {
            handler, errors, ..
        } = self;
        if let Some(handler) = handler.as_mut() {
            for diag in errors.iter() {
                handler.on_error(diag);
            }
        }
    }

    // =========================================================================
    // Diagnostics and recovery
    // =========================================================================

    /// Records a parse error at the current token.
    pub(crate) fn error<T>(&mut self, message: impl Into<String>) -> PResult<T> {
        let pos = self.cursor.pos();
        self.errors.push(Diag::Parse(ParseError {
            message: message.into(),
            pos,
        }));
        Err(Abort)
    }

    /// Routes a smart-constructor refusal into the diagnostics.
    pub(crate) fn build<T>(&mut self, node: Result<T, InvalidNode>) -> PResult<T> {
        node.or_else(|err| {
            warn!(error = %err, pos = %self.cursor.pos(), "node rejected by its constructor");
            self.error(err.0)
        })
    }

    /// Skips to a token where parsing in `mode` can resume. `start` is the
    /// cursor index where the failed production began.
    pub(crate) fn recover(&mut self, mode: Recovery, start: usize) {
        let from = self.cursor.index();
        if from == start {
            self.cursor.advance();
        }
        // Statement recovery skips bracketed regions whole: `}` and `;` only
        // count outside braces, keywords only outside any bracket.
        let (mut braces, mut parens) = (0usize, 0usize);
        loop {
            let token = self.cursor.peek().token;
            match mode {
                Recovery::Decl => {
                    if token == Token::Eof || token == Token::KwImport || decl_start(token) {
                        break;
                    }
                }
                Recovery::Stmt => match token {
                    Token::Eof => break,
                    Token::LBrace => braces += 1,
                    Token::RBrace if braces > 0 => braces -= 1,
                    _ if braces > 0 => {}
                    Token::LParen | Token::LBrack => parens += 1,
                    Token::RParen | Token::RBrack => parens = parens.saturating_sub(1),
                    Token::RBrace => break,
                    Token::Semi => {
                        self.cursor.advance();
                        break;
                    }
                    _ if parens > 0 => {}
                    t if decl_start(t) || stmt_start(t) => break,
                    _ => {}
                },
            }
            self.cursor.advance();
        }
        debug!(
            ?mode,
            skipped = self.cursor.index() - from,
            resume = %self.cursor.pos(),
            "recovered"
        );
    }

    // =========================================================================
    // Terminals
    // =========================================================================

    pub(crate) fn expect(&mut self, token: Token) -> PResult<Lexeme> {
        if self.cursor.at(token) {
            Ok(self.cursor.advance())
        } else {
            let found = self.cursor.peek().token;
            self.error(format!("unexpected {found}, expected {token}"))
        }
    }

    pub(crate) fn eat(&mut self, token: Token) -> Option<Lexeme> {
        self.cursor.at(token).then(|| self.cursor.advance())
    }

    /// Statement terminator, optional before a closing `)` or `}`.
    pub(crate) fn parse_semicolon(&mut self) -> PResult<()> {
        if self.cursor.at_any(&[Token::RParen, Token::RBrace]) {
            return Ok(());
        }
        self.expect(Token::Semi).map(drop)
    }

    pub(crate) fn parse_ident(&mut self) -> PResult<Ident> {
        let lexeme = self.expect(Token::Ident)?;
        Ok(ident_from(lexeme))
    }

    pub(crate) fn try_parse_ident(&mut self) -> Option<Ident> {
        self.eat(Token::Ident).map(ident_from)
    }

    pub(crate) fn parse_keyword(&mut self, token: Token) -> PResult<Keyword> {
        let lexeme = self.expect(token)?;
        Ok(Keyword {
            pos: lexeme.pos,
            token,
        })
    }

    pub(crate) fn parse_punct(&mut self, token: Token) -> PResult<Punct> {
        let lexeme = self.expect(token)?;
        Ok(Punct {
            pos: lexeme.pos,
            token,
        })
    }

    pub(crate) fn try_parse_punct(&mut self, token: Token) -> Option<Punct> {
        self.eat(token).map(|l| Punct { pos: l.pos, token })
    }

    pub(crate) fn parse_operator(&mut self, token: Token) -> PResult<Operator> {
        let lexeme = self.expect(token)?;
        Ok(Operator {
            pos: lexeme.pos,
            token,
        })
    }

    /// Consumes the current token as an operator, whatever it is.
    pub(crate) fn parse_any_operator(&mut self) -> Operator {
        let lexeme = self.cursor.advance();
        Operator {
            pos: lexeme.pos,
            token: lexeme.token,
        }
    }

    /// Runs `f` with the control-flow header flag set to `on`, restoring the
    /// previous value afterwards.
    pub(crate) fn in_header<T>(
        &mut self,
        on: bool,
        f: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        let saved = std::mem::replace(&mut self.cf_header, on);
        let result = f(self);
        self.cf_header = saved;
        result
    }

    /// Runs `f` one nesting level deeper. Expressions, types, literals,
    /// blocks and statements all pass through here.
    pub(crate) fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return self.error(format!(
                "nesting too deep (maximum {MAX_NESTING_DEPTH} levels)"
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}

fn decl_start(token: Token) -> bool {
    matches!(
        token,
        Token::KwStruct | Token::KwFunc | Token::KwVar | Token::KwConst | Token::KwType
    )
}

fn stmt_start(token: Token) -> bool {
    matches!(
        token,
        Token::KwIf
            | Token::KwFor
            | Token::KwReturn
            | Token::KwSwitch
            | Token::KwSelect
            | Token::KwGo
            | Token::KwDefer
    )
}

fn ident_from(lexeme: Lexeme) -> Ident {
    let name = lexeme.literal.unwrap_or_default();
    Ident {
        pos: lexeme.pos,
        name,
    }
}

/// Parses `src` as a file with no filename and no error handler.
pub fn parse_source(src: &str) -> Result<File, ParseFailure> {
    let mut parser = Parser::new(src, ParseMode::File);
    let file = parser.run_file();
    match file {
        Some(file) if !parser.has_errors() => Ok(file),
        partial => Err(ParseFailure {
            partial,
            diags: parser.take_errors(),
        }),
    }
}

//! Go source front end: lexer, syntax tree and recursive-descent parser.
//!
//! - The lexer uses Logos and implements Go's automatic semicolon insertion.
//! - The parser collects every lex and parse error instead of stopping at the
//!   first one, and builds a tree whose invariant-carrying nodes can only be
//!   created through validating constructors.
//! - Every node implements [`Walk`], which is all [`NodeDumper`] and other
//!   tree consumers need.
//!
//! ```
//! let file = gosyntax::parse_source("package p\nvar x = 1\n").unwrap();
//! assert_eq!(file.decls.len(), 1);
//! ```

pub mod ast;
pub mod dump;
pub mod error;
pub mod handler;
pub mod lexer;
pub mod parser;
pub mod position;
pub mod token;
pub mod walk;

pub use dump::{dump_to_string, NodeDumper};
pub use error::{
    Diag, DiagKind, InvalidNode, LexError, LexErrorKind, ParseError, ParseFailure, ParseModeError,
};
pub use handler::{ErrorHandler, StderrErrorHandler, StdoutErrorHandler};
pub use lexer::{lex, Lexed, Lexer};
pub use parser::{parse_source, ParseMode, Parser};
pub use position::Position;
pub use token::{Lexeme, Token};
pub use walk::{NodeKind, Visitor, Walk};
